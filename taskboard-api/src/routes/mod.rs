/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `root`: welcome message, database connectivity probe, unmatched-route fallback
/// - `health`: Health check endpoint
/// - `users`: user listing
/// - `tasks`: task listing, creation and replacement

pub mod health;
pub mod root;
pub mod tasks;
pub mod users;
