/// Request extractors
///
/// `ValidatedJson<T>` deserializes a JSON body and runs `validator` rules on
/// it before the handler sees it. Both kinds of failure come back as a
/// structured `ApiError`, never as axum's plain-text rejection.
///
/// # Example
///
/// ```no_run
/// use taskboard_api::extract::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Rename {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn rename(ValidatedJson(body): ValidatedJson<Rename>) -> String {
///     body.name
/// }
/// ```

use crate::error::{ApiError, ValidationErrorDetail};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body that has passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(validation_error)?;
        Ok(ValidatedJson(value))
    }
}

/// Flattens `validator` field errors into response details
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let mut details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    // HashMap order is arbitrary; keep responses stable
    details.sort_by(|a, b| a.field.cmp(&b.field));

    ApiError::ValidationError(details)
}
