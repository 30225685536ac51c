/// Request extractors
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator`
/// rules before the handler sees it. Bodies that are not JSON are rejected
/// with 400. A field of the wrong type, or a rule violation, is rejected
/// with 422 and field-keyed messages.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use postboard_shared::validation::{validate, FieldErrors};
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use validator::Validate;

use crate::error::ApiError;

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
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| ApiError::BadRequest(rejection.body_text()))?;

        let value = serde_path_to_error::deserialize::<_, T>(body).map_err(type_error)?;
        let value = validate(value).map_err(ApiError::validation)?;

        Ok(ValidatedJson(value))
    }
}

/// Maps a well-formed body that does not fit `T` to a response
///
/// Errors at a named field are reported against that field; a body whose
/// top level has the wrong shape is a bad request.
fn type_error(err: serde_path_to_error::Error<serde_json::Error>) -> ApiError {
    if !matches!(err.path().iter().next(), Some(Segment::Map { .. })) {
        return ApiError::BadRequest(format!(
            "Failed to deserialize the JSON body into the target type: {}",
            err.inner()
        ));
    }

    let field = err.path().to_string();

    let message = if err.inner().to_string().contains("expected a string") {
        format!("The {} field must be a string.", field)
    } else {
        format!("The {} field is invalid.", field)
    };

    ApiError::validation(FieldErrors::single(field, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Input {
        #[validate(required(message = "The title field is required."))]
        title: Option<String>,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let ValidatedJson(input) =
            ValidatedJson::<Input>::from_request(json_request(r#"{"title":"Hi"}"#), &())
                .await
                .unwrap();

        assert_eq!(input.title.as_deref(), Some("Hi"));
    }

    #[tokio::test]
    async fn test_rule_violation_is_unprocessable() {
        let err = ValidatedJson::<Input>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_keyed_to_the_field() {
        let err = ValidatedJson::<Input>::from_request(json_request(r#"{"title":5}"#), &())
            .await
            .unwrap_err();

        match err {
            ApiError::ValidationError { errors, .. } => {
                assert_eq!(errors.messages("title"), ["The title field must be a string."]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_body_is_bad_request() {
        for body in [r#"[1, 2]"#, r#""title""#] {
            let err = ValidatedJson::<Input>::from_request(json_request(body), &())
                .await
                .unwrap_err();

            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST, "{body}");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = ValidatedJson::<Input>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
