//! Body and query extractors that reject with the API error envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body; malformed or mistyped input becomes a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// JSON body that also passes its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string; unknown enum values or bad numbers become a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 2, message = "Title is too short"))]
        title: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_validated_json_accepts_valid_body() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"title":"ok"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.title, "ok");
    }

    #[tokio::test]
    async fn test_validated_json_runs_rules() {
        let err = ValidatedJson::<Payload>::from_request(json_request(r#"{"title":"x"}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == "Title is too short"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let err = ApiJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_bad_query_is_validation_error() {
        #[derive(Debug, Deserialize)]
        struct Q {
            #[allow(dead_code)]
            page: i64,
        }

        let (mut parts, _) = Request::builder()
            .uri("/?page=abc")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let err = ApiQuery::<Q>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
