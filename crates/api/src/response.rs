//! Success envelope shared by every resource endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::pagination::Pagination;

/// `{"status":"success","data":...,"pagination"?:...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    status: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success",
            data,
            pagination: None,
            code: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

/// Data payload for endpoints that only confirm an action.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> ApiResponse<Message> {
        ApiResponse::ok(Message {
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::pagination::PageRequest;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "data": {"id": 1}})
        );
    }

    #[test]
    fn test_paginated_envelope() {
        let meta = PageRequest::new(Some(1), Some(20)).meta(45);
        let json = serde_json::to_value(ApiResponse::paginated(vec![1, 2], meta)).unwrap();
        assert_eq!(json["pagination"]["pages"], 3);
        assert_eq!(json["pagination"]["total"], 45);
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created("x").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
