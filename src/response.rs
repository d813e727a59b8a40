use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::{json, Value};

/// The body every endpoint answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
    pub error: Option<Value>,
}

pub fn respond<T: Serialize>(code: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(code).json(ApiResponse {
        status: code.is_success(),
        message: message.to_string(),
        data,
        error: None,
    })
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, message, data)
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, message, data)
}

/// An envelope with an empty `data` object.
pub fn empty(code: StatusCode, message: &str) -> HttpResponse {
    respond(code, message, json!({}))
}
