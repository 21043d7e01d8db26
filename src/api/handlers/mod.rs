pub mod dashboard_handlers;
pub mod market_handlers;

pub use dashboard_handlers::*;
pub use market_handlers::*;

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> (StatusCode, Json<Self>) {
        let response = Self {
            success: true,
            data: Some(data),
            message: None,
        };
        (StatusCode::OK, Json(response))
    }

    pub fn error(status: StatusCode, message: String) -> (StatusCode, Json<Self>) {
        let response = Self {
            success: false,
            data: None,
            message: Some(message),
        };
        (status, Json(response))
    }
}
