use super::super::ApiState;
use super::ApiResponse;
use crate::error::FetchError;
use crate::services::market_client::API_KEY_HEADER;
use crate::types::{AssetListing, CurrencyUnit};
use crate::utils::export::{ExportCodec, EXPORT_FILE_NAME};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use secrecy::SecretString;
use serde::Deserialize;

type ApiError = (StatusCode, Json<ApiResponse<()>>);

#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub convert: Option<String>,
}

// Market相关handlers，API Key 通过 X-CMC_PRO_API_KEY 请求头透传
pub async fn get_listings(
    Query(params): Query<ListingQuery>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ApiResponse<AssetListing>>), ApiError> {
    let currency = parse_currency(params.convert.as_deref())?;
    let api_key = credential_from_headers(&headers);

    match state.client.fetch_listings(&api_key, currency).await {
        Ok(listing) => Ok(ApiResponse::success(listing)),
        Err(e) => {
            tracing::error!("Failed to get listings: {}", e);
            Err(fetch_error_response(&e))
        }
    }
}

pub async fn export_listings(
    Query(params): Query<ListingQuery>,
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let currency = parse_currency(params.convert.as_deref())?;
    let api_key = credential_from_headers(&headers);

    let listing = state
        .client
        .fetch_listings(&api_key, currency)
        .await
        .map_err(|e| {
            tracing::error!("Failed to export listings: {}", e);
            fetch_error_response(&e)
        })?;

    let csv = ExportCodec::to_csv(&listing.quotes).map_err(|e| {
        tracing::error!("Failed to encode CSV: {}", e);
        ApiResponse::<()>::error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn parse_currency(convert: Option<&str>) -> Result<CurrencyUnit, ApiError> {
    match convert {
        None => Ok(CurrencyUnit::default()),
        Some(value) => value
            .parse()
            .map_err(|e: String| ApiResponse::<()>::error(StatusCode::BAD_REQUEST, e)),
    }
}

fn credential_from_headers(headers: &HeaderMap) -> SecretString {
    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    SecretString::from(key.to_string())
}

fn fetch_error_response(e: &FetchError) -> ApiError {
    let status = match e {
        FetchError::MissingCredential | FetchError::InvalidCredential => StatusCode::BAD_REQUEST,
        FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        FetchError::Upstream { .. } | FetchError::Transport(_) | FetchError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    ApiResponse::<()>::error(status, format!("{} ({})", e.guidance(), e))
}
