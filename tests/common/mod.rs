#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use crypto_price_app::config::{Config, MarketApiConfig, ServerConfig, VolumeWindow};
use crypto_price_app::services::CoinMarketCapClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_KEY: &str = "test-api-key";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: String,
    pub api_key: Option<String>,
}

pub struct UpstreamState {
    pub status: StatusCode,
    pub delay: Option<Duration>,
    pub listings: Value,
    pub info: Value,
    pub historical: Value,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<SeenRequest>>,
}

/// 进程内模拟的行情接口
pub struct FakeUpstream {
    pub base_url: String,
    pub state: Arc<UpstreamState>,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with(status, None, listings_body(), info_body(), historical_body()).await
    }

    pub async fn start_with(
        status: StatusCode,
        delay: Option<Duration>,
        listings: Value,
        info: Value,
        historical: Value,
    ) -> Self {
        let state = Arc::new(UpstreamState {
            status,
            delay,
            listings,
            info,
            historical,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(serve).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn client(&self) -> CoinMarketCapClient {
        CoinMarketCapClient::new(&market_config(&self.base_url)).unwrap()
    }

    pub fn config(&self) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            market: market_config(&self.base_url),
            volume_window: VolumeWindow::default(),
        }
    }
}

pub fn market_config(base_url: &str) -> MarketApiConfig {
    MarketApiConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: 1,
    }
}

async fn serve(State(state): State<Arc<UpstreamState>>, uri: Uri, headers: HeaderMap) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        api_key: headers
            .get("x-cmc_pro_api_key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    if state.status != StatusCode::OK {
        let body = json!({"status": {"error_code": state.status.as_u16(), "error_message": "denied"}});
        return (state.status, Json(body)).into_response();
    }

    let body = match uri.path() {
        "/v1/cryptocurrency/listings/latest" => state.listings.clone(),
        "/v1/cryptocurrency/info" => state.info.clone(),
        "/v1/cryptocurrency/quotes/historical" => state.historical.clone(),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(body).into_response()
}

fn record(symbol: &str, name: &str, change_24h: f64, max_supply: Option<Value>) -> Value {
    let quote = json!({
        "price": 1.5,
        "percent_change_1h": 0.25,
        "percent_change_24h": change_24h,
        "percent_change_7d": -3.75,
        "market_cap": 123_456_789.5,
        "volume_24h": 9_876_543.25,
    });
    let mut record = json!({
        "id": 1,
        "name": name,
        "symbol": symbol,
        "circulating_supply": 1_000_000.0,
        "total_supply": 2_000_000.0,
        "last_updated": "2024-01-14T12:00:00.000Z",
        "quote": {"USD": quote.clone(), "BTC": quote.clone(), "ETH": quote}
    });
    if let Some(max_supply) = max_supply {
        record["max_supply"] = max_supply;
    }
    record
}

/// A、B、C 三个币种，24h 涨跌幅为 [1.5, -2.0, 0.5]
pub fn listings_body() -> Value {
    json!({
        "status": {"error_code": 0},
        "data": [
            record("A", "Alpha", 1.5, Some(json!(21_000_000.0))),
            record("B", "Beta", -2.0, Some(Value::Null)),
            record("C", "Gamma", 0.5, None),
        ]
    })
}

pub fn info_body() -> Value {
    json!({
        "data": {
            "A": {
                "name": "Alpha",
                "description": "Alpha is a test asset.",
                "logo": "https://example.org/alpha.png",
                "urls": {"website": ["https://alpha.example.org/"]}
            }
        }
    })
}

pub fn historical_body() -> Value {
    let quotes: Vec<Value> = (1..=7)
        .map(|day| json!({"quote": {"USD": {"volume_24h": day as f64 * 1000.0}}}))
        .collect();
    json!({"data": {"A": {"quotes": quotes}}})
}

pub fn empty_data_body() -> Value {
    json!({"data": {}})
}
