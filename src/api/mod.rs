pub mod handlers;
pub mod routes;

use crate::services::{CoinMarketCapClient, DashboardService};
use std::sync::Arc;

pub use routes::create_router;

/// 各请求共享的只读状态；不含任何用户凭证或行情数据
#[derive(Clone)]
pub struct ApiState {
    pub client: Arc<CoinMarketCapClient>,
    pub dashboard: Arc<DashboardService>,
}

impl ApiState {
    pub fn new(client: Arc<CoinMarketCapClient>, dashboard: Arc<DashboardService>) -> Self {
        Self { client, dashboard }
    }
}
