use crate::{
    api::{create_router, ApiState},
    config::Config,
    services::{CoinMarketCapClient, DashboardService, SyntheticSeries},
};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tracing::info;

pub struct ApiService {
    config: Config,
    state: ApiState,
}

impl ApiService {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(CoinMarketCapClient::new(&config.market)?);
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&client),
            Arc::new(SyntheticSeries),
            config.volume_window,
        ));

        Ok(Self {
            state: ApiState::new(client, dashboard),
            config,
        })
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub async fn start(&self) -> Result<()> {
        info!("🚀 启动看板服务...");
        info!(
            "行情接口: {}, 超时: {}s, 成交量区间: {} ~ {}",
            self.config.market.base_url,
            self.config.market.request_timeout_secs,
            self.config.volume_window.time_start,
            self.config.volume_window.time_end
        );

        let app = self.router();
        let listener = tokio::net::TcpListener::bind(format!(
            "{}:{}",
            self.config.server.host, self.config.server.port
        ))
        .await?;

        info!(
            "Dashboard starting on {}:{}",
            self.config.server.host, self.config.server.port
        );
        axum::serve(listener, app).await?;

        Ok(())
    }
}
