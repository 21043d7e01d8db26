pub mod api_service;
pub mod dashboard_service;
pub mod history;
pub mod market_client;

pub use api_service::ApiService;
pub use dashboard_service::DashboardService;
pub use history::{SeriesSource, SyntheticSeries};
pub use market_client::CoinMarketCapClient;
