use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub market: MarketApiConfig,
    pub volume_window: VolumeWindow,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// 成交量历史查询的固定日期区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct VolumeWindow {
    pub time_start: NaiveDate,
    pub time_end: NaiveDate,
}

pub const DEFAULT_API_URL: &str = "https://pro-api.coinmarketcap.com";

impl MarketApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for VolumeWindow {
    fn default() -> Self {
        Self {
            time_start: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or_default(),
            time_end: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap_or_default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv().ok();

        let defaults = VolumeWindow::default();
        let volume_window = VolumeWindow {
            time_start: env_date_or_default("VOLUME_TIME_START", defaults.time_start)?,
            time_end: env_date_or_default("VOLUME_TIME_END", defaults.time_end)?,
        };

        if volume_window.time_start > volume_window.time_end {
            Self::print_config_help();
            return Err(anyhow::anyhow!(
                "VOLUME_TIME_START ({}) 晚于 VOLUME_TIME_END ({})",
                volume_window.time_start,
                volume_window.time_end
            ));
        }

        let request_timeout_secs: u64 = env_var_or_default("REQUEST_TIMEOUT_SECS", 10)?;
        if request_timeout_secs == 0 {
            Self::print_config_help();
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS 必须大于 0"));
        }

        Ok(Config {
            server: ServerConfig {
                host: env_var_or_default("SERVER_HOST", "0.0.0.0".to_string())?,
                port: env_var_or_default("SERVER_PORT", 8501)?,
            },
            market: MarketApiConfig {
                base_url: env_var_or_default("CMC_API_URL", DEFAULT_API_URL.to_string())?
                    .trim_end_matches('/')
                    .to_string(),
                request_timeout_secs,
            },
            volume_window,
        })
    }

    fn print_config_help() {
        println!("\n🔧 配置指南");
        println!("{}", "=".repeat(50));
        println!("以下环境变量均为可选:\n");

        println!("SERVER_HOST=0.0.0.0");
        println!("SERVER_PORT=8501");
        println!("CMC_API_URL={}", DEFAULT_API_URL);
        println!("REQUEST_TIMEOUT_SECS=10");
        println!("VOLUME_TIME_START=2024-01-07");
        println!("VOLUME_TIME_END=2024-01-14\n");

        println!("API Key 不属于服务配置，由用户在页面中输入。");
        println!("{}", "=".repeat(50));
    }
}

fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val.parse().map_err(|e| anyhow::anyhow!("配置 {} 解析失败: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn env_date_or_default(key: &str, default: NaiveDate) -> anyhow::Result<NaiveDate> {
    match std::env::var(key) {
        Ok(val) => NaiveDate::parse_from_str(val.trim(), "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("配置 {} 解析失败: {}", key, e)),
        Err(_) => Ok(default),
    }
}
