use crate::config::{MarketApiConfig, VolumeWindow};
use crate::error::FetchError;
use crate::types::{
    AssetDetail, AssetListing, CurrencyUnit, HistoricalRecord, InfoRecord, KeyedResponse,
    ListingsResponse,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// 即 `X-CMC_PRO_API_KEY`，HTTP 头名称不区分大小写
pub const API_KEY_HEADER: &str = "x-cmc_pro_api_key";
pub const LISTINGS_ENDPOINT: &str = "/v1/cryptocurrency/listings/latest";
pub const INFO_ENDPOINT: &str = "/v1/cryptocurrency/info";
pub const HISTORICAL_ENDPOINT: &str = "/v1/cryptocurrency/quotes/historical";

/// 每次拉取的币种数量 (按市值排名前 100)
pub const LISTING_LIMIT: usize = 100;

/// CoinMarketCap 行情接口客户端
///
/// 只保存共享的 HTTP 连接池与接口地址；API Key 随每次调用传入，不在客户端中保存。
pub struct CoinMarketCapClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinMarketCapClient {
    pub fn new(config: &MarketApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent("CryptoPriceApp/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取按市值排名前 100 的币种行情
    pub async fn fetch_listings(
        &self,
        api_key: &SecretString,
        currency: CurrencyUnit,
    ) -> Result<AssetListing, FetchError> {
        let headers = Self::auth_headers(api_key)?;

        info!("📡 获取行情列表 (convert={})", currency);
        let limit = LISTING_LIMIT.to_string();
        let response: ListingsResponse = self
            .get(
                LISTINGS_ENDPOINT,
                headers,
                &[("start", "1"), ("limit", limit.as_str()), ("convert", currency.as_str())],
            )
            .await?;

        let quotes = response
            .data
            .into_iter()
            .map(|record| record.into_quote(currency))
            .collect::<Result<Vec<_>, _>>()?;

        info!("✅ 行情列表获取成功: {} 个币种", quotes.len());
        Ok(AssetListing { currency, quotes })
    }

    /// 获取单个币种的描述信息
    ///
    /// 响应中没有该币种时返回全部字段缺失的 AssetDetail，而不是错误。
    pub async fn fetch_detail(
        &self,
        symbol: &str,
        api_key: &SecretString,
    ) -> Result<AssetDetail, FetchError> {
        let headers = Self::auth_headers(api_key)?;

        debug!("获取 {} 详情", symbol);
        let mut response: KeyedResponse = self
            .get(INFO_ENDPOINT, headers, &[("symbol", symbol)])
            .await?;

        match response.take_entry(symbol) {
            Some(entry) => {
                let record: InfoRecord = serde_json::from_value(entry)?;
                Ok(AssetDetail::from(record))
            }
            None => {
                warn!("⚠️ 详情响应中没有 {} 的条目", symbol);
                Ok(AssetDetail::unavailable())
            }
        }
    }

    /// 获取固定日期区间内的 24h 成交量序列
    ///
    /// 响应中没有该币种时返回 `Ok(None)`。
    pub async fn fetch_volume_history(
        &self,
        symbol: &str,
        api_key: &SecretString,
        currency: CurrencyUnit,
        window: &VolumeWindow,
    ) -> Result<Option<Vec<f64>>, FetchError> {
        let headers = Self::auth_headers(api_key)?;

        let time_start = window.time_start.format("%Y-%m-%d").to_string();
        let time_end = window.time_end.format("%Y-%m-%d").to_string();

        debug!("获取 {} 成交量历史 {} ~ {}", symbol, time_start, time_end);
        let mut response: KeyedResponse = self
            .get(
                HISTORICAL_ENDPOINT,
                headers,
                &[
                    ("symbol", symbol),
                    ("time_start", time_start.as_str()),
                    ("time_end", time_end.as_str()),
                    ("convert", currency.as_str()),
                ],
            )
            .await?;

        match response.take_entry(symbol) {
            Some(entry) => {
                let record: HistoricalRecord = serde_json::from_value(entry)?;
                Ok(Some(record.volumes(currency)))
            }
            None => {
                warn!("⚠️ 成交量历史响应中没有 {} 的条目", symbol);
                Ok(None)
            }
        }
    }

    /// 校验 API Key 并构造认证请求头；Key 为空时不发起任何请求
    fn auth_headers(api_key: &SecretString) -> Result<HeaderMap, FetchError> {
        let key = api_key.expose_secret().trim();
        if key.is_empty() {
            return Err(FetchError::MissingCredential);
        }

        let mut value = HeaderValue::from_str(key).map_err(|_| FetchError::InvalidCredential)?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        headers: HeaderMap,
        query: &[(&str, &str)],
    ) -> Result<R, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("❌ 行情接口请求失败: {} {}", endpoint, status);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credential_rejected_before_request() {
        let err = CoinMarketCapClient::auth_headers(&SecretString::from("   ".to_string()))
            .unwrap_err();
        assert_eq!(err, FetchError::MissingCredential);
    }

    #[test]
    fn test_credential_header_is_sensitive() {
        let headers =
            CoinMarketCapClient::auth_headers(&SecretString::from("abc-123".to_string())).unwrap();
        let value = headers.get(API_KEY_HEADER).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "abc-123");
        assert_eq!(headers.get(ACCEPT).unwrap().to_str().unwrap(), "application/json");
    }

    #[test]
    fn test_control_characters_in_credential() {
        let err = CoinMarketCapClient::auth_headers(&SecretString::from("ab\ncd".to_string()))
            .unwrap_err();
        assert_eq!(err, FetchError::InvalidCredential);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CoinMarketCapClient::new(&MarketApiConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            request_timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }
}
