// 远程行情接口 (CoinMarketCap Pro v1) 的响应结构
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use super::{AssetDetail, AssetQuote, CurrencyUnit};
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    #[serde(default)]
    pub data: Vec<ListingRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingRecord {
    pub name: String,
    pub symbol: String,
    pub circulating_supply: f64,
    pub total_supply: f64,
    #[serde(default)]
    pub max_supply: Option<f64>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub quote: HashMap<String, ListingQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingQuote {
    pub price: f64,
    pub percent_change_1h: f64,
    pub percent_change_24h: f64,
    pub percent_change_7d: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
}

impl ListingRecord {
    /// 取出指定计价单位下的报价，转换为 AssetQuote
    pub fn into_quote(mut self, currency: CurrencyUnit) -> Result<AssetQuote, FetchError> {
        let quote = self.quote.remove(currency.as_str()).ok_or_else(|| {
            FetchError::Decode(format!(
                "listing record {} has no {} quote",
                self.symbol, currency
            ))
        })?;

        Ok(AssetQuote {
            symbol: self.symbol,
            name: self.name,
            price: quote.price,
            percent_change_1h: quote.percent_change_1h,
            percent_change_24h: quote.percent_change_24h,
            percent_change_7d: quote.percent_change_7d,
            market_cap: quote.market_cap,
            volume_24h: quote.volume_24h,
            circulating_supply: self.circulating_supply,
            total_supply: self.total_supply,
            max_supply: self.max_supply,
            last_updated: self.last_updated,
        })
    }
}

/// info 与 quotes/historical 接口的 `data` 以币种代码为键。
/// 条目先保留为原始 JSON，只解析被请求的那一个。
#[derive(Debug, Deserialize)]
pub struct KeyedResponse {
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl KeyedResponse {
    pub fn take_entry(&mut self, symbol: &str) -> Option<serde_json::Value> {
        self.data
            .as_mut()
            .and_then(|data| data.remove(symbol))
            .filter(|entry| entry.is_object())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InfoRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub urls: Option<InfoUrls>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InfoUrls {
    #[serde(default)]
    pub website: Option<Vec<String>>,
}

impl From<InfoRecord> for AssetDetail {
    fn from(record: InfoRecord) -> Self {
        let website_url = record
            .urls
            .and_then(|urls| urls.website)
            .and_then(|sites| sites.into_iter().find(|s| !s.trim().is_empty()));

        AssetDetail {
            name: non_blank(record.name),
            description: non_blank(record.description),
            logo_url: non_blank(record.logo),
            website_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoricalRecord {
    #[serde(default)]
    pub quotes: Vec<HistoricalEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoricalEntry {
    #[serde(default)]
    pub quote: HashMap<String, HistoricalValues>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoricalValues {
    #[serde(default)]
    pub volume_24h: Option<f64>,
}

impl HistoricalRecord {
    /// 按原顺序提取指定计价单位的 24h 成交量，缺少该字段的条目被跳过
    pub fn volumes(&self, currency: CurrencyUnit) -> Vec<f64> {
        self.quotes
            .iter()
            .filter_map(|entry| entry.quote.get(currency.as_str()))
            .filter_map(|values| values.volume_24h)
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
