// CurrencyUnit, Timeframe, AssetQuote, AssetListing, AssetDetail
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 缺失字段的统一占位文本
pub const UNAVAILABLE: &str = "N/A";

pub const NO_NAME: &str = "No name available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_LOGO: &str = "No logo available.";
pub const NO_WEBSITE: &str = "No website available.";

/// 价格计价单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurrencyUnit {
    #[default]
    USD,
    BTC,
    ETH,
}

impl CurrencyUnit {
    pub const ALL: [CurrencyUnit; 3] = [CurrencyUnit::USD, CurrencyUnit::BTC, CurrencyUnit::ETH];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyUnit::USD => "USD",
            CurrencyUnit::BTC => "BTC",
            CurrencyUnit::ETH => "ETH",
        }
    }
}

impl fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(CurrencyUnit::USD),
            "BTC" => Ok(CurrencyUnit::BTC),
            "ETH" => Ok(CurrencyUnit::ETH),
            other => Err(format!("unsupported currency unit: {}", other)),
        }
    }
}

/// 涨跌幅时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
    #[default]
    #[serde(rename = "7d")]
    SevenDays,
}

impl Timeframe {
    /// 侧边栏下拉框中的顺序
    pub const SELECTOR_ORDER: [Timeframe; 3] =
        [Timeframe::SevenDays, Timeframe::OneDay, Timeframe::OneHour];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "24h",
            Timeframe::SevenDays => "7d",
        }
    }

    pub fn column_name(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "percent_change_1h",
            Timeframe::OneDay => "percent_change_24h",
            Timeframe::SevenDays => "percent_change_7d",
        }
    }

    pub fn period_caption(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1 hour period",
            Timeframe::OneDay => "24 hour period",
            Timeframe::SevenDays => "7 days period",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(Timeframe::OneHour),
            "24h" => Ok(Timeframe::OneDay),
            "7d" => Ok(Timeframe::SevenDays),
            other => Err(format!("unsupported timeframe: {}", other)),
        }
    }
}

/// 单个币种在一次拉取中的行情快照
///
/// 字段顺序即导出 CSV 的列顺序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub percent_change_1h: f64,
    pub percent_change_24h: f64,
    pub percent_change_7d: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    #[serde(default, with = "placeholder_number")]
    pub max_supply: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

impl AssetQuote {
    pub const COLUMN_COUNT: usize = 12;

    pub fn percent_change(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::OneHour => self.percent_change_1h,
            Timeframe::OneDay => self.percent_change_24h,
            Timeframe::SevenDays => self.percent_change_7d,
        }
    }

    pub fn max_supply_display(&self) -> String {
        match self.max_supply {
            Some(value) => value.to_string(),
            None => UNAVAILABLE.to_string(),
        }
    }
}

/// 一次拉取得到的有序行情列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetListing {
    pub currency: CurrencyUnit,
    pub quotes: Vec<AssetQuote>,
}

impl AssetListing {
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// 按字母排序的币种代码，供多选框使用
    pub fn sorted_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.quotes.iter().map(|q| q.symbol.clone()).collect();
        symbols.sort();
        symbols
    }

    /// 保持列表原始顺序的币种代码
    pub fn symbols(&self) -> Vec<String> {
        self.quotes.iter().map(|q| q.symbol.clone()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.quotes.iter().any(|q| q.symbol == symbol)
    }
}

/// 币种描述信息，缺失的字段保持为 `None`，展示时替换为占位文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetail {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
}

impl AssetDetail {
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.logo_url.is_none()
            && self.website_url.is_none()
    }

    pub fn name_or_placeholder(&self) -> &str {
        self.name.as_deref().unwrap_or(NO_NAME)
    }

    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }
}

/// `max_supply` 在 CSV/JSON 中的表示：数字，或缺失时的 `N/A`
mod placeholder_number {
    use super::UNAVAILABLE;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_str(UNAVAILABLE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        deserializer.deserialize_any(PlaceholderVisitor)
    }

    struct PlaceholderVisitor;

    impl<'de> Visitor<'de> for PlaceholderVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a number, null or \"{}\"", UNAVAILABLE)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() || trimmed == UNAVAILABLE {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(E::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(PlaceholderVisitor)
        }
    }
}
