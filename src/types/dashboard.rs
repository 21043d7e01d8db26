// DashboardInput, DashboardView 及派生视图
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::collections::HashSet;

use super::{AssetDetail, AssetQuote, CurrencyUnit, Timeframe};
use crate::error::FetchError;

pub const MIN_DISPLAY_COUNT: usize = 1;
pub const MAX_DISPLAY_COUNT: usize = 100;

/// 多选框状态：未提交过表单时默认全选
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl SymbolSelection {
    pub fn includes(&self, symbol: &str) -> bool {
        match self {
            SymbolSelection::All => true,
            SymbolSelection::Only(symbols) => symbols.iter().any(|s| s == symbol),
        }
    }

    pub fn as_set(&self) -> Option<HashSet<&str>> {
        match self {
            SymbolSelection::All => None,
            SymbolSelection::Only(symbols) => Some(symbols.iter().map(String::as_str).collect()),
        }
    }
}

/// 详情下拉框状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailChoice {
    /// 未选择过，取列表第一个币种
    #[default]
    FirstListed,
    None,
    Symbol(String),
}

/// 一次渲染所需的全部用户输入，每次请求重新构造
#[derive(Debug)]
pub struct DashboardInput {
    pub currency: CurrencyUnit,
    pub api_key: SecretString,
    pub selection: SymbolSelection,
    pub display_count: usize,
    pub timeframe: Timeframe,
    pub sort_values: bool,
    pub detail: DetailChoice,
}

impl Default for DashboardInput {
    fn default() -> Self {
        Self {
            currency: CurrencyUnit::default(),
            api_key: SecretString::from(String::new()),
            selection: SymbolSelection::All,
            display_count: MAX_DISPLAY_COUNT,
            timeframe: Timeframe::default(),
            sort_values: true,
            detail: DetailChoice::FirstListed,
        }
    }
}

impl DashboardInput {
    pub fn has_credential(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    /// 解析 application/x-www-form-urlencoded 表单
    ///
    /// 非法或越界的值退回默认值或被截断到合法区间，不会报错。
    pub fn from_form(body: &[u8]) -> Self {
        let mut input = DashboardInput::default();
        let mut coins = Vec::new();
        let mut coins_present = false;

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "currency" => {
                    if let Ok(currency) = value.parse() {
                        input.currency = currency;
                    }
                }
                "api_key" => input.api_key = SecretString::from(value.trim().to_string()),
                "coins" => coins.push(value.trim().to_string()),
                "coins_present" => coins_present = true,
                "display_count" => {
                    if let Ok(count) = value.trim().parse::<i64>() {
                        input.display_count = clamp_display_count(count);
                    }
                }
                "timeframe" => {
                    if let Ok(timeframe) = value.parse() {
                        input.timeframe = timeframe;
                    }
                }
                "sort" => input.sort_values = !value.trim().eq_ignore_ascii_case("no"),
                "detail_symbol" => {
                    let value = value.trim();
                    input.detail = if value.is_empty() {
                        DetailChoice::None
                    } else {
                        DetailChoice::Symbol(value.to_string())
                    };
                }
                _ => {}
            }
        }

        if coins_present {
            input.selection = SymbolSelection::Only(coins);
        }

        input
    }
}

pub fn clamp_display_count(count: i64) -> usize {
    count.clamp(MIN_DISPLAY_COUNT as i64, MAX_DISPLAY_COUNT as i64) as usize
}

/// 涨跌幅表的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentChangeRow {
    pub symbol: String,
    pub percent_change_1h: f64,
    pub percent_change_24h: f64,
    pub percent_change_7d: f64,
    pub positive_percent_change_1h: bool,
    pub positive_percent_change_24h: bool,
    pub positive_percent_change_7d: bool,
}

impl PercentChangeRow {
    pub fn from_quote(quote: &AssetQuote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            percent_change_1h: quote.percent_change_1h,
            percent_change_24h: quote.percent_change_24h,
            percent_change_7d: quote.percent_change_7d,
            positive_percent_change_1h: quote.percent_change_1h > 0.0,
            positive_percent_change_24h: quote.percent_change_24h > 0.0,
            positive_percent_change_7d: quote.percent_change_7d > 0.0,
        }
    }

    pub fn value(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::OneHour => self.percent_change_1h,
            Timeframe::OneDay => self.percent_change_24h,
            Timeframe::SevenDays => self.percent_change_7d,
        }
    }

    pub fn is_positive(&self, timeframe: Timeframe) -> bool {
        match timeframe {
            Timeframe::OneHour => self.positive_percent_change_1h,
            Timeframe::OneDay => self.positive_percent_change_24h,
            Timeframe::SevenDays => self.positive_percent_change_7d,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PercentChangeView {
    pub rows: Vec<PercentChangeRow>,
}

impl PercentChangeView {
    pub fn symbols(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.symbol.as_str()).collect()
    }
}

/// 一次渲染的全部结果；只存在于单个请求内
#[derive(Debug, Default)]
pub struct DashboardView {
    /// `None` 表示尚未提交表单
    pub listing: Option<Result<ListingSection, FetchError>>,
}

#[derive(Debug)]
pub struct ListingSection {
    pub currency: CurrencyUnit,
    /// 多选框选项，按字母排序
    pub symbol_options: Vec<String>,
    /// 详情下拉框选项，保持列表顺序
    pub detail_options: Vec<String>,
    /// 过滤后未截断的列表，用于导出与行列统计
    pub filtered: Vec<AssetQuote>,
    /// 截断到展示数量后的列表
    pub displayed: Vec<AssetQuote>,
    pub changes: PercentChangeView,
    /// data:text/csv;base64,... 链接；编码失败时为错误信息
    pub export_href: Result<String, String>,
    pub detail: Option<DetailSection>,
}

#[derive(Debug)]
pub struct DetailSection {
    pub symbol: String,
    pub info: Result<AssetDetail, FetchError>,
    /// 7 天涨跌幅序列；`series_synthetic` 为 true 时是随机生成的占位数据
    pub synthetic: Result<Vec<f64>, FetchError>,
    pub series_synthetic: bool,
    pub volume: Result<Option<Vec<f64>>, FetchError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_defaults() {
        let input = DashboardInput::from_form(b"");
        assert_eq!(input.currency, CurrencyUnit::USD);
        assert!(!input.has_credential());
        assert_eq!(input.selection, SymbolSelection::All);
        assert_eq!(input.display_count, MAX_DISPLAY_COUNT);
        assert_eq!(input.timeframe, Timeframe::SevenDays);
        assert!(input.sort_values);
        assert_eq!(input.detail, DetailChoice::FirstListed);
    }

    #[test]
    fn test_from_form_full() {
        let body = b"currency=ETH&api_key=abc%2B123&coins=BTC&coins=ETH&coins_present=1\
&display_count=5&timeframe=24h&sort=No&detail_symbol=ETH";
        let input = DashboardInput::from_form(body);

        assert_eq!(input.currency, CurrencyUnit::ETH);
        assert_eq!(input.api_key.expose_secret(), "abc+123");
        assert_eq!(
            input.selection,
            SymbolSelection::Only(vec!["BTC".to_string(), "ETH".to_string()])
        );
        assert_eq!(input.display_count, 5);
        assert_eq!(input.timeframe, Timeframe::OneDay);
        assert!(!input.sort_values);
        assert_eq!(input.detail, DetailChoice::Symbol("ETH".to_string()));
    }

    #[test]
    fn test_from_form_empty_multiselect_selects_nothing() {
        let input = DashboardInput::from_form(b"api_key=k&coins_present=1&detail_symbol=");
        assert_eq!(input.selection, SymbolSelection::Only(vec![]));
        assert!(!input.selection.includes("BTC"));
        assert_eq!(input.detail, DetailChoice::None);
    }

    #[test]
    fn test_display_count_is_clamped() {
        assert_eq!(DashboardInput::from_form(b"display_count=0").display_count, 1);
        assert_eq!(DashboardInput::from_form(b"display_count=500").display_count, 100);
        assert_eq!(DashboardInput::from_form(b"display_count=abc").display_count, 100);
    }

    #[test]
    fn test_credential_is_redacted_in_debug() {
        let input = DashboardInput::from_form(b"api_key=super-secret-key");
        assert!(input.has_credential());
        assert!(!format!("{:?}", input).contains("super-secret-key"));
    }
}
