//! CSV 导出
//!
//! 过滤后的行情列表 → 带表头的 CSV → base64，作为 data URL 供页面下载。
//! 编码结果可以完整解码回原始行。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::types::AssetQuote;

pub const EXPORT_FILE_NAME: &str = "crypto.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV writer error: {0}")]
    Writer(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// CSV 编解码工具
pub struct ExportCodec;

impl ExportCodec {
    /// 带表头的 CSV 文本，列顺序与 AssetQuote 字段顺序一致
    pub fn to_csv(quotes: &[AssetQuote]) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        if quotes.is_empty() {
            writer.write_record(Self::header())?;
        }
        for quote in quotes {
            writer.serialize(quote)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Writer(e.to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }

    pub fn from_csv(text: &str) -> Result<Vec<AssetQuote>, ExportError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut quotes = Vec::new();
        for record in reader.deserialize() {
            quotes.push(record?);
        }
        Ok(quotes)
    }

    pub fn encode_listing(quotes: &[AssetQuote]) -> Result<String, ExportError> {
        Ok(STANDARD.encode(Self::to_csv(quotes)?))
    }

    pub fn decode_listing(payload: &str) -> Result<Vec<AssetQuote>, ExportError> {
        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_csv(&String::from_utf8(bytes)?)
    }

    pub fn download_href(quotes: &[AssetQuote]) -> Result<String, ExportError> {
        Ok(format!("data:text/csv;base64,{}", Self::encode_listing(quotes)?))
    }

    fn header() -> [&'static str; AssetQuote::COLUMN_COUNT] {
        [
            "symbol",
            "name",
            "price",
            "percent_change_1h",
            "percent_change_24h",
            "percent_change_7d",
            "market_cap",
            "volume_24h",
            "circulating_supply",
            "total_supply",
            "max_supply",
            "last_updated",
        ]
    }
}
