//! 数据处理工具模块
//!
//! 包含行情列表的过滤、截断、排序以及 CSV 导出

pub mod listing_processor;
pub mod export;

pub use listing_processor::ListingProcessor;
pub use export::{ExportCodec, ExportError};
