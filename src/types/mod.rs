pub mod market;
pub mod api_types;
pub mod dashboard;

pub use market::*;
pub use api_types::*;
pub use dashboard::*;
