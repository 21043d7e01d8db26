pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod services;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::FetchError;
pub use types::*;
