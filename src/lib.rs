pub mod base;
pub mod config;
pub mod market_data;
pub mod sheet;

pub use crate::base::{PriceField, PriceRecord, ResultSet, PLACEHOLDER};
pub use crate::config::{Catalog, ConfigError, Settings};
