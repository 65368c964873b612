use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::base::{PriceField, PriceRecord};
use crate::config::Settings;
use crate::market_data::Transport;

type JsonMap = serde_json::map::Map<String, Value>;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MarketDataError(pub MarketDataErrorKind);

impl MarketDataError {
    pub fn kind(&self) -> &MarketDataErrorKind {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MarketDataErrorKind {
    #[error("API unavailable, status {0}")]
    APIUnavailable(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid JSON: {0}")]
    JsonParseError(String),
    #[error("response is not a JSON object")]
    UnexpectedShape,
}

impl From<MarketDataErrorKind> for MarketDataError {
    fn from(kind: MarketDataErrorKind) -> Self {
        MarketDataError(kind)
    }
}

fn get_success(map: &JsonMap) -> bool {
    map.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Field text as the API returned it. Strings are kept verbatim, other
/// scalars use their JSON text, `null` counts as absent.
fn get_field_text(map: &JsonMap, field: PriceField) -> Option<String> {
    match map.get(field.json_key())? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalizes a priceoverview body. A body reporting `success: false` keeps
/// whatever fields it carries.
pub fn parse_price_record(body: &str) -> Result<PriceRecord, MarketDataError> {
    let value = serde_json::from_str::<Value>(body)
        .map_err(|err| MarketDataError(MarketDataErrorKind::JsonParseError(err.to_string())))?;
    let map = value.as_object().ok_or(MarketDataError(MarketDataErrorKind::UnexpectedShape))?;

    let mut record = PriceRecord { success: get_success(map), ..Default::default() };
    for field in PriceField::ALL.iter() {
        record.set(*field, get_field_text(map, *field));
    }
    Ok(record)
}

/// Fetches one item. Never fails: any error yields `PriceRecord::unavailable()`.
pub fn fetch_price<T: Transport + ?Sized>(transport: &T, namespace: &str, item_name: &str, settings: &Settings) -> PriceRecord {
    let query = [
        ("appid", namespace),
        ("market_hash_name", item_name),
        ("currency", settings.currency.as_str()),
    ];
    debug!(url = %settings.url, appid = namespace, item = item_name, "requesting price overview");

    match transport.get(&settings.url, &query).and_then(|body| parse_price_record(&body)) {
        Ok(record) => record,
        Err(err) => {
            warn!(item = item_name, "unable to fetch price data: {}", err);
            PriceRecord::unavailable()
        }
    }
}
