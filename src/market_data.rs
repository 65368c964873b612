pub mod api_parser;
pub mod collector;
pub mod transport;

pub use api_parser::{fetch_price, parse_price_record, MarketDataError, MarketDataErrorKind};
pub use collector::{collect_all, collect_all_with};
pub use transport::HttpTransport;

/// Query parameters for one priceoverview request, in request order
pub type QueryParams<'a> = [(&'a str, &'a str)];

/// Blocking HTTP GET capability.
///
/// Implementations return the body of a successful response and an error for
/// any non-success status or transport failure.
pub trait Transport {
    fn get(&self, url: &str, query: &QueryParams) -> Result<String, MarketDataError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, query: &QueryParams) -> Result<String, MarketDataError> {
        (**self).get(url, query)
    }
}
