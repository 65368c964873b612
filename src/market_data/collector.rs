use std::thread;
use std::time::Duration;

use tracing::info;

use crate::base::ResultSet;
use crate::config::Settings;
use super::{api_parser, Transport};

/// Fetches every catalog item past `settings.offset`, sleeping `settings.delay`
/// after each fetch
pub fn collect_all<T: Transport + ?Sized>(transport: &T, settings: &Settings) -> ResultSet {
    collect_all_with(transport, settings, thread::sleep)
}

/// Like `collect_all`, with the pause between fetches supplied by the caller
pub fn collect_all_with<T, P>(transport: &T, settings: &Settings, mut pause: P) -> ResultSet
where
    T: Transport + ?Sized,
    P: FnMut(Duration),
{
    info!("*** GETTING ITEMS ***");
    let mut results = ResultSet::new();

    // Skipped entries still count towards the offset
    for (namespace, item) in settings.items.pairs().skip(settings.offset) {
        let record = api_parser::fetch_price(transport, namespace, item, settings);
        if record.success {
            info!("Got: {}", item);
        } else {
            info!("Failed: {}", item);
        }
        results.insert(item.to_owned(), record);
        pause(settings.delay);
    }

    results
}
