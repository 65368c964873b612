use std::time::Duration;

use tracing::debug;

use super::{MarketDataError, MarketDataErrorKind, QueryParams, Transport};

/// `ureq` backed transport. One agent is reused for every request of a run.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .build();
        HttpTransport { agent }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &QueryParams) -> Result<String, MarketDataError> {
        let request = query
            .iter()
            .fold(self.agent.get(url), |request, (key, value)| request.query(key, value));

        match request.call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|err| MarketDataError(MarketDataErrorKind::Transport(err.to_string()))),
            Err(ureq::Error::Status(code, resp)) => {
                debug!(status = code, status_text = resp.status_text(), "price overview request rejected");
                Err(MarketDataError(MarketDataErrorKind::APIUnavailable(code)))
            }
            Err(err) => Err(MarketDataError(MarketDataErrorKind::Transport(err.to_string()))),
        }
    }
}
