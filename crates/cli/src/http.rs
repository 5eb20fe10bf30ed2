use reqwest::blocking::Client;
use reqwest::header;
use statehouse_core::config::FetchConfig;
use statehouse_core::{FetchError, PageFetcher};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Blocking HTTP fetcher for the legislature's site.
///
/// The site answers database hiccups with a 200 and a Java stack trace, so
/// bodies containing one of the configured reject markers count as transient
/// failures and are retried.
pub struct HttpFetcher {
    client: Client,
    reject_markers: Vec<String>,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/html,text/plain;q=0.9,*/*;q=0.8"),
        );
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            reject_markers: config.reject_markers.clone(),
            retries: config.retries,
        })
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        let rejected = self.reject_markers.iter().find(|marker| body.contains(marker.as_str()));
        if let Some(marker) = rejected {
            return Err(FetchError::Rejected {
                url: url.to_string(),
                marker: marker.clone(),
            });
        }
        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            debug!(url, attempt, "GET");
            match self.fetch_once(url) {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(url, attempt, error = %err, "retrying");
                    thread::sleep(backoff(attempt));
                }
                result => return result,
            }
        }
    }
}

/// Exponential delay before retry `attempt` (1-based), capped at [`MAX_BACKOFF`].
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt)).min(MAX_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(1), Duration::from_secs(2));
        assert_eq!(backoff(3), Duration::from_secs(8));
        assert_eq!(backoff(6), MAX_BACKOFF);
        assert_eq!(backoff(64), MAX_BACKOFF);
        assert_eq!(backoff(u32::MAX), MAX_BACKOFF);
    }
}
