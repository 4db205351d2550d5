use crate::config::CatalogConfig;
use crate::error::FetchError;
use lazy_static::lazy_static;
use log::debug;
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;
use tokio::time::{Duration, Instant};

// The catalog asks clients to identify themselves in this header as well
const AIC_USER_AGENT: &str = "aic-user-agent";
const ACCEPT: &str = "application/json";
const MAX_API_HISTORY: usize = 100;

#[derive(Debug, Clone)]
pub struct ApiCall {
    pub url: String,
    pub timestamp: OffsetDateTime,
    pub status_code: u16,
    pub success: bool,
}

// Blocking mutexes: the locks are only held to book a slot or push a record
lazy_static! {
    static ref LAST_ARTIC_CALL: Mutex<Option<Instant>> = Mutex::new(None);
    static ref API_CALL_HISTORY: Mutex<Vec<ApiCall>> = Mutex::new(Vec::new());
}

#[derive(Debug)]
pub struct ArticClient {
    client: reqwest::Client,
    base_url: String,
    cooldown: Duration,
}

impl ArticClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let user_agent = reqwest::header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FetchError::Source(format!("Invalid user agent: {}", e)))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::USER_AGENT, user_agent.clone());
        headers.insert(
            reqwest::header::HeaderName::from_static(AIC_USER_AGENT),
            user_agent,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(ArticClient {
            client,
            base_url: config.base_url().to_string(),
            cooldown: config.request_cooldown(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET, spaced from the previous one by the configured cooldown.
    /// Non-success statuses come back as `FetchError::Status`.
    pub async fn call(&self, uri: &str) -> Result<reqwest::Response, FetchError> {
        self.wait_for_slot().await;
        debug!("calling artic API: {}", uri);

        let timestamp = OffsetDateTime::now_utc();
        match self.client.get(uri).send().await {
            Ok(response) => {
                let status = response.status();
                record_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: status.as_u16(),
                    success: status.is_success(),
                });

                if !status.is_success() {
                    return Err(FetchError::Status {
                        status: status.as_u16(),
                        url: uri.to_string(),
                    });
                }
                Ok(response)
            }
            Err(e) => {
                record_call(ApiCall {
                    url: uri.to_string(),
                    timestamp,
                    status_code: 0, // no response to take a status from
                    success: false,
                });
                Err(FetchError::Network(e))
            }
        }
    }

    async fn wait_for_slot(&self) {
        if self.cooldown.is_zero() {
            return;
        }
        let slot = {
            let mut last = LAST_ARTIC_CALL
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match *last {
                Some(previous) => (previous + self.cooldown).max(now),
                None => now,
            };
            *last = Some(slot);
            slot
        };
        tokio::time::sleep_until(slot).await;
    }

    /// Get the API call history for debugging purposes
    pub fn api_call_history() -> Vec<ApiCall> {
        API_CALL_HISTORY
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_api_call_history() {
        API_CALL_HISTORY
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn record_call(api_call: ApiCall) {
    let mut history = API_CALL_HISTORY
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    history.push(api_call);
    if history.len() > MAX_API_HISTORY {
        let excess = history.len() - MAX_API_HISTORY;
        history.drain(0..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_trimmed_base_url() {
        let config = CatalogConfig {
            base_url: "http://localhost:9999/api/v1/".to_string(),
            ..CatalogConfig::default()
        };
        let client = ArticClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/api/v1");
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = CatalogConfig {
            user_agent: "bad\nagent".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            ArticClient::new(&config),
            Err(FetchError::Source(_))
        ));
    }

    #[test]
    fn test_history_is_bounded() {
        for i in 0..(MAX_API_HISTORY + 20) {
            record_call(ApiCall {
                url: format!("http://example.com/{}", i),
                timestamp: OffsetDateTime::now_utc(),
                status_code: 200,
                success: true,
            });
        }
        assert!(ArticClient::api_call_history().len() <= MAX_API_HISTORY);

        ArticClient::clear_api_call_history();
        assert!(ArticClient::api_call_history().is_empty());
    }
}
