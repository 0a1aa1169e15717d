//! HBase JMX HTTP 클라이언트
//!
//! One GET per scrape against `<base-url>?qry=<query>`, bounded by the
//! client timeout and aborted early when the cycle's cancellation token fires.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

use super::parser::CollectResult;
use crate::error::CollectorError;

/// JMX servlet client bound to one endpoint
#[derive(Clone)]
pub struct JmxClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl JmxClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - JMX servlet URL (예: "http://localhost:60030/jmx")
    /// * `timeout_ms` - 요청 타임아웃 (밀리초)
    pub fn new(base_url: &str, timeout_ms: u64) -> CollectResult<Self> {
        let parsed = Url::parse(base_url).map_err(|source| CollectorError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: parsed,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// The configured endpoint
    pub fn endpoint(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base-url>?qry=<query>`
    pub fn query_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!("qry={}", query)));
        url
    }

    /// Fetch the raw body of one JMX query
    ///
    /// Fails with `Transport` on connection/DNS errors, `HttpStatus` on any
    /// non-200 response, `Timeout` when the client timeout elapses and
    /// `Cancelled` when `cancel` fires first.
    #[instrument(skip(self, cancel), fields(endpoint = %self.base_url))]
    pub async fn fetch(&self, query: &str, cancel: &CancellationToken) -> CollectResult<Vec<u8>> {
        let url = self.query_url(query);
        debug!(url = %url, "Sending JMX query");

        let request = async {
            let response = self.client.get(url).send().await.map_err(|e| self.classify(e))?;

            let status = response.status();
            if status != reqwest::StatusCode::OK {
                return Err(CollectorError::HttpStatus(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| self.classify(e))?;
            Ok(body.to_vec())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CollectorError::Cancelled),
            result = request => result,
        }
    }

    fn classify(&self, err: reqwest::Error) -> CollectorError {
        if err.is_timeout() {
            CollectorError::timeout_with_duration(self.timeout.as_millis() as u64)
        } else {
            CollectorError::from(err)
        }
    }
}
