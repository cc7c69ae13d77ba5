use crate::results::ProductRecord;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Error sending request to sink: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sink answered with a non-success status
    #[error("sink rejected the payload with status {status}")]
    Rejected { status: u16, body: String },
}

/// Posts scraped records to the downstream endpoint as a JSON array
#[derive(Debug, Clone)]
pub struct SinkClient {
    http: reqwest::Client,
    url: String,
}

impl SinkClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends `records` and returns the sink's response text
    pub async fn deliver(&self, records: &[ProductRecord]) -> Result<String, DeliveryError> {
        ::log::info!("Sending {} records to {}", records.len(), self.url);

        let response = self.http.post(&self.url).json(records).send().await?;
        let status = response.status();
        let body = response.text().await?;
        ::log::debug!("Sink response ({}): {}", status, body);

        if status.is_success() {
            Ok(body)
        } else {
            ::log::warn!("Sink rejected payload with status {}", status);
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
