//! What the notifier does when the schedule comes due

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{NotifyError, NotifyResult};

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

/// Action performed once per scheduled firing
#[async_trait]
pub trait NotificationTrigger: Send + Sync {
    async fn fire(&self) -> NotifyResult<Delivery>;
}

/// POSTs an empty JSON object to the notification endpoint
#[derive(Debug, Clone)]
pub struct HttpTrigger {
    client: reqwest::Client,
    url: String,
}

impl HttpTrigger {
    pub fn new(url: impl Into<String>, timeout: Duration) -> NotifyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationTrigger for HttpTrigger {
    async fn fire(&self) -> NotifyResult<Delivery> {
        let response = self.client.post(&self.url).json(&json!({})).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Delivery {
            status: status.as_u16(),
            body,
        })
    }
}
