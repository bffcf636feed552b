use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

use crate::error::SinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound JSON POST. Any status is a reply; only transport failures are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, url: &str, authorization: &str, body: &Value) -> Result<HttpReply, SinkError>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("gleaner/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, authorization: &str, body: &Value) -> Result<HttpReply, SinkError> {
        let endpoint = url::Url::parse(url).map_err(|e| SinkError::Other(format!("invalid endpoint {url}: {e}")))?;
        let response = self
            .client
            .post(endpoint)
            .header(header::AUTHORIZATION, authorization)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub url: String,
        pub authorization: String,
        pub body: Value,
    }

    /// Replies from a queue; an exhausted queue behaves like a dropped connection.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<HttpReply>>,
        pub calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedTransport {
        pub fn replying(replies: Vec<(u16, &str)>) -> Self {
            Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .map(|(status, body)| HttpReply {
                            status,
                            body: body.to_string(),
                        })
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, authorization: &str, body: &Value) -> Result<HttpReply, SinkError> {
            self.calls.lock().unwrap().push(RecordedCall {
                url: url.to_string(),
                authorization: authorization.to_string(),
                body: body.clone(),
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SinkError::Other("connection reset".into()))
        }
    }
}
