//! HTTP augmentation client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use leadbot_config::AugmentConfig;

use crate::LlmError;

/// Request body for the text-generation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AugmentRequest {
    pub prompt: String,
    pub context: String,
}

/// Wire response of the text-generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentedReply {
    pub response: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub fallback_used: bool,
}

/// Pluggable augmentation backend
#[async_trait]
pub trait Augmentor: Send + Sync {
    /// Attempt one enhanced reply. Implementations make a single attempt
    /// with a bounded timeout; retries are the caller's non-concern.
    async fn augment(&self, request: AugmentRequest) -> Result<AugmentedReply, LlmError>;
}

/// Augmentor backed by an HTTP text-generation endpoint
pub struct HttpAugmentor {
    client: Client,
    endpoint: String,
}

impl HttpAugmentor {
    pub fn new(config: &AugmentConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Augmentor for HttpAugmentor {
    async fn augment(&self, request: AugmentRequest) -> Result<AugmentedReply, LlmError> {
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("{status}: {body}")));
        }

        let reply: AugmentedReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if reply.response.trim().is_empty() {
            return Err(LlmError::InvalidResponse("empty response payload".to_string()));
        }

        tracing::debug!(
            confidence = ?reply.confidence,
            fallback_used = reply.fallback_used,
            "augmented reply received"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_round_trip() {
        let json = r#"{
            "response": "Here is a richer answer.",
            "confidence": 0.82,
            "reasoning": "comparison question",
            "suggestedActions": ["book_call"],
            "fallbackUsed": false
        }"#;
        let reply: AugmentedReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.response, "Here is a richer answer.");
        assert_eq!(reply.suggested_actions, vec!["book_call".to_string()]);
        assert!(!reply.fallback_used);
    }

    #[test]
    fn test_minimal_wire_shape() {
        // Only the response field is required
        let reply: AugmentedReply = serde_json::from_str(r#"{"response": "ok"}"#).unwrap();
        assert!(reply.confidence.is_none());
        assert!(reply.suggested_actions.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        let config = AugmentConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:1/llm".to_string(),
            timeout_ms: 200,
            ..Default::default()
        };
        let augmentor = HttpAugmentor::new(&config).unwrap();
        let err = augmentor
            .augment(AugmentRequest {
                prompt: "hello".to_string(),
                context: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Network(_)));
    }
}
