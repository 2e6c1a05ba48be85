use std::time::Duration;

use serde_json::{Value, json};

use crate::{
    error::OracleError,
    oracle::{
        prompts::{FORENSIC_SYSTEM_PROMPT, frame_caption, user_prompt},
        provider::Provider,
    },
    types::SampledFrame,
};

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleConfig {
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Connection to the vision model. Build one per process and pass it to
/// whatever needs to run an analysis.
#[derive(Clone)]
pub struct OracleClient {
    http: reqwest::Client,
    provider: Provider,
    api_key: String,
    config: OracleConfig,
}

impl OracleClient {
    pub fn new(
        provider: Provider,
        api_key: impl Into<String>,
        config: OracleConfig,
    ) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            provider,
            api_key: api_key.into(),
            config,
        })
    }

    /// Read the provider's API key from the environment.
    pub fn from_env(provider: Provider, config: OracleConfig) -> Result<Self, OracleError> {
        let api_key = provider.validate_api_key()?;
        Self::new(provider, api_key, config)
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Send the frames in one request and return the model's raw text reply.
    /// There is no retry; any transport or API failure is returned as is.
    pub async fn analyze(&self, frames: &[SampledFrame]) -> Result<String, OracleError> {
        if frames.is_empty() {
            return Err(OracleError::NoFrames);
        }

        let provider_config = self.provider.config();
        tracing::info!(
            provider = self.provider.name(),
            model = provider_config.model,
            frames = frames.len(),
            "Sending frames to oracle"
        );

        let response = self
            .http
            .post(provider_config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(frames))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status { status, body });
        }

        let response = response
            .json::<Value>()
            .await
            .map_err(|e| self.transport_error(e))?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| OracleError::InvalidResponse(response.clone()))?;

        tracing::debug!(chars = content.len(), "Oracle replied");
        Ok(content.to_string())
    }

    fn request_body(&self, frames: &[SampledFrame]) -> Value {
        let mut content = vec![json!({
            "type": "text",
            "text": user_prompt(frames),
        })];

        for (position, frame) in frames.iter().enumerate() {
            content.push(json!({
                "type": "text",
                "text": frame_caption(position, frames.len(), frame),
            }));
            content.push(json!({
                "type": "image_url",
                "image_url": { "url": frame.data_url() },
            }));
        }

        json!({
            "model": self.provider.config().model,
            "messages": [
                {
                    "role": "system",
                    "content": FORENSIC_SYSTEM_PROMPT,
                },
                {
                    "role": "user",
                    "content": content,
                },
            ],
            "temperature": self.config.temperature,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> OracleError {
        if e.is_timeout() {
            OracleError::Timeout(self.config.timeout_secs)
        } else {
            OracleError::HttpError(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn frames(count: usize) -> Vec<SampledFrame> {
        (0..count)
            .map(|i| SampledFrame {
                timestamp_secs: i as f64 * 0.25,
                image: vec![0xFF, 0xD8, 0xFF],
                width: 4,
                height: 4,
                segment_index: Some(0),
                index_in_segment: Some(i),
            })
            .collect()
    }

    #[test]
    fn test_request_body_interleaves_captions_and_images() {
        let client = OracleClient::new(Provider::Openai, "key", OracleConfig::default()).unwrap();
        let body = client.request_body(&frames(3));

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");

        let content = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1 + 3 * 2);
        assert_eq!(content[1]["text"], "Frame 1/3 at 00:00.00 (segment 1, frame 1)");
        assert_eq!(content[2]["type"], "image_url");
        assert_eq!(content[2]["image_url"]["url"], "data:image/jpeg;base64,/9j/");
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_frames() {
        let client = OracleClient::new(Provider::Grok, "key", OracleConfig::default()).unwrap();
        assert_matches!(client.analyze(&[]).await, Err(OracleError::NoFrames));
    }
}
