use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Completion, Talk};
use crate::Config;

pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    temperature: f32,
    format: FormatType,
}

impl ChatClient {
    /// Builds a client from config, with `api_key` replacing the configured key when given.
    pub fn from_config(config: &Config, api_key: Option<&str>) -> anyhow::Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(config.deepseek_api_key.as_str())
            .trim()
            .to_string();
        if api_key.is_empty() {
            anyhow::bail!("API key is required");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: config.deepseek_chat_model.clone(),
            url: config.deepseek_url.clone(),
            temperature: config.temperature,
            format: if config.json_mode { FormatType::JsonObject } else { FormatType::Text },
        })
    }

    pub async fn get_completion(&self, messages: &[Talk]) -> anyhow::Result<String> {
        let request = DSRequest {
            messages: messages.to_vec(),
            model: self.model.clone(),
            temperature: self.temperature,
            response_format: Format {
                format_type: self.format,
            },
        };
        log::debug!("sending {} messages to {}", request.messages.len(), self.url);

        let response = self.client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .with_context(|| "Failed to send request to Deepseek API")?;

        if response.status() != 200 {
            return Err(anyhow::anyhow!(
                "Request failed:\n\tstatus: {}\n\tbody: {}",
                response.status(),
                response.text().await?
            ));
        }

        let response_body: DSResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Deepseek API response.")?;

        response_body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("Deepseek API returned no choices"))
    }
}

#[async_trait]
impl Completion for ChatClient {
    async fn complete(&self, messages: &[Talk]) -> anyhow::Result<String> {
        self.get_completion(messages).await
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    Text,
    JsonObject,
}

#[derive(Deserialize, Serialize, Debug)]
struct Format {
    #[serde(rename = "type")]
    format_type: FormatType,
}

#[derive(Deserialize, Serialize, Debug)]
struct Choice {
    message: Talk,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct DSRequest {
    messages: Vec<Talk>,
    model: String,
    temperature: f32,
    response_format: Format,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct DSResponse {
    choices: Vec<Choice>,
}
