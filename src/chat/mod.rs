use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod deepseek;
pub mod prompt;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Talk {
    pub role: Role,
    pub content: String,
}

impl Talk {
    pub fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }
}

/// Anything that can answer a chat conversation with a single reply.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[Talk]) -> anyhow::Result<String>;
}
