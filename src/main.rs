use clap::Parser;
use dotenv::dotenv;
use handler::Cli;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

mod analysis;
mod auth;
mod chat;
mod document;
mod handler;
mod model;
mod report;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();
    let config = read_config()?;
    let args = Cli::parse();
    handler::handler(args, config).await?;
    Ok(())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    // Chat
    deepseek_url: String,
    deepseek_chat_model: String,
    deepseek_api_key: String,
    temperature: f32,
    json_mode: bool,
    request_timeout_secs: u64,

    // Prompt
    char_budget: usize,
    standards_system_prompt: String,
    production_system_prompt: String,

    // Access
    authorized_domains: Vec<String>,
    admin_emails: Vec<String>,

    // Server
    bind_addr: String,
    max_upload_mb: usize,
    session_idle_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepseek_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            deepseek_chat_model: "deepseek-chat".to_string(),
            deepseek_api_key: String::new(),
            temperature: 0.1,
            json_mode: false,
            request_timeout_secs: 120,
            char_budget: document::budget::DEFAULT_CHAR_BUDGET,
            standards_system_prompt: "You are a film standards and practices expert. \
                Analyze scripts for content violations and return only valid JSON."
                .to_string(),
            production_system_prompt: "You are a film production coordinator. \
                Extract production elements from scripts and return only valid JSON."
                .to_string(),
            authorized_domains: auth::DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            admin_emails: vec!["admin@hoichoi.tv".to_string(), "sp@hoichoi.tv".to_string()],
            bind_addr: "127.0.0.1:8501".to_string(),
            max_upload_mb: 25,
            session_idle_minutes: web::DEFAULT_IDLE_MINUTES,
        }
    }
}

fn read_config() -> anyhow::Result<Config> {
    Ok(config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("SCRIPTREVIEW").try_parsing(true))
        .build()?
        .try_deserialize::<Config>()?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scriptreview=info,tower_http=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config() -> anyhow::Result<()> {
        let config = read_config()?;
        assert!(!config.deepseek_url.is_empty());
        assert!(config.authorized_domains.iter().any(|d| d == "@hoichoi.tv"));
        println!("{:?}", config.bind_addr);
        Ok(())
    }

    #[test]
    fn test_default_prompts() {
        let config = Config::default();
        assert!(config.standards_system_prompt.contains("standards and practices"));
        assert!(config.production_system_prompt.contains("production coordinator"));
        assert_eq!(config.char_budget, 8000);
    }
}
