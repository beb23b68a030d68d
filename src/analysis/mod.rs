//! The two script analyses and their outcomes.

pub mod parser;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::chat::{prompt, Completion};
use crate::document::budget::preview;
use crate::model::{ProductionBreakdown, StandardsReport};
use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AnalysisKind {
    Standards,
    Production,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 2] = [AnalysisKind::Standards, AnalysisKind::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Standards => "standards",
            AnalysisKind::Production => "production",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis. A failure is data, not an `Err`: it is shown to the
/// user and the rest of the pipeline carries on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome<T> {
    Complete(T),
    Failed { error: String },
}

impl<T: DeserializeOwned> AnalysisOutcome<T> {
    /// Converts a parsed reply. Any `error` key wins over the rest of the object.
    pub fn from_value(value: Value) -> Self {
        if let Some(error) = parser::error_of(&value) {
            return AnalysisOutcome::failed(error);
        }
        match serde_json::from_value::<T>(value) {
            Ok(result) => AnalysisOutcome::Complete(result),
            Err(err) => AnalysisOutcome::failed(format!("Unexpected response shape: {}", err)),
        }
    }

    pub fn from_reply(raw: &str) -> Self {
        Self::from_value(parser::parse_response(raw))
    }
}

impl<T> AnalysisOutcome<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        AnalysisOutcome::Failed { error: error.into() }
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            AnalysisOutcome::Complete(result) => Some(result),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Complete(_) => None,
            AnalysisOutcome::Failed { error } => Some(error),
        }
    }
}

pub const NO_TEXT: &str = "No text content found";
pub const NOT_REQUESTED: &str = "Analysis not requested";

const PREVIEW_CHARS: usize = 1000;

/// Everything learned about one uploaded script.
#[derive(Debug, Clone)]
pub struct ScriptAnalysis {
    pub filename: String,
    pub char_count: usize,
    pub preview: String,
    pub standards: AnalysisOutcome<StandardsReport>,
    pub production: AnalysisOutcome<ProductionBreakdown>,
    pub analyzed_at: DateTime<Utc>,
}

pub struct Analyzer<'a, C: Completion + ?Sized> {
    client: &'a C,
    config: &'a Config,
}

impl<'a, C: Completion + ?Sized> Analyzer<'a, C> {
    pub fn new(client: &'a C, config: &'a Config) -> Self {
        Self { client, config }
    }

    pub async fn analyze_standards(&self, text: &str) -> AnalysisOutcome<StandardsReport> {
        self.analyze(AnalysisKind::Standards, text).await
    }

    pub async fn analyze_production(&self, text: &str) -> AnalysisOutcome<ProductionBreakdown> {
        self.analyze(AnalysisKind::Production, text).await
    }

    /// Runs the requested analyses one after the other.
    pub async fn run(&self, filename: &str, text: &str, kinds: &[AnalysisKind]) -> ScriptAnalysis {
        let standards = if kinds.contains(&AnalysisKind::Standards) {
            self.analyze_standards(text).await
        } else {
            AnalysisOutcome::failed(NOT_REQUESTED)
        };
        let production = if kinds.contains(&AnalysisKind::Production) {
            self.analyze_production(text).await
        } else {
            AnalysisOutcome::failed(NOT_REQUESTED)
        };

        ScriptAnalysis {
            filename: filename.to_string(),
            char_count: text.chars().count(),
            preview: preview(text, PREVIEW_CHARS),
            standards,
            production,
            analyzed_at: Utc::now(),
        }
    }

    async fn analyze<T: DeserializeOwned>(&self, kind: AnalysisKind, text: &str) -> AnalysisOutcome<T> {
        if text.trim().is_empty() {
            return AnalysisOutcome::failed(NO_TEXT);
        }

        log::info!("running {} analysis on {} chars", kind, text.chars().count());
        let messages = prompt::build_messages(kind, text, self.config);

        match self.client.complete(&messages).await {
            Ok(reply) => {
                let outcome = AnalysisOutcome::from_reply(&reply);
                if let Some(error) = outcome.error() {
                    log::warn!("{} analysis failed: {}", kind, error);
                }
                outcome
            }
            Err(err) => {
                log::error!("{} analysis request failed: {:#}", kind, err);
                AnalysisOutcome::failed(format!("API call failed: {:#}", err))
            }
        }
    }
}
