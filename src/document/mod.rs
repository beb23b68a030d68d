pub mod budget;
pub mod docx;
pub mod pdf;
pub mod txt;

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

/// Extensions offered by the upload form.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Error reading {kind}: {message}")]
    Processing { kind: &'static str, message: String },
}

impl ExtractError {
    pub fn processing(kind: &'static str, err: impl std::fmt::Display) -> Self {
        ExtractError::Processing {
            kind,
            message: err.to_string(),
        }
    }
}

/// Lower-cased extension with its leading dot, or an empty string.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Decodes an uploaded script into plain text, picking the decoder by extension.
pub fn extract_text(data: &[u8], filename: &str) -> Result<String, ExtractError> {
    let ext = extension_of(filename);
    log::debug!("extracting {} ({} bytes) as '{}'", filename, data.len(), ext);

    match ext.as_str() {
        ".pdf" => pdf::extract(data),
        ".docx" | ".doc" => docx::extract(data),
        ".txt" => txt::extract(data),
        _ => Err(ExtractError::UnsupportedType(ext)),
    }
}

pub fn extract_file(path: &Path) -> anyhow::Result<String> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    Ok(extract_text(&data, filename)?)
}
