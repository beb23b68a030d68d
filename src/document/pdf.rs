use std::panic::{self, AssertUnwindSafe};

use super::ExtractError;

pub fn extract(data: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed input
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(err)) => return Err(ExtractError::processing("PDF", err)),
        Err(_) => return Err(ExtractError::processing("PDF", "malformed document")),
    };

    log::debug!("pdf decoded, {} pages", pages.len());

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}
