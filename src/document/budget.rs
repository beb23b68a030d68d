/// Characters of script text embedded in a prompt when nothing else is configured.
pub const DEFAULT_CHAR_BUDGET: usize = 8_000;
pub const MIN_CHAR_BUDGET: usize = 8_000;
pub const MAX_CHAR_BUDGET: usize = 10_000;

pub fn clamp_budget(budget: usize) -> usize {
    budget.clamp(MIN_CHAR_BUDGET, MAX_CHAR_BUDGET)
}

/// First `limit` characters of `content`. Text past the limit is dropped.
pub fn truncate_chars(content: &str, limit: usize) -> &str {
    match content.char_indices().nth(limit) {
        Some((pos, _)) => &content[..pos],
        None => content,
    }
}

/// Shortened preview used by the UI, with a trailing ellipsis when cut.
pub fn preview(content: &str, limit: usize) -> String {
    let head = truncate_chars(content, limit);
    if head.len() < content.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}
