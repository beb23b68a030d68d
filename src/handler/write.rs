use std::path::{Path, PathBuf};
use anyhow::Context;
use crate::analysis::{AnalysisKind, AnalysisOutcome, ScriptAnalysis};
use crate::model::{ProductionBreakdown, StandardsReport};
use crate::report::{download_name, production, standards, summary};

/// Writes every report the analysis supports, returning the paths written.
pub fn write_reports(out_dir: &Path, analysis: &ScriptAnalysis) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(report) = analysis.standards.result() {
        let path = out_dir.join(download_name(&analysis.filename, standards::FILE_SUFFIX));
        std::fs::write(&path, standards::generate(&report.violations)?)?;
        written.push(path);
    }

    if let Some(breakdown) = analysis.production.result() {
        let path = out_dir.join(download_name(&analysis.filename, production::FILE_SUFFIX));
        std::fs::write(&path, production::generate(breakdown)?)?;
        written.push(path);
    }

    let text = summary::render(&analysis.filename, &analysis.standards, &analysis.production, analysis.analyzed_at);
    let path = out_dir.join(download_name(&analysis.filename, summary::FILE_SUFFIX));
    std::fs::write(&path, text)?;
    written.push(path);

    Ok(written)
}

pub fn render_reply(reply: &Path, kind: AnalysisKind, out: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(reply)
        .with_context(|| format!("Failed to read {}", reply.display()))?;
    let stem = reply
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("reply");

    let (bytes, suffix) = match kind {
        AnalysisKind::Standards => match AnalysisOutcome::<StandardsReport>::from_reply(&raw) {
            AnalysisOutcome::Complete(report) => (standards::generate(&report.violations)?, standards::FILE_SUFFIX),
            AnalysisOutcome::Failed { error } => anyhow::bail!("Analysis error: {}", error),
        },
        AnalysisKind::Production => match AnalysisOutcome::<ProductionBreakdown>::from_reply(&raw) {
            AnalysisOutcome::Complete(breakdown) => (production::generate(&breakdown)?, production::FILE_SUFFIX),
            AnalysisOutcome::Failed { error } => anyhow::bail!("Analysis error: {}", error),
        },
    };

    let path = out.unwrap_or_else(|| PathBuf::from(download_name(stem, suffix)));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Report written: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn temp_dir() -> anyhow::Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("scriptreview-out-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    #[test]
    fn test_write_reports_names() -> anyhow::Result<()> {
        let dir = temp_dir()?;
        let analysis = ScriptAnalysis {
            filename: "pilot.pdf".to_string(),
            char_count: 10,
            preview: "INT. HOUSE".to_string(),
            standards: AnalysisOutcome::Complete(StandardsReport::default()),
            production: AnalysisOutcome::failed("Invalid JSON response from API"),
            analyzed_at: Utc::now(),
        };

        let written = write_reports(&dir, &analysis)?;
        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["pilot.pdf_standards_report.xlsx", "pilot.pdf_summary.txt"]);
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_render_reply() -> anyhow::Result<()> {
        let dir = temp_dir()?;
        let reply = dir.join("reply.txt");
        std::fs::write(&reply, "```json\n{\"unique_props\": [\"lamp\"]}\n```")?;
        let out = dir.join("out.xlsx");
        render_reply(&reply, AnalysisKind::Production, Some(out.clone()))?;
        assert!(out.exists());

        std::fs::write(&reply, "not json")?;
        let err = render_reply(&reply, AnalysisKind::Standards, None).unwrap_err();
        assert_eq!(err.to_string(), "Analysis error: Invalid JSON response from API");
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
