use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::analysis::AnalysisOutcome;
use crate::model::{ProductionBreakdown, Severity, StandardsReport};

pub const FILE_SUFFIX: &str = "summary.txt";
pub const MIME: &str = "text/plain; charset=utf-8";

/// Plain-text review of both analyses.
pub fn render(
    filename: &str,
    standards: &AnalysisOutcome<StandardsReport>,
    production: &AnalysisOutcome<ProductionBreakdown>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SCRIPT REVIEW: {}", filename);
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    out.push('\n');

    out.push_str("== STANDARDS & PRACTICES ==\n");
    match standards {
        AnalysisOutcome::Failed { error } => {
            let _ = writeln!(out, "Analysis error: {}", error);
        }
        AnalysisOutcome::Complete(report) => write_standards(&mut out, report),
    }
    out.push('\n');

    out.push_str("== PRODUCTION DESIGN ==\n");
    match production {
        AnalysisOutcome::Failed { error } => {
            let _ = writeln!(out, "Analysis error: {}", error);
        }
        AnalysisOutcome::Complete(breakdown) => write_production(&mut out, breakdown),
    }
    out
}

fn write_standards(out: &mut String, report: &StandardsReport) {
    let summary = report.summary();
    let _ = writeln!(
        out,
        "Total: {}  Critical: {}  High: {}  Medium: {}  Low: {}",
        summary.total_violations,
        summary.critical_count,
        summary.high_count,
        summary.medium_count,
        summary.low_count,
    );

    if report.violations.is_empty() {
        out.push_str("No violations found.\n");
        return;
    }

    // most severe first, original order within a severity
    let mut index = 1;
    for severity in Severity::ALL {
        for v in report.violations.iter().filter(|v| v.severity == severity) {
            out.push('\n');
            let _ = writeln!(out, "{}. [{}] {}", index, severity.as_str().to_uppercase(), or_na(&v.violation_type));
            let page = v.page_number.map(|p| p.to_string()).unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(out, "   Page: {}", page);
            let _ = writeln!(out, "   Content: \"{}\"", or_na(&v.violation_text));
            let _ = writeln!(out, "   Issue: {}", or_na(&v.explanation));
            let _ = writeln!(out, "   Recommendation: {}", or_na(&v.suggested_action));
            index += 1;
        }
    }
}

fn write_production(out: &mut String, breakdown: &ProductionBreakdown) {
    let summary = breakdown.summary();
    let _ = writeln!(
        out,
        "Locations: {}  Scenes: {}  Props: {}",
        summary.total_locations, summary.total_scenes, summary.total_props,
    );

    for location in &breakdown.location_breakdown {
        out.push('\n');
        let _ = writeln!(
            out,
            "{} ({}) - {} scenes",
            or_na(&location.location_name),
            or_na(&location.location_type),
            location.scenes_in_location.len(),
        );
        for scene in &location.scenes_in_location {
            let number = scene.scene_number.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(out, "  Scene {}: {} [{}]", number, or_na(&scene.scene_heading), or_na(&scene.time_of_day));
            if !scene.brief_description.is_empty() {
                let _ = writeln!(out, "    {}", scene.brief_description);
            }
            if !scene.props_in_scene.is_empty() {
                let _ = writeln!(out, "    Props: {}", scene.props_in_scene.join(", "));
            }
        }
    }

    if !breakdown.unique_props.is_empty() {
        out.push('\n');
        out.push_str("Master props list:\n");
        for (i, prop) in breakdown.unique_props.iter().enumerate() {
            let _ = writeln!(out, "  {:>3}. {}", i + 1, prop);
        }
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}
