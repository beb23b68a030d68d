//! Server-rendered HTML for the login screen and the three tabs.

use std::fmt::Write;

use crate::analysis::{AnalysisOutcome, ScriptAnalysis};
use crate::model::{ProductionBreakdown, StandardsReport};
use crate::web::session::{Level, Notice, Session};

const TITLE: &str = "Film Production Master App";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 260px; background: #f8f9fa; padding: 1rem; border-right: 1px solid #ddd; }
main { flex: 1; padding: 1.5rem 2rem; }
.main-header { background: linear-gradient(90deg, #ff6b6b, #4ecdc4); padding: 1rem; border-radius: 10px; color: white; text-align: center; margin-bottom: 1.5rem; }
.user-info { background: white; padding: 1rem; border-radius: 10px; border-left: 4px solid #007bff; }
.tabs a { display: inline-block; padding: .5rem 1rem; margin-right: .25rem; border-radius: 6px 6px 0 0; background: #eee; color: #333; text-decoration: none; }
.tabs a.active { background: #4ecdc4; color: white; }
.panel { border-top: 2px solid #4ecdc4; padding-top: 1rem; }
.metrics { display: flex; gap: 1rem; margin: 1rem 0; }
.metric { background: #f8f9fa; padding: .75rem 1.25rem; border-radius: 8px; }
.metric b { display: block; font-size: 1.5rem; }
.notice { padding: .75rem; border-radius: 6px; margin: .5rem 0; }
.notice-success { background: #e8f5e9; } .notice-info { background: #e3f2fd; } .notice-error { background: #ffebee; }
.violation-critical { background-color: #ffebee; border-left: 5px solid #f44336; padding: 10px; margin: 5px 0; border-radius: 5px; }
.violation-high { background-color: #fff3e0; border-left: 5px solid #ff9800; padding: 10px; margin: 5px 0; border-radius: 5px; }
.violation-medium { background-color: #fffde7; border-left: 5px solid #ffeb3b; padding: 10px; margin: 5px 0; border-radius: 5px; }
.violation-low { background-color: #f3e5f5; border-left: 5px solid #9c27b0; padding: 10px; margin: 5px 0; border-radius: 5px; }
table { border-collapse: collapse; } td, th { border: 1px solid #ddd; padding: .3rem .6rem; text-align: left; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Standards,
    Production,
}

impl Tab {
    const ALL: [(Tab, &'static str, &'static str); 3] = [
        (Tab::Upload, "upload", "📤 Upload Script"),
        (Tab::Standards, "standards", "📝 Standards &amp; Practices"),
        (Tab::Production, "production", "🎬 Production Design"),
    ];
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape(value)
    }
}

/// Title-cases each word, as used for violation headings.
fn title(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{TITLE}</title><style>{STYLE}</style></head><body>{body}</body></html>"
    )
}

fn notices_html(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        let (class, icon) = match notice.level {
            Level::Success => ("notice-success", "✅"),
            Level::Info => ("notice-info", "ℹ️"),
            Level::Error => ("notice-error", "❌"),
        };
        let _ = write!(out, "<div class=\"notice {}\">{} {}</div>", class, icon, escape(&notice.message));
    }
    out
}

pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| notices_html(&[Notice::new(Level::Error, e)]))
        .unwrap_or_default();
    layout(&format!(
        r#"<main><div class="main-header"><h1>🎬 {TITLE}</h1><h3>Standards &amp; Practices + Production Design</h3></div>
<h2>🔐 Login Required</h2>{error}
<form method="post" action="/login">
<p><label>Email Address<br><input type="email" name="email" placeholder="yourname@hoichoi.tv" required></label></p>
<p><label>Password<br><input type="password" name="password" required></label></p>
<p><button type="submit">Login</button></p>
</form></main>"#
    ))
}

fn sidebar(session: &Session, config_key: bool) -> String {
    let user = &session.user;
    let role = if user.is_admin { "Admin" } else { "User" };
    let key_block = if session.api_key.is_some() {
        r#"<p>✅ DeepSeek API Key: Configured</p>
<form method="post" action="/api-key/clear"><button type="submit">🔄 Change API Key</button></form>"#
            .to_string()
    } else {
        let status = if config_key {
            "✅ DeepSeek API Key: Server default"
        } else {
            "⚠️ DeepSeek API Key: Not configured"
        };
        format!(
            r#"<p>{status}</p>
<form method="post" action="/api-key"><input type="password" name="api_key" placeholder="Enter DeepSeek API Key"> <button type="submit">Save</button></form>"#
        )
    };

    format!(
        r#"<aside><div class="user-info"><h3>👤 User Information</h3>
<p><b>Name:</b> {}</p><p><b>Email:</b> {}</p><p><b>Role:</b> {}</p></div>
<hr><h4>🔑 API Configuration</h4>{}
<hr><form method="post" action="/logout"><button type="submit">🚪 Logout</button></form></aside>"#,
        escape(&user.name),
        escape(&user.email),
        role,
        key_block,
    )
}

fn upload_tab(analysis: Option<&ScriptAnalysis>) -> String {
    let mut out = String::from(
        r#"<h2>📤 Upload Script</h2><p>Upload your script file for analysis</p>
<form method="post" action="/analyze" enctype="multipart/form-data">
<p><input type="file" name="script" accept=".pdf,.docx,.txt" required></p>
<p><small>Supported formats: PDF, DOCX, TXT</small></p>
<p><button type="submit">🔍 Analyze Script</button></p></form>"#,
    );
    if let Some(analysis) = analysis {
        let _ = write!(
            out,
            "<h3>Last analysis</h3><p>📄 {} ({} characters)</p><details><summary>Script preview</summary><pre>{}</pre></details>",
            escape(&analysis.filename),
            analysis.char_count,
            escape(&analysis.preview),
        );
    }
    out
}

fn metric(label: &str, value: u64) -> String {
    format!("<div class=\"metric\">{}<b>{}</b></div>", label, value)
}

fn standards_tab(analysis: Option<&ScriptAnalysis>) -> String {
    let Some(analysis) = analysis else {
        return notices_html(&[Notice::new(
            Level::Info,
            "Upload and analyze a script first to see Standards & Practices results",
        )]);
    };

    let mut out = String::from("<h2>📝 Standards &amp; Practices Review</h2>");
    let report: &StandardsReport = match &analysis.standards {
        AnalysisOutcome::Failed { error } => {
            out.push_str(&notices_html(&[Notice::new(Level::Error, format!("Analysis error: {}", error))]));
            return out;
        }
        AnalysisOutcome::Complete(report) => report,
    };

    let summary = report.summary();
    let _ = write!(
        out,
        "<div class=\"metrics\">{}{}{}{}</div>",
        metric("Total Violations", summary.total_violations),
        metric("Critical", summary.critical_count),
        metric("High", summary.high_count),
        metric("Medium", summary.medium_count),
    );

    if report.violations.is_empty() {
        out.push_str(&notices_html(&[Notice::new(Level::Success, "No violations found!")]));
    } else {
        out.push_str("<h3>🚨 Violations Found</h3>");
        for (i, v) in report.violations.iter().enumerate() {
            let kind = if v.violation_type.trim().is_empty() { "Unknown" } else { v.violation_type.as_str() };
            let page = v.page_number.map(|p| p.to_string()).unwrap_or_else(|| "N/A".to_string());
            let _ = write!(
                out,
                r#"<div class="violation-{sev}"><h4>{n}. {kind} Violation</h4>
<p><strong>Severity:</strong> {sev_upper}</p><p><strong>Page:</strong> {page}</p>
<p><strong>Content:</strong> "{text}"</p><p><strong>Issue:</strong> {issue}</p>
<p><strong>Recommendation:</strong> {action}</p></div>"#,
                sev = v.severity.as_str(),
                n = i + 1,
                kind = escape(&title(kind)),
                sev_upper = v.severity.as_str().to_uppercase(),
                page = page,
                text = or_na(&v.violation_text),
                issue = or_na(&v.explanation),
                action = or_na(&v.suggested_action),
            );
        }
    }

    out.push_str("<h3>📥 Download Report</h3><p>");
    if !report.violations.is_empty() {
        out.push_str(r#"<a href="/download/standards">📊 Download Standards Report</a> · "#);
    }
    out.push_str(r#"<a href="/download/summary">📄 Download Summary</a></p>"#);
    out
}

fn production_tab(analysis: Option<&ScriptAnalysis>) -> String {
    let Some(analysis) = analysis else {
        return notices_html(&[Notice::new(
            Level::Info,
            "Upload and analyze a script first to see Production Design results",
        )]);
    };

    let mut out = String::from("<h2>🎬 Production Design Breakdown</h2>");
    let breakdown: &ProductionBreakdown = match &analysis.production {
        AnalysisOutcome::Failed { error } => {
            out.push_str(&notices_html(&[Notice::new(Level::Error, format!("Analysis error: {}", error))]));
            return out;
        }
        AnalysisOutcome::Complete(breakdown) => breakdown,
    };

    let summary = breakdown.summary();
    let _ = write!(
        out,
        "<div class=\"metrics\">{}{}{}</div>",
        metric("Total Locations", summary.total_locations),
        metric("Total Scenes", summary.total_scenes),
        metric("Total Props", summary.total_props),
    );

    if !breakdown.location_breakdown.is_empty() {
        out.push_str("<h3>📍 Location Breakdown</h3>");
        for location in &breakdown.location_breakdown {
            let name = if location.location_name.trim().is_empty() {
                "Unknown Location".to_string()
            } else {
                escape(&location.location_name)
            };
            let _ = write!(
                out,
                "<details><summary>📍 {} ({} scenes)</summary>",
                name,
                location.scenes_in_location.len()
            );
            for scene in &location.scenes_in_location {
                let number = scene.scene_number.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
                let _ = write!(
                    out,
                    "<p><b>Scene {}:</b> {}<br><i>Time:</i> {}<br><i>Description:</i> {}",
                    number,
                    or_na(&scene.scene_heading),
                    or_na(&scene.time_of_day),
                    or_na(&scene.brief_description),
                );
                if !scene.props_in_scene.is_empty() {
                    let _ = write!(out, "<br><i>Props:</i> {}", escape(&scene.props_in_scene.join(", ")));
                }
                out.push_str("</p><hr>");
            }
            out.push_str("</details>");
        }
    }

    if !breakdown.unique_props.is_empty() {
        out.push_str("<h3>🎭 Master Props List</h3><table><tr><th>Index</th><th>Prop Name</th></tr>");
        for (i, prop) in breakdown.unique_props.iter().enumerate() {
            let _ = write!(out, "<tr><td>{}</td><td>{}</td></tr>", i + 1, escape(prop));
        }
        out.push_str("</table>");
    }

    if !breakdown.is_empty() {
        out.push_str(
            r#"<h3>📥 Download Report</h3><p><a href="/download/production">📊 Download Production Report</a> · <a href="/download/summary">📄 Download Summary</a></p>"#,
        );
    }
    out
}

pub fn app_page(session: &Session, notices: &[Notice], tab: Tab, config_key: bool) -> String {
    let mut tabs = String::from("<nav class=\"tabs\">");
    for (t, slug, label) in Tab::ALL {
        let class = if t == tab { " class=\"active\"" } else { "" };
        let _ = write!(tabs, "<a href=\"/?tab={}\"{}>{}</a>", slug, class, label);
    }
    tabs.push_str("</nav>");

    let analysis = session.analysis.as_ref();
    let panel = match tab {
        Tab::Upload => upload_tab(analysis),
        Tab::Standards => standards_tab(analysis),
        Tab::Production => production_tab(analysis),
    };

    layout(&format!(
        r#"{}<main><div class="main-header"><h1>🎬 {TITLE}</h1><p>Standards &amp; Practices + Production Design Analysis</p></div>{}{}<div class="panel">{}</div></main>"#,
        sidebar(session, config_key),
        tabs,
        notices_html(notices),
        panel,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use crate::model::{Severity, Violation};
    use chrono::Utc;

    fn session_with(analysis: Option<ScriptAnalysis>) -> Session {
        let mut session = Session::new(User {
            email: "jane.doe@hoichoi.tv".to_string(),
            name: "Jane Doe".to_string(),
            is_admin: false,
        });
        session.analysis = analysis;
        session
    }

    fn analysis(standards: AnalysisOutcome<StandardsReport>) -> ScriptAnalysis {
        ScriptAnalysis {
            filename: "pilot.pdf".to_string(),
            char_count: 42,
            preview: "INT. HOUSE - DAY".to_string(),
            standards,
            production: AnalysisOutcome::Complete(ProductionBreakdown::default()),
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("drug use"), "Drug Use");
        assert_eq!(title("LANGUAGE"), "Language");
    }

    #[test]
    fn test_standards_tab_without_results() {
        let html = app_page(&session_with(None), &[], Tab::Standards, false);
        assert!(html.contains("Upload and analyze a script first"));
    }

    #[test]
    fn test_standards_tab_escapes_model_text() {
        let report = StandardsReport {
            violations: vec![Violation {
                violation_type: "language".to_string(),
                severity: Severity::Critical,
                violation_text: "<script>alert(1)</script>".to_string(),
                page_number: Some(12),
                ..Violation::default()
            }],
            summary: None,
        };
        let html = app_page(&session_with(Some(analysis(AnalysisOutcome::Complete(report)))), &[], Tab::Standards, true);
        assert!(html.contains("violation-critical"));
        assert!(html.contains("1. Language Violation"));
        assert!(html.contains("<strong>Page:</strong> 12"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("/download/standards"));
    }

    #[test]
    fn test_standards_tab_error() {
        let html = app_page(
            &session_with(Some(analysis(AnalysisOutcome::failed("Invalid JSON response from API")))),
            &[],
            Tab::Standards,
            true,
        );
        assert!(html.contains("Analysis error: Invalid JSON response from API"));
        assert!(!html.contains("/download/standards"));
    }

    #[test]
    fn test_empty_production_has_no_download() {
        let html = app_page(&session_with(Some(analysis(AnalysisOutcome::Complete(StandardsReport::default())))), &[], Tab::Production, true);
        assert!(html.contains("Total Locations"));
        assert!(!html.contains("/download/production"));
    }

    #[test]
    fn test_sidebar_key_status() {
        let html = app_page(&session_with(None), &[], Tab::Upload, false);
        assert!(html.contains("Not configured"));
        assert!(html.contains("Jane Doe"));
        let mut session = session_with(None);
        session.api_key = Some("sk".to_string());
        let html = app_page(&session, &[], Tab::Upload, false);
        assert!(html.contains("API Key: Configured"));
    }
}
