use crate::analysis::AnalysisKind;
use crate::document::budget::{clamp_budget, truncate_chars};
use crate::Config;

use super::{Role, Talk};

const STANDARDS_TEMPLATE: &str = r#"Analyze this film script for content violations. Return JSON format only.

Check for:
- Violence (excessive, graphic content)
- Language (profanity, offensive terms)
- Nudity/Sexual content
- Drug use depictions
- Copyright issues

Return exactly this JSON structure:
{
    "violations": [
        {
            "violationType": "violence",
            "severity": "high",
            "violationText": "specific text from script",
            "explanation": "why this violates standards",
            "suggestedAction": "recommended changes",
            "pageNumber": 1
        }
    ],
    "summary": {
        "totalViolations": 2,
        "criticalCount": 0,
        "highCount": 1,
        "mediumCount": 1,
        "lowCount": 0
    }
}

Severity must be one of: critical, high, medium, low.

Script content: "#;

const PRODUCTION_TEMPLATE: &str = r#"Extract production elements from this film script. Return JSON format only.

Identify:
- Locations (sets, exteriors, interiors)
- Scenes and their details
- Props and set pieces
- Time of day requirements

Return exactly this JSON structure:
{
    "location_breakdown": [
        {
            "location_name": "Office Building",
            "location_type": "Interior",
            "scenes_in_location": [
                {
                    "scene_number": 1,
                    "scene_heading": "INT. OFFICE - DAY",
                    "time_of_day": "DAY",
                    "brief_description": "Character walks into office",
                    "props_in_scene": ["desk", "computer", "coffee mug"]
                }
            ]
        }
    ],
    "unique_props": ["desk", "computer", "coffee mug"],
    "summary": {
        "total_locations": 3,
        "total_scenes": 8,
        "total_props": 15
    }
}

Script content: "#;

/// User prompt for `kind`, embedding at most the configured budget of script text.
pub fn user_prompt(kind: AnalysisKind, text: &str, char_budget: usize) -> String {
    let template = match kind {
        AnalysisKind::Standards => STANDARDS_TEMPLATE,
        AnalysisKind::Production => PRODUCTION_TEMPLATE,
    };
    let script = truncate_chars(text, clamp_budget(char_budget));
    format!("{}{}", template, script)
}

pub fn system_prompt(kind: AnalysisKind, config: &Config) -> &str {
    match kind {
        AnalysisKind::Standards => &config.standards_system_prompt,
        AnalysisKind::Production => &config.production_system_prompt,
    }
}

pub fn build_messages(kind: AnalysisKind, text: &str, config: &Config) -> Vec<Talk> {
    vec![
        Talk::new(Role::System, system_prompt(kind, config).to_string()),
        Talk::new(Role::User, user_prompt(kind, text, config.char_budget)),
    ]
}
