use std::collections::HashSet;

use super::{write_workbook, Cell, Sheet};
use crate::model::{Location, ProductionBreakdown};

pub const FILE_SUFFIX: &str = "production_report.xlsx";

const SCENE_HEADERS: [&str; 5] = ["Scene", "Heading", "Time of Day", "Description", "Props"];
const MAX_SHEET_NAME: usize = 31;
const RESERVED_NAMES: [&str; 3] = ["summary", "locations", "props"];

/// Excel rejects names that start or end with an apostrophe.
fn trim_edges(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_whitespace() || c == '\'')
}

/// Excel-safe sheet name: no `[]:*?/\`, no surrounding quotes, at most 31 chars.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .collect();
    let cleaned: String = trim_edges(&cleaned).chars().take(MAX_SHEET_NAME).collect();
    let cleaned = trim_edges(&cleaned).to_string();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("history") {
        "Location".to_string()
    } else {
        cleaned
    }
}

/// Sanitized sheet names for every location, unique ignoring case.
pub fn location_sheet_names(locations: &[Location]) -> Vec<String> {
    let mut taken: HashSet<String> = RESERVED_NAMES.iter().map(|s| s.to_string()).collect();
    let mut names = Vec::with_capacity(locations.len());

    for location in locations {
        let base = sanitize_sheet_name(&location.location_name);
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            let head: String = base.chars().take(keep).collect();
            candidate = format!("{}{}", trim_edges(&head), suffix);
            n += 1;
        }
        taken.insert(candidate.to_lowercase());
        names.push(candidate);
    }
    names
}

fn summary_sheet(breakdown: &ProductionBreakdown) -> Sheet {
    let summary = breakdown.summary();
    let mut sheet = Sheet::new("Summary", &["Production Summary"]);
    sheet.push(vec![Cell::from("Total Locations"), Cell::from(summary.total_locations)]);
    sheet.push(vec![Cell::from("Total Scenes"), Cell::from(summary.total_scenes)]);
    sheet.push(vec![Cell::from("Total Props"), Cell::from(summary.total_props)]);
    sheet
}

fn locations_sheet(breakdown: &ProductionBreakdown) -> Sheet {
    let mut sheet = Sheet::new("Locations", &["Location", "Type", "Scene Count"]);
    for location in &breakdown.location_breakdown {
        sheet.push(vec![
            Cell::text(&location.location_name),
            Cell::text(&location.location_type),
            Cell::from(location.scenes_in_location.len()),
        ]);
    }
    sheet
}

fn scene_sheet(name: String, location: &Location) -> Sheet {
    let mut sheet = Sheet::new(name, &SCENE_HEADERS);
    for scene in &location.scenes_in_location {
        sheet.push(vec![
            Cell::from(scene.scene_number),
            Cell::text(&scene.scene_heading),
            Cell::text(&scene.time_of_day),
            Cell::text(&scene.brief_description),
            Cell::text(scene.props_in_scene.join(", ")),
        ]);
    }
    sheet
}

fn prop_key(prop: &str) -> String {
    prop.trim().to_lowercase()
}

/// Every prop with the locations whose scenes use it. Listed props come first,
/// then props that only show up inside scenes, in first-seen order.
pub fn props_to_locations(breakdown: &ProductionBreakdown) -> Vec<(String, Vec<String>)> {
    let mut props: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let scene_props = breakdown
        .location_breakdown
        .iter()
        .flat_map(|l| l.scenes_in_location.iter())
        .flat_map(|s| s.props_in_scene.iter());

    for prop in breakdown.unique_props.iter().chain(scene_props) {
        let prop = prop.trim();
        if !prop.is_empty() && seen.insert(prop_key(prop)) {
            props.push(prop.to_string());
        }
    }

    props
        .into_iter()
        .map(|prop| {
            let key = prop_key(&prop);
            let mut locations: Vec<String> = Vec::new();
            for location in &breakdown.location_breakdown {
                let used = location
                    .scenes_in_location
                    .iter()
                    .any(|s| s.props_in_scene.iter().any(|p| prop_key(p) == key));
                if used && !locations.contains(&location.location_name) {
                    locations.push(location.location_name.clone());
                }
            }
            (prop, locations)
        })
        .collect()
}

fn props_sheet(breakdown: &ProductionBreakdown) -> Sheet {
    let mut sheet = Sheet::new("Props", &["Prop Name", "Locations"]);
    for (prop, locations) in props_to_locations(breakdown) {
        sheet.push(vec![Cell::text(prop), Cell::text(locations.join(", "))]);
    }
    sheet
}

pub fn build_sheets(breakdown: &ProductionBreakdown) -> Vec<Sheet> {
    let mut sheets = vec![summary_sheet(breakdown), locations_sheet(breakdown)];
    let names = location_sheet_names(&breakdown.location_breakdown);
    for (name, location) in names.into_iter().zip(&breakdown.location_breakdown) {
        sheets.push(scene_sheet(name, location));
    }
    sheets.push(props_sheet(breakdown));
    sheets
}

pub fn generate(breakdown: &ProductionBreakdown) -> anyhow::Result<Vec<u8>> {
    write_workbook(&build_sheets(breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scene;
    use pretty_assertions::assert_eq;

    fn scene(number: i64, heading: &str, props: &[&str]) -> Scene {
        Scene {
            scene_number: Some(number),
            scene_heading: heading.to_string(),
            time_of_day: "DAY".to_string(),
            brief_description: "Something happens".to_string(),
            props_in_scene: props.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn breakdown() -> ProductionBreakdown {
        ProductionBreakdown {
            location_breakdown: vec![
                Location {
                    location_name: "Office Building".to_string(),
                    location_type: "Interior".to_string(),
                    scenes_in_location: vec![
                        scene(1, "INT. OFFICE - DAY", &["desk", "computer"]),
                        scene(4, "INT. OFFICE - NIGHT", &["coffee mug"]),
                    ],
                },
                Location {
                    location_name: "Rooftop".to_string(),
                    location_type: "Exterior".to_string(),
                    scenes_in_location: vec![scene(2, "EXT. ROOFTOP - DAY", &["Coffee Mug", "umbrella"])],
                },
            ],
            unique_props: vec!["desk".to_string(), "computer".to_string(), "coffee mug".to_string()],
            summary: None,
        }
    }

    #[test]
    fn test_sheet_layout() {
        let sheets = build_sheets(&breakdown());
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Summary", "Locations", "Office Building", "Rooftop", "Props"]);
    }

    #[test]
    fn test_summary_sheet() {
        let sheets = build_sheets(&breakdown());
        assert_eq!(sheets[0].rows[0], vec![Cell::from("Production Summary")]);
        assert_eq!(sheets[0].rows[1], vec![Cell::from("Total Locations"), Cell::Number(2.0)]);
        assert_eq!(sheets[0].rows[2], vec![Cell::from("Total Scenes"), Cell::Number(3.0)]);
        assert_eq!(sheets[0].rows[3], vec![Cell::from("Total Props"), Cell::Number(3.0)]);
    }

    #[test]
    fn test_locations_and_scenes() {
        let sheets = build_sheets(&breakdown());
        assert_eq!(
            sheets[1].rows[1],
            vec![Cell::from("Office Building"), Cell::from("Interior"), Cell::Number(2.0)]
        );
        assert_eq!(sheets[2].rows.len(), 3);
        assert_eq!(
            sheets[2].rows[1],
            vec![
                Cell::Number(1.0),
                Cell::from("INT. OFFICE - DAY"),
                Cell::from("DAY"),
                Cell::from("Something happens"),
                Cell::from("desk, computer"),
            ]
        );
    }

    #[test]
    fn test_props_to_locations() {
        let props = props_to_locations(&breakdown());
        assert_eq!(
            props,
            vec![
                ("desk".to_string(), vec!["Office Building".to_string()]),
                ("computer".to_string(), vec!["Office Building".to_string()]),
                ("coffee mug".to_string(), vec!["Office Building".to_string(), "Rooftop".to_string()]),
                ("umbrella".to_string(), vec!["Rooftop".to_string()]),
            ]
        );
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("INT/EXT: Car [moving]"), "INT_EXT_ Car _moving_");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name(""), "Location");
        assert_eq!(sanitize_sheet_name("History"), "Location");
        assert_eq!(sanitize_sheet_name(&"z".repeat(40)).chars().count(), 31);
    }

    #[test]
    fn test_sheet_names_are_unique() {
        let long = "A very long location name that overflows".to_string();
        let locations: Vec<Location> = ["Props", "Kitchen", "kitchen", "", "", long.as_str(), long.as_str()]
            .iter()
            .map(|name| Location { location_name: name.to_string(), ..Location::default() })
            .collect();
        let names = location_sheet_names(&locations);
        assert_eq!(names[0], "Props (2)");
        assert_eq!(names[1], "Kitchen");
        assert_eq!(names[2], "kitchen (2)");
        assert_eq!(names[3], "Location");
        assert_eq!(names[4], "Location (2)");
        assert_eq!(names[5], "A very long location name that");
        assert!(names[6].ends_with(" (2)"));
        assert!(names[6].chars().count() <= 31);
    }

    #[test]
    fn test_generate_with_awkward_names() -> anyhow::Result<()> {
        let mut data = breakdown();
        data.location_breakdown[1].location_name = "Office Building".to_string();
        let bytes = generate(&data)?;
        assert!(!bytes.is_empty());
        Ok(())
    }

    #[test]
    fn test_cut_name_never_ends_in_apostrophe() -> anyhow::Result<()> {
        let wharf = "Abandoned Warehouse near Smith's Wharf";
        assert_eq!(sanitize_sheet_name(wharf), "Abandoned Warehouse near Smith");

        let mut data = breakdown();
        data.location_breakdown[0].location_name = wharf.to_string();
        data.location_breakdown[1].location_name = wharf.to_string();
        let names = location_sheet_names(&data.location_breakdown);
        assert_eq!(names[1], "Abandoned Warehouse near Sm (2)");
        assert!(!generate(&data)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_non_ascii_props_match_ignoring_case() {
        let data = ProductionBreakdown {
            location_breakdown: vec![Location {
                location_name: "Studio".to_string(),
                scenes_in_location: vec![scene(1, "INT. STUDIO - DAY", &["ÉCRAN"])],
                ..Location::default()
            }],
            unique_props: vec!["écran".to_string()],
            summary: None,
        };
        assert_eq!(
            props_to_locations(&data),
            vec![("écran".to_string(), vec!["Studio".to_string()])]
        );
    }
}
