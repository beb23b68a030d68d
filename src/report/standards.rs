use super::{write_workbook, Cell, Sheet};
use crate::model::Violation;

pub const SHEET_NAME: &str = "Standards Report";
pub const HEADERS: [&str; 6] = ["Type", "Severity", "Page", "Violation Text", "Explanation", "Suggested Action"];
pub const FILE_SUFFIX: &str = "standards_report.xlsx";

const EXCERPT_LIMIT: usize = 100;

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LIMIT) {
        Some((pos, _)) => format!("{}...", &text[..pos]),
        None => text.to_string(),
    }
}

pub fn build_sheet(violations: &[Violation]) -> Sheet {
    let mut sheet = Sheet::new(SHEET_NAME, &HEADERS);
    for v in violations {
        sheet.push(vec![
            Cell::text(&v.violation_type),
            Cell::text(v.severity.as_str()),
            Cell::from(v.page_number),
            Cell::text(excerpt(&v.violation_text)),
            Cell::text(&v.explanation),
            Cell::text(&v.suggested_action),
        ]);
    }
    sheet
}

pub fn generate(violations: &[Violation]) -> anyhow::Result<Vec<u8>> {
    write_workbook(&[build_sheet(violations)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use pretty_assertions::assert_eq;

    fn violation() -> Violation {
        Violation {
            violation_type: "language".to_string(),
            severity: Severity::High,
            violation_text: "You dirty rat".to_string(),
            explanation: "Mild insult".to_string(),
            suggested_action: "Soften the line".to_string(),
            page_number: Some(3),
        }
    }

    #[test]
    fn test_header_and_first_row() {
        let sheet = build_sheet(&[violation()]);
        assert_eq!(sheet.name, "Standards Report");
        assert_eq!(
            sheet.rows[0],
            HEADERS.iter().map(|h| Cell::from(*h)).collect::<Vec<_>>()
        );
        assert_eq!(
            sheet.rows[1],
            vec![
                Cell::from("language"),
                Cell::from("high"),
                Cell::Number(3.0),
                Cell::from("You dirty rat"),
                Cell::from("Mild insult"),
                Cell::from("Soften the line"),
            ]
        );
    }

    #[test]
    fn test_long_excerpt_is_cut() {
        let mut v = violation();
        v.violation_text = "x".repeat(150);
        let sheet = build_sheet(&[v]);
        assert_eq!(sheet.rows[1][3], Cell::text(format!("{}...", "x".repeat(100))));

        let mut v = violation();
        v.violation_text = "y".repeat(100);
        let sheet = build_sheet(&[v]);
        assert_eq!(sheet.rows[1][3], Cell::text("y".repeat(100)));
    }

    #[test]
    fn test_missing_page_is_blank() {
        let mut v = violation();
        v.page_number = None;
        assert_eq!(build_sheet(&[v]).rows[1][2], Cell::Empty);
    }

    #[test]
    fn test_deterministic() {
        let violations = vec![violation(), Violation::default()];
        assert_eq!(build_sheet(&violations), build_sheet(&violations));
        assert_eq!(
            build_sheet(&violations).column_widths(),
            build_sheet(&violations).column_widths()
        );
    }

    #[test]
    fn test_generate() -> anyhow::Result<()> {
        let bytes = generate(&[violation()])?;
        assert!(!bytes.is_empty());
        Ok(())
    }
}
