use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use super::ExtractError;

pub fn extract(data: &[u8]) -> Result<String, ExtractError> {
    let document = read_docx(data).map_err(|e| ExtractError::processing("DOCX", e))?;

    let mut text = String::new();
    for child in &document.document.children {
        if let DocumentChild::Paragraph(p) = child {
            for run in &p.children {
                if let ParagraphChild::Run(r) = run {
                    for text_node in &r.children {
                        if let RunChild::Text(t) = text_node {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn build_docx(lines: &[&str]) -> anyhow::Result<Vec<u8>> {
        let mut doc = Docx::new();
        for line in lines {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let mut buffer = std::io::Cursor::new(Vec::new());
        doc.build().pack(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    #[test]
    fn test_paragraphs_are_joined() -> anyhow::Result<()> {
        let data = build_docx(&["FADE IN:", "EXT. ROOFTOP - NIGHT", "Rain."])?;
        let text = extract(&data)?;
        assert_eq!(text, "FADE IN:\nEXT. ROOFTOP - NIGHT\nRain.");
        Ok(())
    }
}
