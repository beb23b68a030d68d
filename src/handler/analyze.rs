use std::path::{Path, PathBuf};
use walkdir::DirEntry;
use crate::analysis::{AnalysisKind, Analyzer, ScriptAnalysis};
use crate::chat::deepseek::ChatClient;
use crate::document::{extract_file, extension_of, ACCEPTED_EXTENSIONS};
use crate::report::is_report_name;
use crate::Config;
use super::write::write_reports;

pub fn print_extracted(path: &Path) -> anyhow::Result<()> {
    let text = extract_file(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text content found in the file");
    }
    println!("{}", text);
    log::info!("extracted {} characters from {}", text.chars().count(), path.display());
    Ok(())
}

pub async fn analyze_scripts(
    config: &Config,
    path: PathBuf,
    out_dir: &Path,
    kinds: &[AnalysisKind],
    recursive: bool,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let client = ChatClient::from_config(config, api_key)?;
    let analyzer = Analyzer::new(&client, config);
    std::fs::create_dir_all(out_dir)?;

    if path.is_dir() {
        process_directory(&analyzer, &path, out_dir, kinds, recursive).await
    } else {
        process_single_file(&analyzer, &path, out_dir, kinds).await
    }
}

async fn process_directory(
    analyzer: &Analyzer<'_, ChatClient>,
    path: &Path,
    out_dir: &Path,
    kinds: &[AnalysisKind],
    recursive: bool,
) -> anyhow::Result<()> {
    let mut failed = 0;

    for entry_path in script_entries(path, out_dir, recursive) {
        // one bad script should not stop the batch
        if let Err(err) = process_single_file(analyzer, &entry_path, out_dir, kinds).await {
            eprintln!("Error processing file {}: {:#}", entry_path.display(), err);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} script(s) could not be processed", failed);
    }
    Ok(())
}

async fn process_single_file(
    analyzer: &Analyzer<'_, ChatClient>,
    path: &Path,
    out_dir: &Path,
    kinds: &[AnalysisKind],
) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    println!("Processing script: {}", path.display());

    let text = extract_file(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text content found in the file");
    }
    println!("Extracted {} characters from script", text.chars().count());

    let analysis = analyzer.run(filename, &text, kinds).await;
    print_overview(&analysis);

    for written in write_reports(out_dir, &analysis)? {
        println!("Report written: {}", written.display());
    }
    Ok(())
}

fn print_overview(analysis: &ScriptAnalysis) {
    match (analysis.standards.result(), analysis.standards.error()) {
        (Some(report), _) => {
            let summary = report.summary();
            println!(
                "Standards & Practices: {} violations (critical {}, high {}, medium {}, low {})",
                summary.total_violations, summary.critical_count, summary.high_count,
                summary.medium_count, summary.low_count,
            );
        }
        (None, Some(error)) => println!("Standards & Practices: analysis error: {}", error),
        (None, None) => {}
    }

    match (analysis.production.result(), analysis.production.error()) {
        (Some(breakdown), _) => {
            let summary = breakdown.summary();
            println!(
                "Production Design: {} locations, {} scenes, {} props",
                summary.total_locations, summary.total_scenes, summary.total_props,
            );
        }
        (None, Some(error)) => println!("Production Design: analysis error: {}", error),
        (None, None) => {}
    }
}

fn get_entries(path: &Path, recursive: bool) -> Box<dyn Iterator<Item = DirEntry>> {
    let iter = if recursive {
        walkdir::WalkDir::new(path)
    } else {
        walkdir::WalkDir::new(path).max_depth(1)
    };
    Box::new(iter.sort_by_file_name().into_iter().filter_map(|e| e.ok()))
}

/// Script files under `path`, leaving out reports this tool wrote and anything
/// inside an output directory nested below `path`.
fn script_entries(path: &Path, out_dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let nested_out = out_dir
        .canonicalize()
        .ok()
        .filter(|out| out != &root && out.starts_with(&root));

    let mut scripts = Vec::new();
    for entry in get_entries(path, recursive) {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        let name = entry_path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        if is_report_name(name) {
            log::debug!("skipping report: {}", entry_path.display());
            continue;
        }
        if let Some(out) = &nested_out {
            if entry_path.canonicalize().is_ok_and(|p| p.starts_with(out)) {
                log::debug!("skipping output directory entry: {}", entry_path.display());
                continue;
            }
        }
        let ext = extension_of(name);
        if !ACCEPTED_EXTENSIONS.iter().any(|accepted| ext == format!(".{}", accepted)) {
            log::warn!("skipping unsupported file: {}", entry_path.display());
            continue;
        }
        scripts.push(entry_path.to_path_buf());
    }
    scripts
}
