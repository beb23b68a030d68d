use std::path::PathBuf;
use clap::Parser;
use crate::analysis::AnalysisKind;
use crate::Config;

mod analyze;
mod write;

#[derive(Parser)]
#[command(name = "scriptreview")]
#[command(about = "Standards & Practices and Production Design review of film scripts", version = "1.0")]
pub enum Cli {
    /// Print the text extracted from a script
    Extract {
        #[arg(help = "Script file (pdf, docx, txt)")]
        path: PathBuf,
    },

    /// Analyze scripts and write the reports
    Analyze {
        #[arg(help = "Script file or directory")]
        path: PathBuf,

        #[arg(short, long, help = "Directory for the reports", default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, value_enum, help = "Run a single analysis")]
        only: Option<AnalysisKind>,

        #[arg(short, long, help = "Walk subdirectories")]
        recursive: bool,

        #[arg(long, help = "API key, instead of the configured one")]
        api_key: Option<String>,
    },

    /// Build a report from a saved model reply
    Render {
        #[arg(help = "File holding the model reply")]
        reply: PathBuf,

        #[arg(short, long, value_enum)]
        kind: AnalysisKind,

        #[arg(long, help = "Output .xlsx path")]
        out: Option<PathBuf>,
    },

    /// Start the web UI
    Serve {
        #[arg(long, help = "Listen address, e.g. 0.0.0.0:8501")]
        addr: Option<String>,
    },
}

pub async fn handler(args: Cli, config: Config) -> anyhow::Result<()> {
    match args {
        Cli::Extract { path } => analyze::print_extracted(&path),
        Cli::Analyze { path, out_dir, only, recursive, api_key } => {
            let kinds = match only {
                Some(kind) => vec![kind],
                None => AnalysisKind::ALL.to_vec(),
            };
            analyze::analyze_scripts(&config, path, &out_dir, &kinds, recursive, api_key.as_deref()).await
        }
        Cli::Render { reply, kind, out } => write::render_reply(&reply, kind, out),
        Cli::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.bind_addr.clone());
            crate::web::serve(config, &addr).await
        }
    }
}
