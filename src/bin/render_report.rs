//! Render a JSON layout description to PDF
//!
//! Usage:
//!   cargo run --release --bin render_report -- layout.json
//!   cargo run --release --bin render_report -- layout.json --output out.pdf --verbose
//!
//! Without `--output`, the file is written to the current directory under
//! the report's configured file name.

use pdf_report::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

struct RenderConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
}

impl RenderConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut output = None;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output = Some(PathBuf::from(&args[i]));
                    }
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other if input.is_none() && !other.starts_with('-') => {
                    input = Some(PathBuf::from(other));
                },
                other => {
                    eprintln!("Ignoring unknown argument: {}", other);
                },
            }
            i += 1;
        }

        Self {
            input,
            output,
            verbose,
        }
    }
}

fn main() -> ExitCode {
    let config = RenderConfig::from_args();
    let default_level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let Some(input) = config.input else {
        eprintln!("Usage: render_report <layout.json> [--output <path>] [--verbose]");
        return ExitCode::from(2);
    };

    let start = Instant::now();
    let report = match Report::from_json_file(&input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error reading {}: {}", input.display(), e);
            return ExitCode::FAILURE;
        },
    };

    let result = match config.output {
        Some(path) => report.save(&path).map(|_| path),
        None => report.save_in("."),
    };

    match result {
        Ok(path) => {
            println!(
                "Rendered {} layout page(s) to {} in {:.2?}",
                report.effective_pages().len(),
                path.display(),
                start.elapsed()
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error rendering report: {}", e);
            ExitCode::FAILURE
        },
    }
}
