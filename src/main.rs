//! report – command-line branded PDF report generator.
//!
//! Usage:
//!   report <request.json> [--settings-url URL | --settings FILE] [--out-dir DIR]
//!          [--landscape] [--timeout-ms N]
//!
//! The request file holds `{title, columns, rows, fileName}`. The PDF is
//! written to `DIR/{fileName}_{YYYYMMDD}.pdf` (default: current directory).

use std::{env, fs, path::PathBuf, process, time::Duration};

use brand_report::branding::{FileSettingsSource, HttpSettingsSource, StaticSettings};
use brand_report::pipeline::{PageOrientation, ReportConfig, ReportGenerator, ReportRequest};
use brand_report::{ReportResult, SettingsSource};
use serde_json::Value;

enum Settings {
    Url(String),
    File(PathBuf),
    None,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from(".");
    let mut settings = Settings::None;
    let mut config = ReportConfig::default();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => config.orientation = PageOrientation::Landscape,
            "--settings-url" | "-u" => settings = Settings::Url(expect_value(&mut iter, arg, &args[0])),
            "--settings" | "-s" => {
                settings = Settings::File(PathBuf::from(expect_value(&mut iter, arg, &args[0])))
            }
            "--out-dir" | "-o" => out_dir = PathBuf::from(expect_value(&mut iter, arg, &args[0])),
            "--timeout-ms" => {
                let raw = expect_value(&mut iter, arg, &args[0]);
                match raw.parse::<u64>() {
                    Ok(ms) => config.fetch_timeout = Some(Duration::from_millis(ms)),
                    Err(_) => {
                        eprintln!("Invalid --timeout-ms value: {raw}");
                        process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if input_path.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                input_path = Some(PathBuf::from(path));
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no request file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let request: ReportRequest = match fs::read_to_string(&input)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading request '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let result = match settings {
        Settings::Url(url) => run(HttpSettingsSource::new(url), config, &request).await,
        Settings::File(path) => run(FileSettingsSource::new(path), config, &request).await,
        Settings::None => run(StaticSettings(Value::Null), config, &request).await,
    };

    let degraded = result.is_degraded();
    if let ReportResult::Degraded { cause, .. } = &result {
        eprintln!("Warning: branding unavailable, wrote plain report ({cause})");
    }
    let artifact = result.into_artifact();

    if let Err(e) = fs::create_dir_all(&out_dir) {
        eprintln!("Error creating output directory: {e}");
        process::exit(1);
    }
    let output = out_dir.join(&artifact.file_name);
    if let Err(e) = fs::write(&output, &artifact.bytes) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }

    let pages = artifact.page_count();
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{}{})",
        output.display(),
        artifact.bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" },
        if degraded { ", fallback" } else { "" }
    );
}

async fn run<S: SettingsSource>(
    source: S,
    config: ReportConfig,
    request: &ReportRequest,
) -> ReportResult {
    ReportGenerator::new(source)
        .with_config(config)
        .generate(request)
        .await
}

fn expect_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("report – branded PDF report generator (brand-report)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <request.json> [--settings-url URL | --settings FILE] [--out-dir DIR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <request.json>      {{\"title\", \"columns\", \"rows\", \"fileName\"}}");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --settings-url, -u  Fetch the organization settings record over HTTP");
    eprintln!("  --settings, -s      Read the organization settings record from a JSON file");
    eprintln!("                      (neither: letterhead uses the default branding)");
    eprintln!("  --out-dir, -o       Output directory (default: current directory)");
    eprintln!("  --landscape, -l     Use landscape page orientation (A4 841×595 pt)");
    eprintln!("  --timeout-ms        Give up on the settings fetch after N milliseconds");
    eprintln!("  --help              Print this message");
}
