//! `wavescope info` — header metadata and summary counts.

use std::error::Error;

use serde::Serialize;
use wavescope_vcd::Waveform;

use crate::{InfoArgs, ReportFormat};

/// Summary of one loaded trace, shaped for JSON output.
#[derive(Serialize)]
struct InfoReport {
    date: Option<String>,
    version: Option<String>,
    timescale: Option<String>,
    comment: Option<String>,
    /// Declared scopes, excluding the synthetic root.
    scopes: usize,
    variables: usize,
}

impl InfoReport {
    fn from_waveform(wave: &Waveform) -> Self {
        Self {
            date: wave.metadata.date.clone(),
            version: wave.metadata.version.clone(),
            timescale: wave.metadata.timescale.clone(),
            comment: wave.metadata.comment.clone(),
            scopes: wave.scopes.len() - 1,
            variables: wave.variables.len(),
        }
    }
}

/// Runs the `wavescope info` command.
pub fn run(args: &InfoArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let wave = wavescope_vcd::load_file(&args.file)?;
    if !quiet {
        eprintln!("   Loaded {}", args.file.display());
    }

    let report = InfoReport::from_waveform(&wave);
    match args.format {
        ReportFormat::Text => {
            print_entry("Date", report.date.as_deref());
            print_entry("Version", report.version.as_deref());
            print_entry("Timescale", report.timescale.as_deref());
            print_entry("Comment", report.comment.as_deref());
            println!("Scopes:    {}", report.scopes);
            println!("Variables: {}", report.variables);
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(0)
}

fn print_entry(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        // Multi-line metadata is indented under its label.
        let mut lines = value.lines();
        if let Some(first) = lines.next() {
            println!("{:<10} {first}", format!("{label}:"));
        }
        for line in lines {
            println!("           {line}");
        }
    }
}
