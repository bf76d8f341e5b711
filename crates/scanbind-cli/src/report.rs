// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal output: page listing, run summary, and failure hints.

use std::io::IsTerminal as _;

use colored::{ColoredString, Colorize};
use scanbind_core::human_errors::{humanize_error, Severity};
use scanbind_core::{PageKind, PageRecord, ScanbindError};
use scanbind_document::{DiscoveryReport, RunSummary};

/// Turn colours off for `--no-color` and for non-terminal stdout.
/// `colored` itself honours `NO_COLOR`.
pub fn configure_color(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// `page0001.tif (mixed, 3000×4000 px, 300 dpi)`, yellow for mixed pages and
/// green for standard ones.
pub fn page_line(page: &PageRecord) -> ColoredString {
    let line = format!(
        "{} ({}, {} px, {} dpi)",
        page.filename,
        page.kind(),
        page.pixel_size,
        page.resolution
    );
    match page.kind() {
        PageKind::Mixed => line.yellow(),
        PageKind::Standard => line.green(),
    }
}

fn counts(standard: usize, mixed: usize) -> String {
    format!(
        "Standard pages: {standard}\nMixed pages:    {mixed}\nTotal pages:    {}",
        standard + mixed
    )
}

pub fn print_listing(report: &DiscoveryReport) {
    for page in &report.pages {
        println!("{}", page_line(page));
    }
    println!();
    println!("{}", counts(report.standard_count(), report.mixed_count()));
    if !report.warnings.is_empty() {
        println!("{}       {}", "Warnings:".yellow().bold(), report.warnings.len());
        for warning in &report.warnings {
            println!("  {warning}");
        }
    }
}

pub fn print_json(report: &DiscoveryReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", counts(summary.standard_pages, summary.mixed_pages));
    let ocr = if summary.ocr_applied { "with text layer" } else { "without OCR" };
    println!(
        "{} {} ({ocr})",
        "Written:".green().bold(),
        summary.final_document.display()
    );
}

/// Print the error chain and, for known errors, a plain-language hint.
pub fn print_failure(err: &anyhow::Error) {
    eprintln!("{} {err:#}", "error:".red().bold());
    if let Some(known) = err.chain().find_map(|cause| cause.downcast_ref::<ScanbindError>()) {
        let human = humanize_error(known);
        let label = match human.severity {
            Severity::ActionRequired => "action required",
            Severity::Permanent => "cannot continue",
            Severity::ToolFailure => "tool failed",
        };
        eprintln!("{label}: {}", human.message);
        eprintln!("hint: {}", human.suggestion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Color;
    use scanbind_core::{PageSource, PixelSize, Resolution};
    use std::path::PathBuf;

    fn record(kind: PageKind) -> PageRecord {
        let path = PathBuf::from("out/page0001.tif");
        let source = match kind {
            PageKind::Standard => PageSource::Standard { image: path.clone() },
            PageKind::Mixed => PageSource::Mixed {
                foreground: PathBuf::from("out/foreground/page0001.tif"),
                background: PathBuf::from("out/background/page0001.tif"),
            },
        };
        PageRecord {
            filename: "page0001.tif".into(),
            path,
            source,
            pixel_size: PixelSize::new(3000, 4000),
            resolution: Resolution::uniform(300.0),
        }
    }

    #[test]
    fn page_line_text() {
        let line = page_line(&record(PageKind::Mixed));
        assert_eq!(&*line, "page0001.tif (mixed, 3000×4000 px, 300 dpi)");
    }

    #[test]
    fn coloured_by_kind() {
        assert_eq!(page_line(&record(PageKind::Mixed)).fgcolor(), Some(Color::Yellow));
        assert_eq!(page_line(&record(PageKind::Standard)).fgcolor(), Some(Color::Green));
    }

    #[test]
    fn counts_add_up() {
        assert!(counts(2, 3).ends_with("Total pages:    5"));
    }
}
