// Colored terminal output for verdicts, review panels and notices.
//
// This module handles all terminal-specific formatting: colors, the loading
// spinner, and the stderr notifier. main.rs delegates here.

use std::time::Duration;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::view::{ResultView, SecondaryPanel, VERDICT};
use crate::controller::notify::{Notice, NoticeLevel, Notifier};

/// Spinner shown while a request is in flight.
pub fn loading_spinner(file_name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Analyzing {file_name}..."));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Display the primary panel, plus the review panel if it has been revealed.
pub fn display_result(file_name: &str, view: &ResultView) {
    println!(
        "\n{}",
        format!("=== Lucid TRACE: {file_name} ===").bold()
    );

    for (label, value) in &view.primary.rows {
        let value = if label == VERDICT {
            colorize_verdict(value)
        } else {
            value.normal()
        };
        println!("  {:<18} {}", format!("{label}:").dimmed(), value);
    }

    match &view.secondary {
        Some(panel) => display_secondary(panel),
        None if view.secondary_available => {
            println!(
                "\n  {}",
                "External review available. Re-run with --reveal to show it.".dimmed()
            );
        }
        None => {}
    }
}

/// Display the external review panel.
pub fn display_secondary(panel: &SecondaryPanel) {
    println!("\n  {}", "External review".bold());
    println!(
        "  {:<18} {}",
        "Risk Level:".dimmed(),
        colorize_risk(&panel.risk_level, panel.color_code.as_deref())
    );
    println!("  {:<18} {}", "Confidence:".dimmed(), panel.confidence);
    if let Some(max) = &panel.confidence_max {
        println!("  {:<18} {} (highest frame)", "Peak:".dimmed(), max);
    }
    if let Some(name) = &panel.filename {
        println!("  {:<18} {}", "File:".dimmed(), name);
    }
    if let Some(hash) = &panel.file_hash {
        let custody = match panel.hash_matches {
            Some(true) => "verified".green(),
            Some(false) => "MISMATCH".red().bold(),
            None => "unchecked".dimmed(),
        };
        println!(
            "  {:<18} {} [{}]",
            "SHA-256:".dimmed(),
            super::abbreviate_hash(hash, 8),
            custody
        );
    }
}

/// How a verdict reads, judged by whole words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictTone {
    Alarming,
    Reassuring,
    Uncertain,
}

const ALARMING_WORDS: &[&str] = &[
    "FAKE",
    "DEEPFAKE",
    "SYNTHETIC",
    "SUSPICIOUS",
    "GENERATED",
    "INAUTHENTIC",
    "MANIPULATED",
    "TAMPERED",
    "TAMPERING",
];
const REASSURING_WORDS: &[&str] = &["REAL", "AUTHENTIC", "GENUINE"];
const NEGATIONS: &[&str] = &["NOT", "NO", "NON"];

/// Classify a verdict. Alarming words win outright; a reassuring word only
/// counts when nothing negates it ("NOT REAL" is alarming).
pub fn verdict_tone(verdict: &str) -> VerdictTone {
    let upper = verdict.to_uppercase();
    let words: Vec<&str> = upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_any = |list: &[&str]| words.iter().any(|w| list.iter().any(|l| l == w));

    if has_any(ALARMING_WORDS) {
        VerdictTone::Alarming
    } else if has_any(REASSURING_WORDS) {
        if has_any(NEGATIONS) {
            VerdictTone::Alarming
        } else {
            VerdictTone::Reassuring
        }
    } else {
        VerdictTone::Uncertain
    }
}

/// Color a verdict string by what it says.
pub fn colorize_verdict(verdict: &str) -> ColoredString {
    match verdict_tone(verdict) {
        VerdictTone::Alarming => verdict.red().bold(),
        VerdictTone::Reassuring => verdict.green().bold(),
        VerdictTone::Uncertain => verdict.yellow(),
    }
}

/// Color a risk level by the service's `color_code`, falling back to the
/// level name when the code is missing or unrecognised.
pub fn colorize_risk(level: &str, color_code: Option<&str>) -> ColoredString {
    if let Some((r, g, b)) = color_code.and_then(parse_hex_color) {
        return level.truecolor(r, g, b).bold();
    }
    match color_code.map(str::to_ascii_lowercase).as_deref() {
        Some("red") => level.red().bold(),
        Some("orange") | Some("yellow") => level.yellow().bold(),
        Some("green") => level.green().bold(),
        _ => match level.to_ascii_uppercase().as_str() {
            "CRITICAL" | "HIGH" => level.red().bold(),
            "MODERATE" | "MEDIUM" => level.yellow().bold(),
            "LOW" => level.green().bold(),
            _ => level.normal(),
        },
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into RGB components.
pub fn parse_hex_color(code: &str) -> Option<(u8, u8, u8)> {
    let hex = code.strip_prefix('#').unwrap_or(code);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Notifier that prints blocking notices to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Warning => "Warning:".yellow().bold(),
            NoticeLevel::Error => "Error:".red().bold(),
        };
        eprintln!("{} {}", tag, notice.message);
        if let Some(detail) = &notice.detail {
            eprintln!("  {}", detail.dimmed());
        }
    }
}
