//! CLI output formatting for every command.
//!
//! # Display Contract
//!
//! Every entity (directory, document) is shown as a header line with its
//! positional index among its siblings, followed by indented context lines.
//! Paths are always shown relative to the root so the output stays readable
//! for deep trees.
//!
//! # Output Format
//!
//! ## Job tree (`check`)
//!
//! ```text
//! Directories
//! 001 deck
//!     Back: none
//!     001 monsters (2 cards × 3)
//!         Back: monsters/back__bleed__.png
//!         001 elite (1 card × 3)
//!             Back: monsters/back__bleed__.png
//!     002 promo (1 card × 1)
//!         Back: promo/back__bleed__.png
//!         Opens a document
//! ```
//!
//! ## Documents
//!
//! ```text
//! Documents
//! 001 deck-promo.pdf (2 pages, 69×95 mm)
//!     1 front, 1 back
//! 002 deck.pdf (18 pages, 69×95 mm)
//!     9 front, 9 back
//! ```
//!
//! ## Run summary
//!
//! ```text
//! Removed 3 stale artifacts
//! Bled 3 fronts
//! Wrote deck-promo.pdf
//! Wrote deck.pdf
//! Removed 5 artifacts
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::{CheckReport, RunSummary};
use crate::types::{DocumentPlan, JobNode, Side};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `n` followed by the noun, pluralized with a trailing `s`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Path relative to `root`, or the full path when it lies outside.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Directory header: index + name, with the card count when there are fronts.
///
/// ```text
/// 001 monsters (2 cards × 3)
/// 002 tokens
/// ```
fn directory_header(index: usize, name: &str, fronts: usize, quantity: u32) -> String {
    if fronts == 0 {
        format!("{} {}", format_index(index), name)
    } else {
        format!(
            "{} {} ({} × {})",
            format_index(index),
            name,
            plural(fronts, "card"),
            quantity
        )
    }
}

// ============================================================================
// Job tree
// ============================================================================

/// Format the resolved job tree.
pub fn format_job_tree(tree: &JobNode, root: &Path) -> Vec<String> {
    let mut lines = vec!["Directories".to_string()];
    walk_job_tree(tree, root, 0, 1, &mut lines);
    lines
}

fn walk_job_tree(node: &JobNode, root: &Path, depth: usize, position: usize, lines: &mut Vec<String>) {
    let name = node
        .directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| node.directory.display().to_string());
    lines.push(format!(
        "{}{}",
        indent(depth),
        directory_header(position, &name, node.fronts.len(), node.config.quantity)
    ));

    let context = indent(depth + 1);
    match &node.back {
        Some(back) => lines.push(format!("{}Back: {}", context, relative(back, root))),
        None => lines.push(format!("{}Back: none", context)),
    }
    if depth > 0 && node.config.document_boundary {
        lines.push(format!("{}Opens a document", context));
    }

    for (i, child) in node.children.iter().enumerate() {
        walk_job_tree(child, root, depth + 1, i + 1, lines);
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Format planned documents in the order they are written.
pub fn format_documents(plans: &[DocumentPlan], root: &Path) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    if plans.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }

    for (i, plan) in plans.iter().enumerate() {
        let fronts = plan.pages.iter().filter(|p| p.side == Side::Front).count();
        lines.push(format!(
            "{} {} ({}, {}×{} mm)",
            format_index(i + 1),
            relative(&plan.output, root),
            plural(plan.pages.len(), "page"),
            plan.page_size.width,
            plan.page_size.height
        ));
        lines.push(format!(
            "{}{} front, {} back",
            indent(1),
            fronts,
            plan.pages.len() - fronts
        ));
    }
    lines
}

/// Format artifacts a run would remove first.
pub fn format_stale_artifacts(artifacts: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    if artifacts.is_empty() {
        return vec!["No stale artifacts".to_string()];
    }
    let mut lines = vec![format!(
        "Stale artifacts ({})",
        artifacts.len()
    )];
    lines.extend(
        artifacts
            .iter()
            .map(|a| format!("{}{}", indent(1), relative(a, root))),
    );
    lines
}

/// Format the full `check` report.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    match &report.tree {
        Some(tree) => lines.extend(format_job_tree(tree, &report.root)),
        None => lines.push(format!("{} is ignored", report.root.display())),
    }
    lines.push(String::new());
    lines.extend(format_documents(&report.documents, &report.root));
    lines.push(String::new());
    lines.extend(format_stale_artifacts(&report.stale_artifacts, &report.root));
    lines
}

/// Print the `check` report to stdout.
pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Run and clean
// ============================================================================

/// Format the summary of a finished run.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.removed_before > 0 {
        lines.push(format!(
            "Removed {}",
            plural(summary.removed_before, "stale artifact")
        ));
    }
    lines.push(format!("Bled {}", plural(summary.fronts, "front")));
    if summary.documents.is_empty() {
        lines.push("No documents written".to_string());
    }
    for doc in &summary.documents {
        lines.push(format!("Wrote {}", relative(doc, &summary.root)));
    }
    match summary.removed_after {
        Some(n) => lines.push(format!("Removed {}", plural(n, "artifact"))),
        None => lines.push("Kept bled images".to_string()),
    }
    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}

/// Format the result of the `clean` command.
pub fn format_clean_output(removed: usize) -> Vec<String> {
    vec![format!("Removed {}", plural(removed, "artifact"))]
}

/// Print the `clean` result to stdout.
pub fn print_clean_output(removed: usize) {
    for line in format_clean_output(removed) {
        println!("{}", line);
    }
}
