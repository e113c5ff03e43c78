//! Human-readable output for hook callers.

use agd_core::{IndexSummary, ValidationReport};
use std::io::{self, Write};

const RULE_WIDTH: usize = 50;

pub fn write_validation_failure(out: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n⚠️  AGD VALIDATION ERRORS")?;
    writeln!(out, "{rule}")?;
    for issue in &report.issues {
        writeln!(out, "  - {issue}")?;
    }
    if report.issues.iter().any(|issue| issue.is_tag_issue()) {
        writeln!(out, "\n📋 To fix tag errors:")?;
        writeln!(out, "   1. Add missing tags to .agents/config.json")?;
        writeln!(out, "   2. Or update the AGD file to use existing tags")?;
    }
    if report.issues.iter().any(|issue| issue.is_reference_issue()) {
        writeln!(out, "\n📋 To fix reference errors:")?;
        writeln!(out, "   Check that referenced AGD files exist")?;
    }
    writeln!(out, "{rule}")
}

pub fn write_block(
    out: &mut impl Write,
    invalid_tags: &[String],
    allowed_tags: &[String],
) -> io::Result<()> {
    writeln!(out, "❌ BLOCKED: Invalid tags: {}", invalid_tags.join(", "))?;
    if allowed_tags.is_empty() {
        writeln!(out, "   No tags defined in config.json yet")?;
    } else {
        writeln!(out, "   Allowed tags: {}", allowed_tags.join(", "))?;
    }
    writeln!(out, "   Fix: Add tags to .agents/config.json first, then retry")
}

pub fn index_summary_line(summary: &IndexSummary) -> String {
    format!("✓ Index updated: {summary}")
}
