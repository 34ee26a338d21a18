//! Replay result reporting

use anyhow::Result;
use std::fmt::Write;

use vitals_core::format::format_value;
use vitals_core::MetricName;

use crate::ReplayOutcome;

/// Output format for replay results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Console,
    /// Pretty-printed JSON
    Json,
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, outcome: &ReplayOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Console => Self::console(outcome),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        }
    }

    fn console(outcome: &ReplayOutcome) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "Core Web Vitals")?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;

        for row in outcome.board.rows() {
            writeln!(
                output,
                "  {:<4} {:<45} {:>10}  [{}]",
                row.name.as_str(),
                row.description,
                row.display,
                row.tone
            )?;
        }

        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(
            output,
            "Current CLS Value: {}",
            format_value(MetricName::Cls, outcome.board.cls_running_score())
        )?;
        writeln!(
            output,
            "Steps: {}   Updates: {}",
            outcome.steps, outcome.updates
        )?;

        if !outcome.failures.is_empty() {
            writeln!(output)?;
            writeln!(output, "Unsupported streams:")?;
            for failure in &outcome.failures {
                writeln!(output, "  • {}", failure)?;
            }
        }

        Ok(output)
    }
}
