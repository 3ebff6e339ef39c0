//! Output formatting for CLI
//!
//! Text mode prints one human-readable line per result. JSON mode prints one
//! compact JSON object per result, so a script produces JSON Lines.

use std::io::Write;

use clap::ValueEnum;
use loyalty_engine::RewardBreakdown;
use loyalty_ingest::IngestReport;
use loyalty_types::{PartnerId, QuarterReward, ReportingPeriod, RewardLevel};
use serde::Serialize;
use serde_json::json;

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Echo a command before it runs. Text mode only.
pub fn print_command<W: Write>(out: &mut W, format: OutputFormat, command: &str) -> CliResult<()> {
    if format == OutputFormat::Text {
        writeln!(out, "{}", command)?;
    }
    Ok(())
}

pub fn print_registered<W: Write>(
    out: &mut W,
    format: OutputFormat,
    partner: PartnerId,
    parent: Option<PartnerId>,
) -> CliResult<()> {
    match format {
        OutputFormat::Text => Ok(()),
        OutputFormat::Json => write_json(out, &json!({ "registered": partner, "parent": parent })),
    }
}

/// Loads are silent in text mode unless rows were skipped.
pub fn print_ingest<W: Write>(out: &mut W, format: OutputFormat, report: &IngestReport) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            for rejection in &report.rejected {
                writeln!(out, "skipped line {}: {}", rejection.line, rejection.reason)?;
            }
            Ok(())
        }
        OutputFormat::Json => write_json(out, report),
    }
}

pub fn print_level<W: Write>(
    out: &mut W,
    format: OutputFormat,
    partner: PartnerId,
    period: ReportingPeriod,
    level: RewardLevel,
) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{} --> '{}'", partner, level)?;
            Ok(())
        }
        OutputFormat::Json => write_json(
            out,
            &json!({
                "partner": partner,
                "year": period.year(),
                "quarter": period.quarter(),
                "level": level,
            }),
        ),
    }
}

pub fn print_reward<W: Write>(
    out: &mut W,
    format: OutputFormat,
    breakdown: &RewardBreakdown,
) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{} --> {} €", breakdown.partner, breakdown.total)?;
            Ok(())
        }
        OutputFormat::Json => write_json(out, breakdown),
    }
}

pub fn print_all_rewards<W: Write>(
    out: &mut W,
    format: OutputFormat,
    partner: PartnerId,
    rewards: &[QuarterReward],
) -> CliResult<()> {
    match format {
        OutputFormat::Text => {
            for reward in rewards {
                writeln!(out, "{} {} {}", reward.year, reward.quarter, reward.reward)?;
            }
            Ok(())
        }
        OutputFormat::Json => write_json(out, &json!({ "partner": partner, "rewards": rewards })),
    }
}
