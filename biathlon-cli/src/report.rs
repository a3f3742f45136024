//! Report rendering
//!
//! Renders the ordered standings as plain text (one line per competitor) or
//! as a JSON array.

use anyhow::Result;
use biathlon_core::{CompetitorResult, Status};
use clap::ValueEnum;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Txt,
    Json,
}

/// Render the report in the requested format
pub fn render(results: &[CompetitorResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Txt => Ok(render_txt(results)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(results)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// `[Status] id [{lap, speed}, ...] {penalty, speed} hits`
pub fn render_txt(results: &[CompetitorResult]) -> String {
    let mut out = String::new();
    for result in results {
        out.push_str(&render_line(result));
        out.push('\n');
    }
    out
}

fn render_line(result: &CompetitorResult) -> String {
    let (laps, penalty) = match &result.timing {
        Some(timing) => {
            let laps: Vec<String> = timing
                .lap_times
                .iter()
                .zip(&timing.lap_speeds)
                .map(|(time, speed)| format!("{{{}, {}}}", time, speed))
                .collect();
            (
                laps.join(", "),
                format!("{{{}, {}}}", timing.penalty_time, timing.penalty_speed),
            )
        }
        None => (String::new(), "{,}".to_string()),
    };

    let mut line = format!(
        "[{}] {} [{}] {} {}",
        result.status, result.id, laps, penalty, result.hits
    );
    if result.status == Status::NotFinished {
        if let Some(comment) = &result.comment {
            line.push_str(&format!(" ({})", comment));
        }
    }
    line
}
