//! Result classification
//!
//! Turns final competitor states into report rows. Classification is a pure
//! function of the state and the config, so it can be re-run freely.

use crate::config::RaceConfig;
use crate::race::CompetitorState;
use crate::time::{format_duration, format_speed};
use crate::types::{CompetitorResult, FinishTiming, Status};
use chrono::Duration;

/// Classify one competitor
///
/// Returns `None` for a competitor who started but neither finished every lap
/// nor abandoned; such competitors are left out of the report.
pub fn classify(state: &CompetitorState, config: &RaceConfig) -> Option<CompetitorResult> {
    let hits = format!("{}/{}", state.hits, config.total_shots());

    let (status, comment, timing) = if !state.started {
        (Status::NotStarted, None, None)
    } else if state.not_finished {
        (Status::NotFinished, state.comment.clone(), None)
    } else if state.current_lap == config.lap_count() {
        (Status::Finished, None, Some(finish_timing(state, config)))
    } else {
        log::debug!(
            "Competitor {} is still on lap {} of {}; omitted from report",
            state.id,
            state.current_lap + 1,
            config.laps
        );
        return None;
    };

    Some(CompetitorResult {
        id: state.id,
        status,
        hits,
        comment,
        timing,
    })
}

/// Classify every competitor; the output order follows the input order
pub fn classify_all<'a>(
    states: impl IntoIterator<Item = &'a CompetitorState>,
    config: &RaceConfig,
) -> Vec<CompetitorResult> {
    states
        .into_iter()
        .filter_map(|state| classify(state, config))
        .collect()
}

fn finish_timing(state: &CompetitorState, config: &RaceConfig) -> FinishTiming {
    let laps = config.lap_count();
    let mut lap_times = Vec::with_capacity(laps);
    let mut lap_speeds = Vec::with_capacity(laps);

    for slot in 0..laps {
        let lap = state.lap_times.get(slot).copied().unwrap_or_else(Duration::zero);
        lap_times.push(format_duration(lap));
        lap_speeds.push(format_speed(config.lap_len, lap));
    }

    FinishTiming {
        lap_times,
        lap_speeds,
        penalty_time: format_duration(state.penalty_time),
        penalty_speed: format_speed(config.penalty_len, state.penalty_time),
    }
}
