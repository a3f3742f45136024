//! Race configuration types
//!
//! `RaceConfig` mirrors the on-disk config record (camelCase keys). Loading the
//! file is left to the application layer; this module only validates and
//! interprets the values.

use crate::time::{parse_duration, parse_time_of_day};
use crate::types::{RaceError, Result};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Shots fired on each firing line
pub const SHOTS_PER_FIRING_LINE: u32 = 5;

/// Static race parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of main laps
    pub laps: u32,
    /// Length of one main lap in meters
    pub lap_len: u32,
    /// Length of one penalty loop in meters
    pub penalty_len: u32,
    /// Number of firing lines
    pub firing_lines: u32,
    /// Scheduled race start, `HH:MM:SS.mmm`
    pub start: String,
    /// Permitted start delay, `HH:MM:SS[.mmm]`
    pub start_delta: String,
}

impl RaceConfig {
    /// Create a config with the race opening at midnight and no start delay
    pub fn new(laps: u32, lap_len: u32, penalty_len: u32, firing_lines: u32) -> Self {
        Self {
            laps,
            lap_len,
            penalty_len,
            firing_lines,
            start: "00:00:00.000".to_string(),
            start_delta: "00:00:00".to_string(),
        }
    }

    /// Builder method: set the scheduled start and the permitted delay
    pub fn with_start(mut self, start: impl Into<String>, start_delta: impl Into<String>) -> Self {
        self.start = start.into();
        self.start_delta = start_delta.into();
        self
    }

    /// Total number of shots a competitor fires over the race
    pub fn total_shots(&self) -> u32 {
        self.firing_lines.saturating_mul(SHOTS_PER_FIRING_LINE)
    }

    /// Number of lap slots tracked per competitor
    pub fn lap_count(&self) -> usize {
        self.laps as usize
    }

    /// Parse the scheduled start and delay into a start window
    pub fn start_window(&self) -> Result<StartWindow> {
        Ok(StartWindow {
            start: parse_time_of_day(&self.start)?,
            delta: parse_duration(&self.start_delta)?,
        })
    }

    /// Check the config for values that make the race unprocessable
    pub fn validate(&self) -> Result<()> {
        if self.laps == 0 {
            log::warn!("Race configured with zero laps; every starter will be classified as finished");
        }
        self.start_window()
            .map_err(|e| RaceError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}

/// Latest moment a competitor may start: scheduled start + permitted delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartWindow {
    pub start: NaiveTime,
    pub delta: Duration,
}

impl StartWindow {
    /// True unless `time` is strictly after `start + delta`
    ///
    /// Starts before the scheduled start are accepted.
    pub fn admits(&self, time: NaiveTime) -> bool {
        time.signed_duration_since(self.start) <= self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "laps": 2,
            "lapLen": 3651,
            "penaltyLen": 50,
            "firingLines": 1,
            "start": "09:30:00.000",
            "startDelta": "00:00:30"
        }"#;

        let config: RaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.laps, 2);
        assert_eq!(config.lap_len, 3651);
        assert_eq!(config.penalty_len, 50);
        assert_eq!(config.total_shots(), 5);
        assert_eq!(config.start_delta, "00:00:30");
    }

    #[test]
    fn test_negative_values_rejected() {
        let json = r#"{"laps": -1, "lapLen": 1, "penaltyLen": 1, "firingLines": 1,
                       "start": "09:30:00.000", "startDelta": "00:00:30"}"#;
        assert!(serde_json::from_str::<RaceConfig>(json).is_err());
    }

    #[test]
    fn test_start_window() {
        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00:00.000", "00:00:30.000");
        let window = config.start_window().unwrap();

        assert!(window.admits(at(9, 59, 0, 0)));
        assert!(window.admits(at(10, 0, 10, 0)));
        assert!(window.admits(at(10, 0, 30, 0)));
        assert!(!window.admits(at(10, 0, 30, 1)));
        assert!(!window.admits(at(10, 1, 0, 0)));
    }

    #[test]
    fn test_validate_rejects_bad_times() {
        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00", "00:00:30");
        assert!(matches!(config.validate(), Err(RaceError::InvalidConfig(_))));

        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00:00.000", "thirty");
        assert!(matches!(config.validate(), Err(RaceError::InvalidConfig(_))));

        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00:00.000", "00:00:30");
        assert!(config.validate().is_ok());
    }
}
