//! Core types for the race results library
//!
//! This module defines the event log records consumed by the race state machine
//! and the result records produced by the classifier.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Competitor identifier as it appears in the event log
pub type CompetitorId = i64;

/// Result type for race processing operations
pub type Result<T> = std::result::Result<T, RaceError>;

/// Errors that can occur while loading or processing a race
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("Invalid time of day: {0:?} (expected HH:MM:SS.mmm)")]
    InvalidTime(String),

    #[error("Invalid duration: {0:?} (expected HH:MM:SS[.mmm])")]
    InvalidDuration(String),

    #[error("Malformed event on line {line}: {reason}")]
    MalformedEvent { line: usize, reason: String },

    #[error("Unknown event kind: {0}")]
    UnknownEventKind(u8),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The eleven kinds of race events, keyed by their log code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Competitor registered (1)
    Registered,
    /// Start time drawn; extra = scheduled start time (2)
    StartTimeAssigned,
    /// Competitor is on the start line (3)
    OnStartLine,
    /// Competitor has started (4)
    Started,
    /// Competitor is on the firing range; extra = firing line (5)
    OnFiringRange,
    /// Target hit; extra = target number (6)
    TargetHit,
    /// Competitor left the firing range (7)
    LeftFiringRange,
    /// Competitor entered the penalty loop (8)
    EnteredPenaltyLoop,
    /// Competitor left the penalty loop (9)
    LeftPenaltyLoop,
    /// Competitor completed a main lap (10)
    LapCompleted,
    /// Competitor cannot continue; extra = comment (11)
    CannotContinue,
}

impl EventKind {
    /// Numeric code used in the event log
    pub fn code(self) -> u8 {
        match self {
            EventKind::Registered => 1,
            EventKind::StartTimeAssigned => 2,
            EventKind::OnStartLine => 3,
            EventKind::Started => 4,
            EventKind::OnFiringRange => 5,
            EventKind::TargetHit => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnteredPenaltyLoop => 8,
            EventKind::LeftPenaltyLoop => 9,
            EventKind::LapCompleted => 10,
            EventKind::CannotContinue => 11,
        }
    }
}

impl TryFrom<u8> for EventKind {
    type Error = RaceError;

    fn try_from(code: u8) -> Result<Self> {
        let kind = match code {
            1 => EventKind::Registered,
            2 => EventKind::StartTimeAssigned,
            3 => EventKind::OnStartLine,
            4 => EventKind::Started,
            5 => EventKind::OnFiringRange,
            6 => EventKind::TargetHit,
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnteredPenaltyLoop,
            9 => EventKind::LeftPenaltyLoop,
            10 => EventKind::LapCompleted,
            11 => EventKind::CannotContinue,
            other => return Err(RaceError::UnknownEventKind(other)),
        };
        Ok(kind)
    }
}

/// A single line of the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Wall-clock time of the event (millisecond precision)
    pub time: NaiveTime,
    /// What happened
    pub kind: EventKind,
    /// Competitor the event refers to
    pub competitor: CompetitorId,
    /// Kind-specific extra parameter (start time, target, comment...)
    pub extra: Option<String>,
}

impl Event {
    /// Create an event without an extra parameter
    pub fn new(time: NaiveTime, kind: EventKind, competitor: CompetitorId) -> Self {
        Self {
            time,
            kind,
            competitor,
            extra: None,
        }
    }

    /// Builder method: attach the extra parameter
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Extra parameter, or an empty string when absent
    pub fn extra_or_empty(&self) -> &str {
        self.extra.as_deref().unwrap_or("")
    }
}

/// Renders the human-readable outgoing log line for this event
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.competitor;
        let extra = self.extra_or_empty();
        write!(f, "[{}] ", self.time.format("%H:%M:%S%.3f"))?;
        match self.kind {
            EventKind::Registered => write!(f, "The competitor({}) registered", id),
            EventKind::StartTimeAssigned => write!(
                f,
                "The start time for the competitor({}) was set by a draw to {}",
                id, extra
            ),
            EventKind::OnStartLine => write!(f, "The competitor({}) is on the start line", id),
            EventKind::Started => write!(f, "The competitor({}) has started", id),
            EventKind::OnFiringRange => write!(
                f,
                "The competitor({}) is on the firing range({})",
                id, extra
            ),
            EventKind::TargetHit => write!(
                f,
                "The target({}) has been hit by competitor({})",
                extra, id
            ),
            EventKind::LeftFiringRange => {
                write!(f, "The competitor({}) left the firing range", id)
            }
            EventKind::EnteredPenaltyLoop => {
                write!(f, "The competitor({}) entered the penalty laps", id)
            }
            EventKind::LeftPenaltyLoop => {
                write!(f, "The competitor({}) left the penalty laps", id)
            }
            EventKind::LapCompleted => write!(f, "The competitor({}) ended the main lap", id),
            EventKind::CannotContinue => {
                write!(f, "The competitor({}) can`t continue: {}", id, extra)
            }
        }
    }
}

/// Final classification of a competitor
///
/// The declaration order is the report order: finishers first, then
/// competitors who abandoned, then those who never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Finished,
    NotFinished,
    NotStarted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Finished => write!(f, "Finished"),
            Status::NotFinished => write!(f, "NotFinished"),
            Status::NotStarted => write!(f, "NotStarted"),
        }
    }
}

/// Formatted lap and penalty-loop timing of a finisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishTiming {
    /// One `HH:MM:SS.mmm` entry per lap
    pub lap_times: Vec<String>,
    /// One speed entry (m/s, 3 decimals) per lap
    pub lap_speeds: Vec<String>,
    /// Total time spent in penalty loops
    pub penalty_time: String,
    /// Average penalty-loop speed (m/s, 3 decimals)
    pub penalty_speed: String,
}

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorResult {
    pub id: CompetitorId,
    pub status: Status,
    /// Shooting accuracy as `hits/total`
    pub hits: String,
    /// Abandon comment (NotFinished only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Lap and penalty timing (Finished only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<FinishTiming>,
}
