//! Race state machine
//!
//! Folds the event log, in log order, into one `CompetitorState` per
//! competitor. Competitors are created lazily on their first event and are
//! never removed. Inconsistent sequences (a lap completed before the start,
//! leaving a penalty loop never entered) are absorbed, not rejected.

use crate::config::{RaceConfig, StartWindow};
use crate::time::{format_duration, format_time_of_day, parse_time_of_day};
use crate::types::{CompetitorId, Event, EventKind, Result};
use chrono::{Duration, NaiveTime};
use std::collections::HashMap;

/// Mutable per-competitor record
///
/// Time fields default to midnight until an event sets them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorState {
    pub id: CompetitorId,
    pub registered: bool,
    /// Start time assigned by the draw
    pub scheduled_start: Option<NaiveTime>,
    pub started: bool,
    pub not_finished: bool,
    /// Reason given when the competitor could not continue
    pub comment: Option<String>,
    /// Index of the lap in progress (0-based)
    pub current_lap: usize,
    /// Elapsed time of each main lap; zero until completed
    pub lap_times: Vec<Duration>,
    /// When the lap in progress began
    pub lap_started_at: NaiveTime,
    /// Accumulated time spent in penalty loops
    pub penalty_time: Duration,
    pub on_firing_range: bool,
    pub on_penalty: bool,
    pub last_event_at: NaiveTime,
    pub hits: u32,
}

impl CompetitorState {
    /// Fresh record with `laps` unset lap slots
    pub fn new(id: CompetitorId, laps: usize) -> Self {
        Self {
            id,
            registered: false,
            scheduled_start: None,
            started: false,
            not_finished: false,
            comment: None,
            current_lap: 0,
            lap_times: vec![Duration::zero(); laps],
            lap_started_at: NaiveTime::MIN,
            penalty_time: Duration::zero(),
            on_firing_range: false,
            on_penalty: false,
            last_event_at: NaiveTime::MIN,
            hits: 0,
        }
    }

    /// Apply one event to this competitor
    ///
    /// Fails only when the event carries an unparseable start time.
    pub fn apply(&mut self, event: &Event, window: &StartWindow) -> Result<()> {
        let time = event.time;

        match event.kind {
            EventKind::Registered => {
                self.registered = true;
                self.last_event_at = time;
            }
            EventKind::StartTimeAssigned => {
                self.scheduled_start = Some(parse_time_of_day(event.extra_or_empty())?);
                self.last_event_at = time;
            }
            EventKind::OnStartLine => {
                self.last_event_at = time;
            }
            EventKind::Started => {
                if window.admits(time) {
                    self.started = true;
                    self.current_lap = 0;
                    self.lap_started_at = time;
                    self.last_event_at = time;
                } else {
                    log::warn!(
                        "Competitor {} started at {} after the start window closed",
                        self.id,
                        format_time_of_day(time)
                    );
                    self.started = false;
                }
            }
            EventKind::OnFiringRange => {
                self.on_firing_range = true;
                self.last_event_at = time;
            }
            EventKind::TargetHit => {
                self.hits += 1;
                self.last_event_at = time;
            }
            EventKind::LeftFiringRange => {
                self.on_firing_range = false;
                self.last_event_at = time;
            }
            EventKind::EnteredPenaltyLoop => {
                self.on_penalty = true;
                self.last_event_at = time;
            }
            EventKind::LeftPenaltyLoop => {
                if self.on_penalty {
                    let spent = time.signed_duration_since(self.last_event_at);
                    self.penalty_time = self.penalty_time + spent;
                    self.on_penalty = false;
                    log::debug!(
                        "Competitor {} penalty loop took {}",
                        self.id,
                        format_duration(spent)
                    );
                } else {
                    log::warn!(
                        "Competitor {} left a penalty loop without entering one",
                        self.id
                    );
                }
                self.last_event_at = time;
            }
            EventKind::LapCompleted => {
                if self.current_lap < self.lap_times.len() {
                    let lap = time.signed_duration_since(self.lap_started_at);
                    self.lap_times[self.current_lap] = lap;
                    self.lap_started_at = time;
                    self.current_lap += 1;
                    log::debug!(
                        "Competitor {} lap {} took {}",
                        self.id,
                        self.current_lap,
                        format_duration(lap)
                    );
                } else {
                    log::warn!(
                        "Competitor {} completed more than {} laps; extra lap ignored",
                        self.id,
                        self.lap_times.len()
                    );
                }
                self.last_event_at = time;
            }
            EventKind::CannotContinue => {
                self.not_finished = true;
                self.comment = event.extra.clone();
                self.last_event_at = time;
            }
        }

        Ok(())
    }
}

/// The race in progress: start window plus every competitor seen so far
#[derive(Debug, Clone)]
pub struct Race {
    laps: usize,
    window: StartWindow,
    competitors: HashMap<CompetitorId, CompetitorState>,
}

impl Race {
    /// Create an empty race; fails if the config's start times are malformed
    pub fn new(config: &RaceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            laps: config.lap_count(),
            window: config.start_window()?,
            competitors: HashMap::new(),
        })
    }

    /// Process a single event
    pub fn apply(&mut self, event: &Event) -> Result<()> {
        log::info!("{}", event);

        let laps = self.laps;
        let competitor = self
            .competitors
            .entry(event.competitor)
            .or_insert_with(|| CompetitorState::new(event.competitor, laps));

        competitor.apply(event, &self.window)
    }

    /// Process events in the given order, stopping at the first error
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
        for event in events {
            self.apply(event)?;
        }
        log::debug!("Race state holds {} competitors", self.competitors.len());
        Ok(())
    }

    /// State of one competitor, if any event referenced it
    pub fn competitor(&self, id: CompetitorId) -> Option<&CompetitorState> {
        self.competitors.get(&id)
    }

    /// All competitor states, in no particular order
    pub fn competitors(&self) -> impl Iterator<Item = &CompetitorState> {
        self.competitors.values()
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RaceError;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn race() -> Race {
        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00:00.000", "00:00:30.000");
        Race::new(&config).unwrap()
    }

    #[test]
    fn test_lazy_creation() {
        let mut race = race();
        assert!(race.is_empty());

        race.apply(&Event::new(at(9, 50, 0), EventKind::Registered, 4)).unwrap();
        let state = race.competitor(4).unwrap();
        assert!(state.registered);
        assert_eq!(state.lap_times.len(), 2);
        assert_eq!(state.last_event_at, at(9, 50, 0));
        assert!(race.competitor(5).is_none());
    }

    #[test]
    fn test_start_inside_window() {
        let mut race = race();
        race.apply(&Event::new(at(10, 0, 10), EventKind::Started, 1)).unwrap();

        let state = race.competitor(1).unwrap();
        assert!(state.started);
        assert_eq!(state.lap_started_at, at(10, 0, 10));
        assert_eq!(state.last_event_at, at(10, 0, 10));
    }

    #[test]
    fn test_start_outside_window() {
        let mut race = race();
        race.apply(&Event::new(at(9, 59, 0), EventKind::OnStartLine, 1)).unwrap();
        race.apply(&Event::new(at(10, 1, 0), EventKind::Started, 1)).unwrap();

        let state = race.competitor(1).unwrap();
        assert!(!state.started);
        assert_eq!(state.last_event_at, at(9, 59, 0));
    }

    #[test]
    fn test_scheduled_start_parsed() {
        let mut race = race();
        let draw = Event::new(at(9, 51, 0), EventKind::StartTimeAssigned, 1).with_extra("10:00:00.000");
        race.apply(&draw).unwrap();
        assert_eq!(
            race.competitor(1).unwrap().scheduled_start,
            Some(at(10, 0, 0))
        );

        let bad = Event::new(at(9, 52, 0), EventKind::StartTimeAssigned, 2).with_extra("soon");
        assert!(matches!(race.apply(&bad), Err(RaceError::InvalidTime(_))));

        let missing = Event::new(at(9, 52, 0), EventKind::StartTimeAssigned, 3);
        assert!(matches!(race.apply(&missing), Err(RaceError::InvalidTime(_))));
    }

    #[test]
    fn test_laps_stop_at_lap_count() {
        let mut race = race();
        let events = [
            Event::new(at(10, 0, 0), EventKind::Started, 1),
            Event::new(at(10, 10, 0), EventKind::LapCompleted, 1),
            Event::new(at(10, 21, 0), EventKind::LapCompleted, 1),
            Event::new(at(10, 30, 0), EventKind::LapCompleted, 1),
        ];
        race.apply_all(&events).unwrap();

        let state = race.competitor(1).unwrap();
        assert_eq!(state.current_lap, 2);
        assert_eq!(
            state.lap_times,
            vec![Duration::minutes(10), Duration::minutes(11)]
        );
        assert_eq!(state.last_event_at, at(10, 30, 0));
    }

    #[test]
    fn test_penalty_accumulates() {
        let mut race = race();
        let events = [
            Event::new(at(10, 0, 0), EventKind::Started, 1),
            Event::new(at(10, 5, 0), EventKind::EnteredPenaltyLoop, 1),
            Event::new(at(10, 6, 0), EventKind::LeftPenaltyLoop, 1),
            Event::new(at(10, 15, 0), EventKind::EnteredPenaltyLoop, 1),
            Event::new(at(10, 15, 30), EventKind::LeftPenaltyLoop, 1),
            // not in a loop: ignored
            Event::new(at(10, 20, 0), EventKind::LeftPenaltyLoop, 1),
        ];
        race.apply_all(&events).unwrap();

        let state = race.competitor(1).unwrap();
        assert_eq!(state.penalty_time, Duration::seconds(90));
        assert!(!state.on_penalty);
    }

    #[test]
    fn test_firing_range_and_hits() {
        let mut race = race();
        let events = [
            Event::new(at(10, 5, 0), EventKind::OnFiringRange, 1).with_extra("1"),
            Event::new(at(10, 5, 10), EventKind::TargetHit, 1).with_extra("1"),
            Event::new(at(10, 5, 12), EventKind::TargetHit, 1).with_extra("2"),
        ];
        race.apply_all(&events).unwrap();
        let state = race.competitor(1).unwrap();
        assert!(state.on_firing_range);
        assert_eq!(state.hits, 2);

        race.apply(&Event::new(at(10, 5, 30), EventKind::LeftFiringRange, 1)).unwrap();
        assert!(!race.competitor(1).unwrap().on_firing_range);
    }

    #[test]
    fn test_cannot_continue_keeps_comment() {
        let mut race = race();
        let event = Event::new(at(10, 30, 0), EventKind::CannotContinue, 9).with_extra("Broken ski");
        race.apply(&event).unwrap();

        let state = race.competitor(9).unwrap();
        assert!(state.not_finished);
        assert_eq!(state.comment.as_deref(), Some("Broken ski"));
    }

    #[test]
    fn test_malformed_config_rejected() {
        let config = RaceConfig::new(2, 2000, 150, 1).with_start("10:00:00.000", "30s");
        assert!(matches!(Race::new(&config), Err(RaceError::InvalidConfig(_))));
    }
}
