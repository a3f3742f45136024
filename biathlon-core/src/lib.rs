//! Biathlon Race Results Library
//!
//! Folds a chronological log of race events into final standings for a
//! multi-lap biathlon-style race.
//!
//! # Architecture
//!
//! Processing is a single synchronous pass:
//! - `events` parses the plain-text event log into typed `Event`s
//! - `race` runs the per-competitor state machine over the events in log order
//! - `classify` derives a status and formatted timing for each competitor
//! - `report` sorts the classified rows into standings order
//!
//! The library does NOT read the config file or print anything; that is the
//! job of the application layer (biathlon-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use biathlon_core::{load_events, process_race, RaceConfig};
//! use std::path::Path;
//!
//! let config = RaceConfig::new(2, 3651, 50, 1).with_start("09:30:00.000", "00:00:30");
//! let events = load_events(Path::new("events")).unwrap();
//!
//! for result in process_race(&config, &events).unwrap() {
//!     println!("[{}] {} {}", result.status, result.id, result.hits);
//! }
//! ```

// Public modules
pub mod classify;
pub mod config;
pub mod events;
pub mod race;
pub mod report;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use classify::{classify, classify_all};
pub use config::{RaceConfig, StartWindow};
pub use events::{load_events, parse_events};
pub use race::{CompetitorState, Race};
pub use report::{assemble, sort_results};
pub use types::{
    CompetitorId, CompetitorResult, Event, EventKind, FinishTiming, RaceError, Result, Status,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the whole pipeline: state machine, classifier, assembler
///
/// Aborts on the first parse error; no partial report is produced.
pub fn process_race(config: &RaceConfig, events: &[Event]) -> Result<Vec<CompetitorResult>> {
    let mut race = Race::new(config)?;
    race.apply_all(events)?;

    let results = classify_all(race.competitors(), config);
    log::info!(
        "Classified {} of {} competitors",
        results.len(),
        race.len()
    );

    Ok(assemble(results))
}
