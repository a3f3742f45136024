//! Event log parser
//!
//! The event log is plain text, one event per line:
//!
//! ```text
//! [09:05:59.867] 1 1
//! [09:15:00.841] 2 1 09:30:00.000
//! [09:59:45.000] 11 1 Lost in the forest
//! ```
//!
//! Fields are whitespace-separated: bracketed timestamp, event kind code,
//! competitor id, and an optional extra parameter which runs to the end of
//! the line. Blank lines are skipped; any malformed field aborts the load.

use crate::time::parse_time_of_day;
use crate::types::{CompetitorId, Event, EventKind, RaceError, Result};
use std::fs;
use std::path::Path;

/// Load and parse an event log file
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    log::info!("Loading event log: {:?}", path);

    let content = fs::read_to_string(path)?;
    let events = parse_events(&content)?;

    log::info!("Loaded {} events from {:?}", events.len(), path);
    Ok(events)
}

/// Parse the whole event log, preserving line order
pub fn parse_events(content: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        events.push(parse_event_line(line, index + 1)?);
    }

    Ok(events)
}

/// Parse a single non-blank line; `line_no` is 1-based and used in errors
pub fn parse_event_line(line: &str, line_no: usize) -> Result<Event> {
    let malformed = |reason: String| RaceError::MalformedEvent {
        line: line_no,
        reason,
    };

    let (timestamp, rest) =
        next_field(line).ok_or_else(|| malformed("missing timestamp".to_string()))?;
    let (kind, rest) = next_field(rest).ok_or_else(|| malformed("missing event kind".to_string()))?;
    let (competitor, rest) =
        next_field(rest).ok_or_else(|| malformed("missing competitor id".to_string()))?;

    let time = parse_time_of_day(timestamp.trim_matches(|c| c == '[' || c == ']'))
        .map_err(|e| malformed(e.to_string()))?;

    let code: u8 = kind
        .parse()
        .map_err(|_| malformed(format!("invalid event kind {:?}", kind)))?;
    let kind = EventKind::try_from(code).map_err(|e| malformed(e.to_string()))?;

    let competitor: CompetitorId = competitor
        .parse()
        .map_err(|_| malformed(format!("invalid competitor id {:?}", competitor)))?;

    let extra = rest.trim();
    let extra = (!extra.is_empty()).then(|| extra.to_string());

    Ok(Event {
        time,
        kind,
        competitor,
        extra,
    })
}

/// Split off the next whitespace-delimited field
fn next_field(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some(input.split_at(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_event_line() {
        let event = parse_event_line("[09:15:00.841] 2 1 09:30:00.000", 1).unwrap();
        assert_eq!(event.time, NaiveTime::from_hms_milli_opt(9, 15, 0, 841).unwrap());
        assert_eq!(event.kind, EventKind::StartTimeAssigned);
        assert_eq!(event.competitor, 1);
        assert_eq!(event.extra.as_deref(), Some("09:30:00.000"));

        let event = parse_event_line("[09:05:59.867] 1 1", 1).unwrap();
        assert_eq!(event.kind, EventKind::Registered);
        assert_eq!(event.extra, None);
    }

    #[test]
    fn test_comment_keeps_spaces() {
        let event = parse_event_line("[09:59:45.000] 11 3 Lost in the forest  ", 1).unwrap();
        assert_eq!(event.kind, EventKind::CannotContinue);
        assert_eq!(event.extra.as_deref(), Some("Lost in the forest"));
    }

    #[test]
    fn test_negative_competitor_id() {
        let event = parse_event_line("[10:00:00.000] 1 -4", 1).unwrap();
        assert_eq!(event.competitor, -4);
        assert_eq!(event.kind, EventKind::Registered);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let log = "\n[09:05:59.867] 1 1\n   \n[09:15:00.841] 1 2\n\n";
        let events = parse_events(log).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].competitor, 2);
    }

    #[test]
    fn test_extra_does_not_leak_between_lines() {
        let log = "[09:15:00.841] 2 1 09:30:00.000\n[09:16:00.000] 3 1";
        let events = parse_events(log).unwrap();
        assert_eq!(events[1].extra, None);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let cases = [
            "[09:05:59.867] x 1",
            "[09:05:59.867] 1 abc",
            "[09:05:59.867] 1 4.5",
            "[09:05:60.000] 1 1",
            "[09:05:59.867] 12 1",
            "[09:05:59] 1 1",
            "[09:05:59.867] 1",
        ];
        for case in cases {
            let log = format!("[09:00:00.000] 1 1\n\n{}", case);
            match parse_events(&log) {
                Err(RaceError::MalformedEvent { line, .. }) => assert_eq!(line, 3, "{}", case),
                other => panic!("{:?} should be malformed, got {:?}", case, other),
            }
        }
    }
}
