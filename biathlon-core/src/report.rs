//! Report assembly
//!
//! Orders classified results into the final standings: finishers first, then
//! competitors who abandoned, then non-starters; ties broken by ascending id.

use crate::types::CompetitorResult;
use std::cmp::Ordering;

/// Standings order of two results
pub fn standings_order(a: &CompetitorResult, b: &CompetitorResult) -> Ordering {
    a.status.cmp(&b.status).then_with(|| a.id.cmp(&b.id))
}

/// Stable-sort results into standings order
pub fn sort_results(results: &mut [CompetitorResult]) {
    results.sort_by(standings_order);
}

/// Build the final ordered report from classified results
pub fn assemble(mut results: Vec<CompetitorResult>) -> Vec<CompetitorResult> {
    sort_results(&mut results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn result(id: i64, status: Status) -> CompetitorResult {
        CompetitorResult {
            id,
            status,
            hits: "0/5".to_string(),
            comment: None,
            timing: None,
        }
    }

    #[test]
    fn test_status_takes_precedence() {
        let report = assemble(vec![
            result(1, Status::NotStarted),
            result(2, Status::Finished),
            result(3, Status::NotFinished),
        ]);
        let statuses: Vec<_> = report.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Finished, Status::NotFinished, Status::NotStarted]
        );
    }

    #[test]
    fn test_ids_ascending_within_status() {
        let report = assemble(vec![
            result(9, Status::NotStarted),
            result(5, Status::Finished),
            result(4, Status::NotStarted),
            result(2, Status::Finished),
            result(7, Status::NotFinished),
            result(-3, Status::NotStarted),
        ]);
        let ids: Vec<_> = report.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 5, 7, -3, 4, 9]);
    }
}
