//! Result reporting

use audiomatch_core::MatchReport;
use serde::Serialize;

/// Outcome of one evaluated pair
#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    pub left: String,
    pub right: String,
    #[serde(flatten)]
    pub report: MatchReport,
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    pairs: usize,
    matches: usize,
    results: &'a [PairResult],
}

/// `MATCH <left> <right>` line for a matching pair
pub fn match_line(result: &PairResult) -> Option<String> {
    result
        .report
        .is_match()
        .then(|| format!("MATCH {} {}", result.left, result.right))
}

/// Print one line per matching pair
pub fn print_matches(results: &[PairResult]) {
    for line in results.iter().filter_map(match_line) {
        println!("{}", line);
    }
}

/// Print every evaluated pair as JSON with a match count
pub fn print_json_results(results: &[PairResult]) {
    let output = MatchOutput {
        pairs: results.len(),
        matches: results.iter().filter(|r| r.report.is_match()).count(),
        results,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}
