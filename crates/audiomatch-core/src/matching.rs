//! Fingerprint scoring and match decisions
//!
//! Two fingerprints are compared token by token after dropping the low
//! decimal digits of each token. The acceptance threshold is scaled from the
//! weaker source's self-comparison score instead of being a fixed cutoff.

use crate::config::MatchConfig;
use crate::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};


/// Why a pair did or did not match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Match,
    NoMatch,
    /// Durations differ; nothing was scored
    DurationMismatch,
    /// One side has no tokens; nothing was scored
    EmptyFingerprint,
}

/// Scores behind one match decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub outcome: MatchOutcome,
    /// Smaller of the two self-comparison scores
    pub base_score: usize,
    /// Cross-comparison score
    pub final_score: usize,
    /// `base_score * accuracy`
    pub threshold: f64,
}

impl MatchReport {
    fn unscored(outcome: MatchOutcome) -> Self {
        Self {
            outcome,
            base_score: 0,
            final_score: 0,
            threshold: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.outcome == MatchOutcome::Match
    }
}

/// Parse a token into a finite number; anything else cannot agree with
/// another token.
fn parse_token(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Count the positions where two fingerprints agree.
///
/// Both tokens are divided by `10^power`; a position counts when the
/// truncated difference between the larger and smaller scaled value is at
/// most `offset`. Only the first `min(len)` positions are compared.
pub fn score(fp1: &Fingerprint, fp2: &Fingerprint, power: u32, offset: i64) -> usize {
    let scale = 10f64.powi(power as i32);

    fp1.tokens()
        .iter()
        .zip(fp2.tokens())
        .filter(|(a, b)| {
            let (Some(first), Some(second)) = (parse_token(a), parse_token(b)) else {
                return false;
            };
            let first = first / scale;
            let second = second / scale;
            let (high, low) = if first >= second {
                (first, second)
            } else {
                (second, first)
            };
            ((high - low).trunc() as i64) <= offset
        })
        .count()
}

/// Match decision maker
#[derive(Debug, Clone)]
pub struct Matcher {
    intensity: u32,
    threshold: i64,
    accuracy: f64,
}

impl Matcher {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            intensity: config.intensity,
            threshold: config.threshold,
            accuracy: config.accuracy,
        }
    }

    /// Score two fingerprints with this matcher's quantization
    pub fn score(&self, fp1: &Fingerprint, fp2: &Fingerprint) -> usize {
        score(fp1, fp2, self.intensity, self.threshold)
    }

    /// Compare two sources and report the scores behind the decision
    pub fn compare(
        &self,
        fp_a: &Fingerprint,
        duration_a: f64,
        fp_b: &Fingerprint,
        duration_b: f64,
    ) -> MatchReport {
        if duration_a != duration_b {
            log::trace!("Duration mismatch: {}s vs {}s", duration_a, duration_b);
            return MatchReport::unscored(MatchOutcome::DurationMismatch);
        }
        if fp_a.is_empty() || fp_b.is_empty() {
            log::trace!(
                "Empty fingerprint: {} vs {} tokens",
                fp_a.len(),
                fp_b.len()
            );
            return MatchReport::unscored(MatchOutcome::EmptyFingerprint);
        }

        let base_a = self.score(fp_a, fp_a);
        let base_b = self.score(fp_b, fp_b);
        let base_score = base_a.min(base_b);
        let final_score = self.score(fp_a, fp_b);
        let threshold = base_score as f64 * self.accuracy;

        let outcome = if final_score as f64 >= threshold {
            MatchOutcome::Match
        } else {
            MatchOutcome::NoMatch
        };

        log::trace!(
            "base {} (a {}, b {}), final {}, threshold {:.2}: {:?}",
            base_score,
            base_a,
            base_b,
            final_score,
            threshold,
            outcome
        );

        MatchReport {
            outcome,
            base_score,
            final_score,
            threshold,
        }
    }

    /// Whether two sources carry the same acoustic content
    pub fn is_match(
        &self,
        fp_a: &Fingerprint,
        duration_a: f64,
        fp_b: &Fingerprint,
        duration_b: f64,
    ) -> bool {
        self.compare(fp_a, duration_a, fp_b, duration_b).is_match()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}
