use crate::{Power, VoterId};
use serde::{Deserialize, Serialize};

/// A voter's pre-registered default behavior, applied when it casts no
/// explicit vote on a proposal.
///
/// Resolved once from the raw delegation literal when the registry is loaded;
/// nothing downstream ever looks at the free-text label again.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StandingStance {
    None,
    AlwaysAbstain,
    AlwaysNoConfidence,
}

impl Default for StandingStance {
    fn default() -> Self {
        StandingStance::None
    }
}

impl StandingStance {
    /// Resolves the delegation literal reported by the registry source
    /// (e.g. `drep_always_abstain`, `Always Abstain`) into the closed enum.
    /// Anything unrecognized, including an absent literal, means no standing
    /// stance.
    pub fn from_delegation_literal(raw: Option<&str>) -> Self {
        let normalized = match raw {
            Some(s) => normalize_literal(s),
            None => return StandingStance::None,
        };
        if normalized.contains("always_abstain") {
            StandingStance::AlwaysAbstain
        } else if normalized.contains("always_no_confidence") {
            StandingStance::AlwaysNoConfidence
        } else {
            StandingStance::None
        }
    }
}

/// Lowercases and collapses separator characters so the same delegation
/// label always groups together regardless of the source's formatting.
fn normalize_literal(raw: &str) -> String {
    let mut s: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '-' | ' ' | ':' | '.' => '_',
            other => other,
        })
        .collect();
    while s.contains("__") {
        s = s.replace("__", "_");
    }
    s
}

/// An actor whose weight counts toward a proposal's outcome.
///
/// Built fresh from the registry at the start of a run and immutable
/// thereafter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VotingEntity {
    pub id: VoterId,
    /// Voting power in ADA. Entities reported without a weight get zero and
    /// are skipped by the tally engine.
    pub weight: Power,
    #[serde(default)]
    pub standing_stance: StandingStance,
}
