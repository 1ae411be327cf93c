use crate::VoterId;
use serde::{Deserialize, Serialize};

/// A well-formed ballot value.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
}

impl VoteChoice {
    /// Lenient parse of the ballot string reported by the indexer. `None`
    /// marks a malformed value, which the engine treats as a data-quality
    /// guard (no attribution) rather than a silent default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "yes" => Some(VoteChoice::Yes),
            "no" => Some(VoteChoice::No),
            "abstain" => Some(VoteChoice::Abstain),
            _ => None,
        }
    }
}

/// Role under which a ballot was cast. Only records matching the role being
/// tallied are considered; everything else is ignored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(from = "String")]
pub enum VoterRole {
    #[serde(rename = "SPO")]
    Spo,
    #[serde(rename = "DRep")]
    Drep,
    ConstitutionalCommittee,
    Other,
}

impl VoterRole {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "SPO" => VoterRole::Spo,
            "DRep" => VoterRole::Drep,
            "ConstitutionalCommittee" => VoterRole::ConstitutionalCommittee,
            _ => VoterRole::Other,
        }
    }
}

impl From<String> for VoterRole {
    fn from(raw: String) -> Self {
        VoterRole::parse(&raw)
    }
}

/// One explicit ballot cast on a proposal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    pub proposal_id: String,
    pub voter_id: VoterId,
    pub voter_role: VoterRole,
    /// `None` when the source reported an unrecognized ballot value.
    pub choice: Option<VoteChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ballot_values_case_insensitively() {
        assert_eq!(VoteChoice::parse("Yes"), Some(VoteChoice::Yes));
        assert_eq!(VoteChoice::parse("no"), Some(VoteChoice::No));
        assert_eq!(VoteChoice::parse("ABSTAIN"), Some(VoteChoice::Abstain));
    }

    #[test]
    fn malformed_ballot_values_parse_to_none() {
        assert_eq!(VoteChoice::parse(""), None);
        assert_eq!(VoteChoice::parse("maybe"), None);
        assert_eq!(VoteChoice::parse("yes "), Some(VoteChoice::Yes));
    }

    #[test]
    fn unknown_roles_collapse_to_other() {
        assert_eq!(VoterRole::parse("SPO"), VoterRole::Spo);
        assert_eq!(VoterRole::parse("DRep"), VoterRole::Drep);
        assert_eq!(
            VoterRole::parse("ConstitutionalCommittee"),
            VoterRole::ConstitutionalCommittee
        );
        assert_eq!(VoterRole::parse("Oracle"), VoterRole::Other);
    }
}
