use serde::{Deserialize, Serialize};

/// Governance action kind, as reported by the chain indexer. Kinds this
/// tooling does not know about collapse to `Other` instead of failing the
/// whole payload.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(from = "String")]
pub enum ProposalKind {
    ParameterChange,
    HardForkInitiation,
    TreasuryWithdrawals,
    NoConfidence,
    CommitteeNoConfidence,
    NewCommittee,
    NewConstitution,
    InfoAction,
    Other,
}

impl From<String> for ProposalKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ParameterChange" => ProposalKind::ParameterChange,
            "HardForkInitiation" => ProposalKind::HardForkInitiation,
            "TreasuryWithdrawals" => ProposalKind::TreasuryWithdrawals,
            "NoConfidence" => ProposalKind::NoConfidence,
            "CommitteeNoConfidence" => ProposalKind::CommitteeNoConfidence,
            "NewCommittee" => ProposalKind::NewCommittee,
            "NewConstitution" => ProposalKind::NewConstitution,
            "InfoAction" => ProposalKind::InfoAction,
            _ => ProposalKind::Other,
        }
    }
}

/// A governance proposal as the tally engine sees it: identifier, lifecycle
/// flags and kind. Presentation metadata (title, abstract) stays with the
/// loaders.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub id: String,
    pub kind: ProposalKind,
    pub ratified_epoch: Option<u64>,
    pub enacted_epoch: Option<u64>,
    pub dropped_epoch: Option<u64>,
    pub expired_epoch: Option<u64>,
}

impl Proposal {
    /// A proposal is open iff none of the lifecycle flags is set and it is
    /// not a committee no-confidence motion. That kind has its own dedicated
    /// mechanism and is excluded from this tally entirely.
    pub fn is_open(&self) -> bool {
        self.ratified_epoch.is_none()
            && self.enacted_epoch.is_none()
            && self.dropped_epoch.is_none()
            && self.expired_epoch.is_none()
            && self.kind != ProposalKind::CommitteeNoConfidence
    }
}

/// Filtered view over a proposal collection, keeping only the ones still
/// open for voting.
pub fn open_proposals(proposals: impl IntoIterator<Item = Proposal>) -> Vec<Proposal> {
    proposals.into_iter().filter(Proposal::is_open).collect()
}
