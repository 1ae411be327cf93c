use crate::client::{Error, KoiosClient};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_lib::{Proposal, ProposalKind};
use tracing::info;

/// One row of the indexer's proposal list, presentation metadata included.
#[derive(Deserialize, Clone, Debug)]
pub struct ProposalRow {
    pub proposal_id: String,
    #[serde(default = "other_kind")]
    pub proposal_type: ProposalKind,
    #[serde(default)]
    pub ratified_epoch: Option<u64>,
    #[serde(default)]
    pub enacted_epoch: Option<u64>,
    #[serde(default)]
    pub dropped_epoch: Option<u64>,
    #[serde(default)]
    pub expired_epoch: Option<u64>,
    #[serde(default)]
    pub expiration: Option<u64>,
    #[serde(default)]
    pub meta_json: Option<serde_json::Value>,
}

fn other_kind() -> ProposalKind {
    ProposalKind::Other
}

impl ProposalRow {
    pub fn to_proposal(&self) -> Proposal {
        Proposal {
            id: self.proposal_id.clone(),
            kind: self.proposal_type,
            ratified_epoch: self.ratified_epoch,
            enacted_epoch: self.enacted_epoch,
            dropped_epoch: self.dropped_epoch,
            expired_epoch: self.expired_epoch,
        }
    }

    pub fn title(&self) -> String {
        self.meta_body_field("title")
            .unwrap_or_else(|| "No Title".to_string())
    }

    pub fn abstract_text(&self) -> String {
        self.meta_body_field("abstract").unwrap_or_default()
    }

    fn meta_body_field(&self, field: &str) -> Option<String> {
        self.meta_json
            .as_ref()?
            .get("body")?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }
}

/// DRep-side numbers of the indexer's per-proposal voting summary; the
/// report carries them alongside the SPO tally.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct VotingSummary {
    #[serde(default)]
    pub drep_yes_pct: Decimal,
    #[serde(default)]
    pub drep_yes_votes_cast: u64,
    #[serde(default)]
    pub drep_no_votes_cast: u64,
    #[serde(default)]
    pub drep_abstain_votes_cast: u64,
}

/// Fetches the proposal list and keeps only proposals still open for voting
/// (no lifecycle flag set, committee no-confidence excluded).
pub fn load_open_proposals(client: &KoiosClient) -> Result<Vec<ProposalRow>, Error> {
    let rows: Vec<ProposalRow> = client.get_paginated("proposal_list")?;
    let total = rows.len();
    let open: Vec<ProposalRow> = rows
        .into_iter()
        .filter(|row| row.to_proposal().is_open())
        .collect();
    info!(open = open.len(), total, "fetched proposal list");
    Ok(open)
}

/// Fetches the voting summary for one proposal. A proposal the summary
/// endpoint does not know yields the zeroed default rather than an error.
pub fn load_voting_summary(client: &KoiosClient, proposal_id: &str) -> Result<VotingSummary, Error> {
    Ok(client
        .get_first(&format!("proposal_voting_summary?_proposal_id={proposal_id}"))?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_proposal_row_with_metadata() {
        let row: ProposalRow = serde_json::from_str(
            r#"{
                "proposal_id": "gov_action1xyz",
                "proposal_type": "InfoAction",
                "ratified_epoch": null,
                "enacted_epoch": null,
                "dropped_epoch": null,
                "expired_epoch": null,
                "expiration": 590,
                "meta_json": {"body": {"title": "Raise k", "abstract": "Increase the pool count target."}}
            }"#,
        )
        .unwrap();
        assert_eq!(row.title(), "Raise k");
        assert_eq!(row.abstract_text(), "Increase the pool count target.");
        assert!(row.to_proposal().is_open());
    }

    #[test]
    fn unknown_kind_and_missing_metadata_are_tolerated() {
        let row: ProposalRow = serde_json::from_str(
            r#"{"proposal_id": "gov_action1abc", "proposal_type": "SomethingNew"}"#,
        )
        .unwrap();
        assert_eq!(row.proposal_type, ProposalKind::Other);
        assert_eq!(row.title(), "No Title");
        assert_eq!(row.abstract_text(), "");
    }

    #[test]
    fn summary_defaults_to_zero_fields() {
        let summary: VotingSummary = serde_json::from_str(r#"{"drep_yes_pct": 61.5}"#).unwrap();
        assert_eq!(summary.drep_yes_votes_cast, 0);
        assert_eq!(summary.drep_yes_pct, rust_decimal_macros::dec!(61.5));
    }
}
