use crate::client::{Error, KoiosClient};
use serde::Deserialize;
use tally_lib::{VoteChoice, VoteRecord, VoterRole};

/// One ballot as reported by the indexer. Role and choice arrive as free
/// text and are resolved to the closed enums right here, at the boundary.
#[derive(Deserialize, Clone, Debug)]
pub struct VoteRow {
    pub voter_id: String,
    #[serde(default)]
    pub voter_role: String,
    #[serde(default)]
    pub vote: String,
}

impl VoteRow {
    pub fn to_record(&self, proposal_id: &str) -> VoteRecord {
        VoteRecord {
            proposal_id: proposal_id.to_string(),
            voter_id: self.voter_id.clone(),
            voter_role: VoterRole::parse(&self.voter_role),
            choice: VoteChoice::parse(&self.vote),
        }
    }
}

/// Fetches every explicit ballot cast on one proposal, all roles included;
/// the engine filters down to the role it tallies.
pub fn load_votes(client: &KoiosClient, proposal_id: &str) -> Result<Vec<VoteRecord>, Error> {
    let rows: Vec<VoteRow> =
        client.get_paginated(&format!("proposal_votes?_proposal_id={proposal_id}"))?;
    Ok(rows.iter().map(|row| row.to_record(proposal_id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_rows_to_core_records() {
        let rows: Vec<VoteRow> = serde_json::from_str(
            r#"[
                {"voter_id": "pool1abc", "voter_role": "SPO", "vote": "Yes"},
                {"voter_id": "drep1xyz", "voter_role": "DRep", "vote": "No"},
                {"voter_id": "pool1def", "voter_role": "SPO", "vote": "Present"}
            ]"#,
        )
        .unwrap();
        let records: Vec<VoteRecord> = rows.iter().map(|r| r.to_record("gov1")).collect();

        assert_eq!(records[0].voter_role, VoterRole::Spo);
        assert_eq!(records[0].choice, Some(VoteChoice::Yes));
        assert_eq!(records[1].voter_role, VoterRole::Drep);
        // Unrecognized ballot value survives as a malformed record, it is
        // not dropped here.
        assert_eq!(records[2].choice, None);
        assert!(records.iter().all(|r| r.proposal_id == "gov1"));
    }
}
