use crate::proposals::{ProposalRow, VotingSummary};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use tally_lib::{TallyOutcome, VoteRecord, VoterRole};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One proposal's output record: metadata, the DRep-side summary and the SPO
/// tally. The SPO fields are optional as a whole: a proposal whose tally
/// failed shows up as a row with null SPO fields, never as a missing row.
#[derive(Serialize, Clone, Debug)]
pub struct ProposalReportRow {
    pub proposal_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub kind: String,
    pub expiration: Option<u64>,
    pub drep_yes_pct: Decimal,
    pub drep_yes_votes_cast: u64,
    pub drep_no_votes_cast: u64,
    pub drep_abstain_votes_cast: u64,
    pub spo_yes_pct: Option<Decimal>,
    pub spo_yes_power: Option<Decimal>,
    pub spo_no_power: Option<Decimal>,
    pub spo_abstain_power: Option<Decimal>,
    pub spo_yes_votes_cast: Option<u64>,
    pub spo_no_votes_cast: Option<u64>,
    pub spo_abstain_votes_cast: Option<u64>,
    pub has_spo_votes: bool,
}

/// The full run output, serialized to JSON for downstream consumers.
#[derive(Serialize, Clone, Debug)]
pub struct Report {
    pub generated_at_utc: DateTime<Utc>,
    pub proposals: Vec<ProposalReportRow>,
}

/// Merges each proposal row with its summary and tally outcome, joined
/// positionally. A failed tally is logged and leaves a clearly marked gap.
pub fn assemble(
    rows: &[ProposalRow],
    summaries: &[VotingSummary],
    votes_per_proposal: &[Vec<VoteRecord>],
    outcomes: &[Result<TallyOutcome, tally_lib::Error>],
) -> Vec<ProposalReportRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let summary = summaries.get(i).cloned().unwrap_or_default();
            let has_spo_votes = votes_per_proposal
                .get(i)
                .map(|votes| votes.iter().any(|v| v.voter_role == VoterRole::Spo))
                .unwrap_or(false);

            let mut report_row = ProposalReportRow {
                proposal_id: row.proposal_id.clone(),
                title: row.title(),
                abstract_text: row.abstract_text(),
                kind: format!("{:?}", row.proposal_type),
                expiration: row.expiration,
                drep_yes_pct: summary.drep_yes_pct,
                drep_yes_votes_cast: summary.drep_yes_votes_cast,
                drep_no_votes_cast: summary.drep_no_votes_cast,
                drep_abstain_votes_cast: summary.drep_abstain_votes_cast,
                spo_yes_pct: None,
                spo_yes_power: None,
                spo_no_power: None,
                spo_abstain_power: None,
                spo_yes_votes_cast: None,
                spo_no_votes_cast: None,
                spo_abstain_votes_cast: None,
                has_spo_votes,
            };

            match outcomes.get(i) {
                Some(Ok(outcome)) => {
                    if !outcome.unknown_voters.is_empty() {
                        warn!(
                            proposal_id = %row.proposal_id,
                            unknown = outcome.unknown_voters.len(),
                            "ballots from voters missing in the registry were ignored"
                        );
                    }
                    let tally = &outcome.tally;
                    report_row.spo_yes_pct = Some(tally.active_yes_share);
                    report_row.spo_yes_power = Some(tally.yes_power);
                    report_row.spo_no_power = Some(tally.no_power);
                    report_row.spo_abstain_power = Some(tally.abstain_power);
                    report_row.spo_yes_votes_cast = Some(tally.yes_votes_cast);
                    report_row.spo_no_votes_cast = Some(tally.no_votes_cast);
                    report_row.spo_abstain_votes_cast = Some(tally.abstain_votes_cast);
                }
                Some(Err(err)) => {
                    warn!(proposal_id = %row.proposal_id, %err, "tally failed, reporting gap");
                }
                None => {
                    warn!(proposal_id = %row.proposal_id, "no tally produced, reporting gap");
                }
            }
            report_row
        })
        .collect()
}

pub fn new_report(proposals: Vec<ProposalReportRow>) -> Report {
    Report {
        generated_at_utc: Utc::now(),
        proposals,
    }
}

pub fn write_json<W: Write>(report: &Report, writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn write_csv<W: Write>(rows: &[ProposalReportRow], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_lib::{
        tally_proposal, Proposal, ProposalKind, StandingStance, VoteChoice, VotingEntity,
    };

    fn proposal_row(id: &str) -> ProposalRow {
        serde_json::from_value(serde_json::json!({
            "proposal_id": id,
            "proposal_type": "InfoAction",
            "expiration": 590,
            "meta_json": {"body": {"title": "Raise k", "abstract": ""}}
        }))
        .unwrap()
    }

    fn sample_outcome() -> TallyOutcome {
        let entities = vec![
            VotingEntity {
                id: "pool1a".to_string(),
                weight: dec!(100),
                standing_stance: StandingStance::None,
            },
            VotingEntity {
                id: "pool1b".to_string(),
                weight: dec!(50),
                standing_stance: StandingStance::AlwaysAbstain,
            },
        ];
        let votes = vec![VoteRecord {
            proposal_id: "gov1".to_string(),
            voter_id: "pool1a".to_string(),
            voter_role: VoterRole::Spo,
            choice: Some(VoteChoice::Yes),
        }];
        let proposal = Proposal {
            id: "gov1".to_string(),
            kind: ProposalKind::InfoAction,
            ratified_epoch: None,
            enacted_epoch: None,
            dropped_epoch: None,
            expired_epoch: None,
        };
        tally_proposal(&proposal, &entities, &votes, VoterRole::Spo).unwrap()
    }

    #[test]
    fn failed_tally_leaves_a_null_gap_not_a_missing_row() {
        let rows = vec![proposal_row("gov1"), proposal_row("gov2")];
        let summaries = vec![VotingSummary::default(), VotingSummary::default()];
        let votes = vec![Vec::new(), Vec::new()];
        let outcomes = vec![
            Ok(sample_outcome()),
            Err(tally_lib::Error::MissingProposalId),
        ];

        let report_rows = assemble(&rows, &summaries, &votes, &outcomes);
        assert_eq!(report_rows.len(), 2);
        assert_eq!(report_rows[0].spo_yes_power, Some(dec!(100)));
        assert_eq!(report_rows[1].spo_yes_power, None);

        let json = serde_json::to_value(&report_rows[1]).unwrap();
        assert_eq!(json["spo_yes_pct"], serde_json::Value::Null);
        assert_eq!(json["proposal_id"], "gov2");
    }

    #[test]
    fn has_spo_votes_reflects_explicit_ballots_only() {
        let rows = vec![proposal_row("gov1")];
        let summaries = vec![VotingSummary::default()];
        let drep_only = vec![vec![VoteRecord {
            proposal_id: "gov1".to_string(),
            voter_id: "drep1x".to_string(),
            voter_role: VoterRole::Drep,
            choice: Some(VoteChoice::Yes),
        }]];
        let outcomes = vec![Ok(sample_outcome())];

        let report_rows = assemble(&rows, &summaries, &drep_only, &outcomes);
        assert!(!report_rows[0].has_spo_votes);
    }

    #[test]
    fn csv_output_has_header_and_one_row_per_proposal() {
        let rows = vec![proposal_row("gov1"), proposal_row("gov2")];
        let summaries = vec![VotingSummary::default(), VotingSummary::default()];
        let votes = vec![Vec::new(), Vec::new()];
        let outcomes = vec![Ok(sample_outcome()), Ok(sample_outcome())];
        let report_rows = assemble(&rows, &summaries, &votes, &outcomes);

        let mut buf = Vec::new();
        write_csv(&report_rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("proposal_id,title,abstract,kind"));
    }
}
