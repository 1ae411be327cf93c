use crate::{Power, Proposal, StandingStance, VoteChoice, VoteRecord, VoterId, VoterRole, VotingEntity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("proposal is missing an identifier")]
    MissingProposalId,
}

/// Per-proposal voting power distribution among a single voter role,
/// explicit ballots and default-stance weight combined.
///
/// Power and ballot counts are tracked separately on purpose: weight
/// attributed through a standing stance carries no ballot, so the counts
/// report only votes actually cast.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerTally {
    pub yes_power: Power,
    pub no_power: Power,
    pub abstain_power: Power,
    pub yes_votes_cast: u64,
    pub no_votes_cast: u64,
    pub abstain_votes_cast: u64,
    /// Yes power as a percentage of active (Yes + No) power; zero when no
    /// active power exists.
    pub active_yes_share: Power,
}

impl PowerTally {
    fn attribute_ballot(&mut self, choice: VoteChoice, weight: Power) {
        match choice {
            VoteChoice::Yes => {
                self.yes_power += weight;
                self.yes_votes_cast += 1;
            }
            VoteChoice::No => {
                self.no_power += weight;
                self.no_votes_cast += 1;
            }
            VoteChoice::Abstain => {
                self.abstain_power += weight;
                self.abstain_votes_cast += 1;
            }
        }
    }
}

/// Engine output for one proposal: the tally itself plus the voters that
/// cast a ballot without appearing in the entity registry. Those records are
/// ignored for tallying but surfaced so callers can log them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyOutcome {
    pub tally: PowerTally,
    pub unknown_voters: Vec<VoterId>,
}

/// Tallies one proposal: every registered entity with positive weight lands
/// in exactly one bucket, either through its explicit ballot or through its
/// standing stance.
///
/// Pure and order-independent: permuting `entities` or `votes` never changes
/// the result.
pub fn tally_proposal(
    proposal: &Proposal,
    entities: &[VotingEntity],
    votes: &[VoteRecord],
    role: VoterRole,
) -> Result<TallyOutcome, Error> {
    if proposal.id.is_empty() {
        return Err(Error::MissingProposalId);
    }

    // First record per voter wins; later duplicates are never double-counted.
    let mut ballots: HashMap<&str, Option<VoteChoice>> = HashMap::new();
    for record in votes {
        if record.voter_role != role || record.proposal_id != proposal.id {
            continue;
        }
        ballots.entry(record.voter_id.as_str()).or_insert(record.choice);
    }

    let registered: HashSet<&str> = entities.iter().map(|e| e.id.as_str()).collect();
    let mut unknown_voters: Vec<VoterId> = ballots
        .keys()
        .filter(|id| !registered.contains(**id))
        .map(|id| (*id).to_string())
        .collect();
    unknown_voters.sort_unstable();

    let mut tally = PowerTally::default();
    for entity in entities {
        if entity.weight <= Power::ZERO {
            continue;
        }
        match ballots.get(entity.id.as_str()) {
            Some(Some(choice)) => tally.attribute_ballot(*choice, entity.weight),
            // A ballot was recorded but its value was unrecognized: the
            // entity gets no attribution at all, not a default.
            Some(None) => {}
            None => match entity.standing_stance {
                StandingStance::AlwaysAbstain => tally.abstain_power += entity.weight,
                // No standing stance and always-no-confidence both count as
                // a passive No on ordinary proposals; committee no-confidence
                // motions are excluded upstream.
                StandingStance::None | StandingStance::AlwaysNoConfidence => {
                    tally.no_power += entity.weight
                }
            },
        }
    }
    tally.active_yes_share = yes_share(tally.yes_power, tally.no_power);

    Ok(TallyOutcome {
        tally,
        unknown_voters,
    })
}

/// Yes power as a percentage of active (Yes + No) power. Total: a zero
/// denominator yields zero, not an error.
pub fn yes_share(yes: Power, no: Power) -> Power {
    let active = yes + no;
    if active.is_zero() {
        Power::ZERO
    } else {
        yes / active * Decimal::from(100)
    }
}

/// Tallies a batch of proposals, vote lists joined positionally by proposal
/// index. Proposals are independent: a structural failure or a missing vote
/// list for one never blocks the others, and a proposal with no vote records
/// still reflects the full default-stance weight distribution.
pub fn tally_proposals(
    proposals: &[Proposal],
    entities: &[VotingEntity],
    votes_per_proposal: &[Vec<VoteRecord>],
    role: VoterRole,
) -> Vec<Result<TallyOutcome, Error>> {
    proposals
        .iter()
        .enumerate()
        .map(|(i, proposal)| {
            let votes = votes_per_proposal.get(i).map(Vec::as_slice).unwrap_or(&[]);
            tally_proposal(proposal, entities, votes, role)
        })
        .collect()
}
