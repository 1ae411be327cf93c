pub mod proposal;
pub mod registry;
pub mod tally;
pub mod vote;

pub use proposal::{Proposal, ProposalKind};
pub use registry::{StandingStance, VotingEntity};
pub use tally::{tally_proposal, tally_proposals, yes_share, Error, PowerTally, TallyOutcome};
pub use vote::{VoteChoice, VoteRecord, VoterRole};

use rust_decimal::Decimal;

/// Voting power, always expressed in the base currency unit (ADA), never in
/// lovelace. Conversion from the chain's integer subunit happens once, at the
/// registry loading boundary.
pub type Power = Decimal;

/// Opaque voter identifier (e.g. a bech32 pool id).
pub type VoterId = String;
