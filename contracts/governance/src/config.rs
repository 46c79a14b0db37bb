use soroban_sdk::contracttype;

use common::BPS_DENOMINATOR;

/// Global governance parameters.
///
/// Proposals copy the thresholds they are judged by at creation time, and
/// cycles fix their windows when they start, so replacing the config never
/// changes the outcome of anything already in flight.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceConfig {
    pub proposal_window_seconds: u64,
    pub voting_window_seconds: u64,
    /// Share of the supply snapshot that must take part in a vote.
    pub quorum_bps: u32,
    /// Share of cast votes that must be in favour.
    pub approval_bps: u32,
    /// Share of total supply a proposer must have staked.
    pub min_stake_bps: u32,
    /// Largest proposal amount as a share of the treasury's balance.
    pub max_proposal_amount_bps: u32,
    /// Proposals of one kind allowed per cycle.
    pub max_active_proposals: u32,
}

impl GovernanceConfig {
    pub fn is_valid(&self) -> bool {
        let max = BPS_DENOMINATOR as u32;
        self.proposal_window_seconds > 0
            && self.voting_window_seconds > 0
            && self.quorum_bps <= max
            && self.approval_bps <= max
            && self.min_stake_bps <= max
            && self.max_proposal_amount_bps <= max
            && self.max_active_proposals > 0
    }
}
