use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::config::GovernanceConfig;

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Storage keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Initialized,
    Staking,
    Treasury,
    Config,
    CurrentCycle,
    ProposalCounter,
    Cycle(u64),
    CycleProposals(u64),
    Proposal(u64),
    KindCount(u64, ProposalKind),
    Proposed(u64, Address, ProposalKind),
    Receipt(u64, Address),
}

// ── Records ──────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProposalKind {
    /// Push treasury funds into the staking reward streams.
    Boost,
    /// Pay treasury funds to an arbitrary recipient.
    Transfer,
}

/// One propose → vote → execute round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cycle {
    pub id: u64,
    pub proposal_window_start: u64,
    pub proposal_window_end: u64,
    pub voting_window_end: u64,
    pub executed: bool,
}

impl Cycle {
    pub fn accepts_proposals(&self, now: u64) -> bool {
        now >= self.proposal_window_start && now <= self.proposal_window_end
    }

    pub fn accepts_votes(&self, now: u64) -> bool {
        now > self.proposal_window_end && now <= self.voting_window_end
    }

    pub fn voting_ended(&self, now: u64) -> bool {
        now > self.voting_window_end
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CyclePhase {
    ProposalWindow,
    VotingWindow,
    /// Voting is over and a winner is waiting to be executed.
    Executable,
    Executed,
    /// Voting is over and nothing qualified.
    Defeated,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProposalState {
    Pending,
    Active,
    Defeated,
    Succeeded,
    Executed,
}

/// Values frozen when a proposal is created. Quorum and approval are always
/// judged against these, never against live supply or config.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposalSnapshot {
    pub total_supply: i128,
    pub quorum_bps: u32,
    pub approval_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub cycle_id: u64,
    pub kind: ProposalKind,
    pub proposer: Address,
    pub token: Address,
    pub amount: i128,
    /// Only set for `Transfer` proposals.
    pub recipient: Option<Address>,
    pub description: String,
    pub created_at: u64,
    /// Sum of voting power in favour.
    pub yes_votes: i128,
    /// Sum of voting power against.
    pub no_votes: i128,
    /// Sum of staked balances of everyone who voted, in supply units.
    pub total_balance_voted: i128,
    pub voter_count: u32,
    pub executed: bool,
    pub snapshot: ProposalSnapshot,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteReceipt {
    pub support: bool,
    pub votes: i128,
    pub balance: i128,
    pub timestamp: u64,
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Typed access to governance state. Counters and addresses live in instance
/// storage; cycles, proposals and receipts are persistent entries.
pub struct GovernanceStore<'a> {
    env: &'a Env,
}

impl<'a> GovernanceStore<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    pub fn is_initialized(&self) -> bool {
        self.env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn mark_initialized(&self) {
        self.env.storage().instance().set(&DataKey::Initialized, &true);
    }

    pub fn staking(&self) -> Option<Address> {
        self.env.storage().instance().get(&DataKey::Staking)
    }

    pub fn treasury(&self) -> Option<Address> {
        self.env.storage().instance().get(&DataKey::Treasury)
    }

    pub fn set_collaborators(&self, staking: &Address, treasury: &Address) {
        self.env.storage().instance().set(&DataKey::Staking, staking);
        self.env.storage().instance().set(&DataKey::Treasury, treasury);
    }

    pub fn config(&self) -> Option<GovernanceConfig> {
        self.env.storage().instance().get(&DataKey::Config)
    }

    pub fn set_config(&self, config: &GovernanceConfig) {
        self.env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn current_cycle_id(&self) -> u64 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::CurrentCycle)
            .unwrap_or(0)
    }

    pub fn set_current_cycle_id(&self, id: u64) {
        self.env.storage().instance().set(&DataKey::CurrentCycle, &id);
    }

    pub fn next_proposal_id(&self) -> u64 {
        let current: u64 = self
            .env
            .storage()
            .instance()
            .get(&DataKey::ProposalCounter)
            .unwrap_or(0);
        let next = current.saturating_add(1);
        self.env
            .storage()
            .instance()
            .set(&DataKey::ProposalCounter, &next);
        next
    }

    // ── Cycles ───────────────────────────────────────────────────────────

    pub fn cycle(&self, id: u64) -> Option<Cycle> {
        self.read(&DataKey::Cycle(id))
    }

    pub fn set_cycle(&self, cycle: &Cycle) {
        self.write(&DataKey::Cycle(cycle.id), cycle);
    }

    pub fn cycle_proposals(&self, cycle_id: u64) -> Vec<u64> {
        self.read(&DataKey::CycleProposals(cycle_id))
            .unwrap_or_else(|| Vec::new(self.env))
    }

    pub fn push_cycle_proposal(&self, cycle_id: u64, proposal_id: u64) {
        let mut ids = self.cycle_proposals(cycle_id);
        ids.push_back(proposal_id);
        self.write(&DataKey::CycleProposals(cycle_id), &ids);
    }

    // ── Proposals ────────────────────────────────────────────────────────

    pub fn proposal(&self, id: u64) -> Option<Proposal> {
        self.read(&DataKey::Proposal(id))
    }

    pub fn set_proposal(&self, proposal: &Proposal) {
        self.write(&DataKey::Proposal(proposal.id), proposal);
    }

    pub fn kind_count(&self, cycle_id: u64, kind: ProposalKind) -> u32 {
        self.read(&DataKey::KindCount(cycle_id, kind)).unwrap_or(0)
    }

    pub fn set_kind_count(&self, cycle_id: u64, kind: ProposalKind, count: u32) {
        self.write(&DataKey::KindCount(cycle_id, kind), &count);
    }

    pub fn has_proposed(&self, cycle_id: u64, proposer: &Address, kind: ProposalKind) -> bool {
        self.env
            .storage()
            .persistent()
            .has(&DataKey::Proposed(cycle_id, proposer.clone(), kind))
    }

    pub fn mark_proposed(&self, cycle_id: u64, proposer: &Address, kind: ProposalKind) {
        self.write(&DataKey::Proposed(cycle_id, proposer.clone(), kind), &true);
    }

    // ── Votes ────────────────────────────────────────────────────────────

    pub fn receipt(&self, proposal_id: u64, voter: &Address) -> Option<VoteReceipt> {
        self.read(&DataKey::Receipt(proposal_id, voter.clone()))
    }

    pub fn set_receipt(&self, proposal_id: u64, voter: &Address, receipt: &VoteReceipt) {
        self.write(&DataKey::Receipt(proposal_id, voter.clone()), receipt);
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn read<V>(&self, key: &DataKey) -> Option<V>
    where
        V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    {
        let value: Option<V> = self.env.storage().persistent().get(key);
        if value.is_some() {
            self.env
                .storage()
                .persistent()
                .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
        }
        value
    }

    fn write<V>(&self, key: &DataKey, value: &V)
    where
        V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        self.env.storage().persistent().set(key, value);
        self.env
            .storage()
            .persistent()
            .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
