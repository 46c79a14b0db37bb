#![no_std]

pub mod config;
pub mod events;
pub mod interfaces;
pub mod storage;

use common::{apply_bps, meets_bps, AccessPolicy, AccessTier};
use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Vec};

pub use config::GovernanceConfig;
use interfaces::{StakingClient, TreasuryClient};
pub use storage::{
    Cycle, CyclePhase, GovernanceStore, Proposal, ProposalKind, ProposalSnapshot, ProposalState,
    VoteReceipt,
};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfig = 4,
    InvalidAmount = 5,
    InvalidRecipient = 6,
    ProposalWindowClosed = 7,
    VotingNotActive = 8,
    InsufficientStake = 9,
    AlreadyProposed = 10,
    MaxProposalsReached = 11,
    AmountExceedsCap = 12,
    ProposalNotFound = 13,
    AlreadyVoted = 14,
    NoVotingPower = 15,
    VotingNotEnded = 16,
    NotWinner = 17,
    ProposalNotInCurrentCycle = 18,
    AlreadyExecuted = 19,
    CycleStillActive = 20,
    ExecutableProposalsRemaining = 21,
    CycleNotFound = 22,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct GovernanceContract;

#[contractimpl]
impl GovernanceContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Wire governance to its staking and treasury contracts and open the
    /// first cycle at the current ledger time.
    pub fn initialize(
        env: Env,
        admin: Address,
        staking: Address,
        treasury: Address,
        config: GovernanceConfig,
    ) -> Result<(), ContractError> {
        let store = GovernanceStore::new(&env);
        if store.is_initialized() {
            return Err(ContractError::AlreadyInitialized);
        }
        if !config.is_valid() {
            return Err(ContractError::InvalidConfig);
        }

        store.mark_initialized();
        store.set_collaborators(&staking, &treasury);
        store.set_config(&config);
        AccessPolicy::new(&env).bootstrap(&admin);

        events::publish_initialized(&env, admin, staking, treasury);

        let cycle = Self::next_cycle(&store, &config, env.ledger().timestamp());
        Self::open_cycle(&env, &store, &cycle);

        Ok(())
    }

    // ── Cycles ──────────────────────────────────────────────────────────────

    /// Close the current cycle and open the next one. Anyone may call this
    /// once voting has ended, as long as no winner is left unexecuted.
    pub fn start_new_cycle(env: Env) -> Result<u64, ContractError> {
        let store = GovernanceStore::new(&env);
        Self::require_initialized(&store)?;
        let config = Self::config(&store)?;
        let now = env.ledger().timestamp();

        let current = Self::current_cycle(&store)?;
        if !current.executed && !current.voting_ended(now) {
            return Err(ContractError::CycleStillActive);
        }
        Self::require_no_pending_winner(&store, &current)?;

        let cycle = Self::next_cycle(&store, &config, now);
        Self::open_cycle(&env, &store, &cycle);
        Ok(cycle.id)
    }

    pub fn current_cycle_id(env: Env) -> u64 {
        GovernanceStore::new(&env).current_cycle_id()
    }

    pub fn get_cycle(env: Env, cycle_id: u64) -> Option<Cycle> {
        GovernanceStore::new(&env).cycle(cycle_id)
    }

    pub fn get_cycle_proposals(env: Env, cycle_id: u64) -> Vec<u64> {
        GovernanceStore::new(&env).cycle_proposals(cycle_id)
    }

    /// Where `cycle_id` stands at the current ledger time.
    pub fn get_cycle_phase(env: Env, cycle_id: u64) -> Result<CyclePhase, ContractError> {
        let store = GovernanceStore::new(&env);
        let cycle = store.cycle(cycle_id).ok_or(ContractError::CycleNotFound)?;
        Ok(Self::phase_of(&store, &cycle, env.ledger().timestamp()))
    }

    // ── Proposals ───────────────────────────────────────────────────────────

    /// Propose streaming `amount` of `token` from the treasury to stakers.
    pub fn propose_boost(
        env: Env,
        proposer: Address,
        token: Address,
        amount: i128,
    ) -> Result<u64, ContractError> {
        let description = String::from_str(&env, "");
        Self::propose(&env, proposer, ProposalKind::Boost, token, amount, None, description)
    }

    /// Propose paying `amount` of `token` from the treasury to `recipient`.
    pub fn propose_transfer(
        env: Env,
        proposer: Address,
        token: Address,
        recipient: Address,
        amount: i128,
        description: String,
    ) -> Result<u64, ContractError> {
        Self::propose(
            &env,
            proposer,
            ProposalKind::Transfer,
            token,
            amount,
            Some(recipient),
            description,
        )
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Option<Proposal> {
        GovernanceStore::new(&env).proposal(proposal_id)
    }

    pub fn proposal_state(env: Env, proposal_id: u64) -> Result<ProposalState, ContractError> {
        let store = GovernanceStore::new(&env);
        let proposal = store
            .proposal(proposal_id)
            .ok_or(ContractError::ProposalNotFound)?;
        if proposal.executed {
            return Ok(ProposalState::Executed);
        }
        let cycle = store
            .cycle(proposal.cycle_id)
            .ok_or(ContractError::CycleNotFound)?;
        let state = match Self::phase_of(&store, &cycle, env.ledger().timestamp()) {
            CyclePhase::ProposalWindow => ProposalState::Pending,
            CyclePhase::VotingWindow => ProposalState::Active,
            CyclePhase::Executable if Self::winner_of(&store, cycle.id) == proposal_id => {
                ProposalState::Succeeded
            }
            _ => ProposalState::Defeated,
        };
        Ok(state)
    }

    // ── Voting ──────────────────────────────────────────────────────────────

    /// Cast the caller's current voting power for or against a proposal.
    /// Power is read live; only the thresholds were frozen at proposal time.
    pub fn vote(
        env: Env,
        voter: Address,
        proposal_id: u64,
        support: bool,
    ) -> Result<(), ContractError> {
        let store = GovernanceStore::new(&env);
        Self::require_initialized(&store)?;
        voter.require_auth();

        let mut proposal = store
            .proposal(proposal_id)
            .ok_or(ContractError::ProposalNotFound)?;
        let cycle = store
            .cycle(proposal.cycle_id)
            .ok_or(ContractError::CycleNotFound)?;
        let now = env.ledger().timestamp();
        if proposal.cycle_id != store.current_cycle_id() || !cycle.accepts_votes(now) {
            return Err(ContractError::VotingNotActive);
        }
        if store.receipt(proposal_id, &voter).is_some() {
            return Err(ContractError::AlreadyVoted);
        }

        let staking = StakingClient::new(&env, &Self::staking(&store)?);
        let votes = staking.voting_power(&voter);
        if votes <= 0 {
            return Err(ContractError::NoVotingPower);
        }
        let balance = staking.balance(&voter);

        if support {
            proposal.yes_votes = proposal.yes_votes.saturating_add(votes);
        } else {
            proposal.no_votes = proposal.no_votes.saturating_add(votes);
        }
        proposal.total_balance_voted = proposal.total_balance_voted.saturating_add(balance);
        proposal.voter_count = proposal.voter_count.saturating_add(1);
        store.set_proposal(&proposal);
        store.set_receipt(
            proposal_id,
            &voter,
            &VoteReceipt {
                support,
                votes,
                balance,
                timestamp: now,
            },
        );

        events::publish_voted(&env, proposal_id, voter, support, votes);

        Ok(())
    }

    pub fn get_vote_receipt(env: Env, proposal_id: u64, voter: Address) -> Option<VoteReceipt> {
        GovernanceStore::new(&env).receipt(proposal_id, &voter)
    }

    /// Participating stake against the supply snapshot.
    pub fn meets_quorum(env: Env, proposal_id: u64) -> bool {
        GovernanceStore::new(&env)
            .proposal(proposal_id)
            .map(|p| Self::quorum_reached(&p))
            .unwrap_or(false)
    }

    /// Share of yes votes against the snapshotted approval threshold.
    pub fn meets_approval(env: Env, proposal_id: u64) -> bool {
        GovernanceStore::new(&env)
            .proposal(proposal_id)
            .map(|p| Self::approval_reached(&p))
            .unwrap_or(false)
    }

    /// Qualifying proposal of `cycle_id` with the most yes votes, the earliest
    /// one on a tie. `0` when nothing qualifies.
    pub fn get_winner(env: Env, cycle_id: u64) -> u64 {
        Self::winner_of(&GovernanceStore::new(&env), cycle_id)
    }

    // ── Execution ───────────────────────────────────────────────────────────

    /// Execute the winner of the current cycle and open the next one.
    ///
    /// The cycle is closed before the treasury is called; a failing treasury
    /// action reverts the whole invocation, closure included.
    pub fn execute(env: Env, proposal_id: u64) -> Result<(), ContractError> {
        let store = GovernanceStore::new(&env);
        Self::require_initialized(&store)?;
        let config = Self::config(&store)?;
        let now = env.ledger().timestamp();

        let mut proposal = store
            .proposal(proposal_id)
            .ok_or(ContractError::ProposalNotFound)?;
        if proposal.executed {
            return Err(ContractError::AlreadyExecuted);
        }
        let mut cycle = Self::current_cycle(&store)?;
        if proposal.cycle_id != cycle.id {
            return Err(ContractError::ProposalNotInCurrentCycle);
        }
        if !cycle.voting_ended(now) {
            return Err(ContractError::VotingNotEnded);
        }
        if Self::winner_of(&store, cycle.id) != proposal_id {
            return Err(ContractError::NotWinner);
        }
        let treasury = Self::treasury(&store)?;
        if proposal.kind == ProposalKind::Transfer && proposal.recipient.is_none() {
            return Err(ContractError::InvalidRecipient);
        }

        proposal.executed = true;
        store.set_proposal(&proposal);
        cycle.executed = true;
        store.set_cycle(&cycle);

        let next = Self::next_cycle(&store, &config, now);
        Self::open_cycle(&env, &store, &next);

        let treasury = TreasuryClient::new(&env, &treasury);
        match proposal.kind {
            ProposalKind::Boost => treasury.apply_boost(&proposal.token, &proposal.amount),
            ProposalKind::Transfer => {
                if let Some(recipient) = proposal.recipient.as_ref() {
                    treasury.transfer(&proposal.token, recipient, &proposal.amount);
                }
            }
        }

        events::publish_executed(
            &env,
            proposal_id,
            proposal.cycle_id,
            proposal.kind,
            proposal.token,
            proposal.amount,
        );

        Ok(())
    }

    // ── Configuration & access ──────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<GovernanceConfig, ContractError> {
        Self::config(&GovernanceStore::new(&env))
    }

    /// Replace the governance configuration. Open proposals keep their
    /// snapshots and the current cycle keeps its windows.
    ///
    /// Requires at least `Manager` tier.
    pub fn update_config(
        env: Env,
        caller: Address,
        config: GovernanceConfig,
    ) -> Result<(), ContractError> {
        let store = GovernanceStore::new(&env);
        Self::require_initialized(&store)?;
        caller.require_auth();
        Self::require_tier(&env, &caller, AccessTier::Manager)?;
        if !config.is_valid() {
            return Err(ContractError::InvalidConfig);
        }

        store.set_config(&config);
        events::publish_config_set(&env, config.quorum_bps, config.approval_bps);
        Ok(())
    }

    pub fn get_staking(env: Env) -> Result<Address, ContractError> {
        Self::staking(&GovernanceStore::new(&env))
    }

    pub fn get_treasury(env: Env) -> Result<Address, ContractError> {
        Self::treasury(&GovernanceStore::new(&env))
    }

    pub fn is_initialized(env: Env) -> bool {
        GovernanceStore::new(&env).is_initialized()
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        AccessPolicy::new(&env)
            .owner()
            .ok_or(ContractError::NotInitialized)
    }

    /// Assign `tier` to `target`. Only an `Owner` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        tier: AccessTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&GovernanceStore::new(&env))?;
        caller.require_auth();
        if !AccessPolicy::new(&env).grant(&caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_changed(&env, caller, target, Some(tier));
        Ok(())
    }

    /// Remove any tier held by `target`. Only an `Owner` may call this.
    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&GovernanceStore::new(&env))?;
        caller.require_auth();
        if !AccessPolicy::new(&env).revoke(&caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_changed(&env, caller, target, None);
        Ok(())
    }

    pub fn get_role(env: Env, account: Address) -> Option<AccessTier> {
        AccessPolicy::new(&env).tier_of(&account)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(store: &GovernanceStore) -> Result<(), ContractError> {
        if !store.is_initialized() {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_tier(env: &Env, caller: &Address, min_tier: AccessTier) -> Result<(), ContractError> {
        if AccessPolicy::new(env).allows(caller, min_tier) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized)
        }
    }

    fn config(store: &GovernanceStore) -> Result<GovernanceConfig, ContractError> {
        store.config().ok_or(ContractError::NotInitialized)
    }

    fn staking(store: &GovernanceStore) -> Result<Address, ContractError> {
        store.staking().ok_or(ContractError::NotInitialized)
    }

    fn treasury(store: &GovernanceStore) -> Result<Address, ContractError> {
        store.treasury().ok_or(ContractError::NotInitialized)
    }

    fn current_cycle(store: &GovernanceStore) -> Result<Cycle, ContractError> {
        store
            .cycle(store.current_cycle_id())
            .ok_or(ContractError::NotInitialized)
    }

    /// The cycle after the current one, opening at `now`. Not persisted.
    fn next_cycle(store: &GovernanceStore, config: &GovernanceConfig, now: u64) -> Cycle {
        let proposal_window_end = now.saturating_add(config.proposal_window_seconds);
        Cycle {
            id: store.current_cycle_id().saturating_add(1),
            proposal_window_start: now,
            proposal_window_end,
            voting_window_end: proposal_window_end.saturating_add(config.voting_window_seconds),
            executed: false,
        }
    }

    fn open_cycle(env: &Env, store: &GovernanceStore, cycle: &Cycle) {
        store.set_cycle(cycle);
        store.set_current_cycle_id(cycle.id);
        events::publish_cycle_started(env, cycle.id, cycle.proposal_window_end, cycle.voting_window_end);
    }

    /// Refuses to move past a cycle whose winner has not been executed.
    fn require_no_pending_winner(store: &GovernanceStore, cycle: &Cycle) -> Result<(), ContractError> {
        if !cycle.executed && Self::winner_of(store, cycle.id) != 0 {
            return Err(ContractError::ExecutableProposalsRemaining);
        }
        Ok(())
    }

    fn phase_of(store: &GovernanceStore, cycle: &Cycle, now: u64) -> CyclePhase {
        if cycle.executed {
            CyclePhase::Executed
        } else if now <= cycle.proposal_window_end {
            CyclePhase::ProposalWindow
        } else if now <= cycle.voting_window_end {
            CyclePhase::VotingWindow
        } else if Self::winner_of(store, cycle.id) != 0 {
            CyclePhase::Executable
        } else {
            CyclePhase::Defeated
        }
    }

    fn quorum_reached(proposal: &Proposal) -> bool {
        meets_bps(
            proposal.total_balance_voted,
            proposal.snapshot.total_supply,
            proposal.snapshot.quorum_bps,
        )
    }

    fn approval_reached(proposal: &Proposal) -> bool {
        let cast = proposal.yes_votes.saturating_add(proposal.no_votes);
        cast > 0 && meets_bps(proposal.yes_votes, cast, proposal.snapshot.approval_bps)
    }

    fn winner_of(store: &GovernanceStore, cycle_id: u64) -> u64 {
        let mut winner = 0u64;
        let mut best = 0i128;
        for id in store.cycle_proposals(cycle_id).iter() {
            let Some(proposal) = store.proposal(id) else {
                continue;
            };
            if !Self::quorum_reached(&proposal) || !Self::approval_reached(&proposal) {
                continue;
            }
            if winner == 0 || proposal.yes_votes > best {
                winner = id;
                best = proposal.yes_votes;
            }
        }
        winner
    }

    /// Shared body of `propose_boost` and `propose_transfer`. Every check runs
    /// before the first write, including the implicit start of a new cycle.
    fn propose(
        env: &Env,
        proposer: Address,
        kind: ProposalKind,
        token: Address,
        amount: i128,
        recipient: Option<Address>,
        description: String,
    ) -> Result<u64, ContractError> {
        let store = GovernanceStore::new(env);
        Self::require_initialized(&store)?;
        proposer.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let treasury = Self::treasury(&store)?;
        if let Some(to) = recipient.as_ref() {
            if *to == treasury || *to == env.current_contract_address() {
                return Err(ContractError::InvalidRecipient);
            }
        }

        let config = Self::config(&store)?;
        let now = env.ledger().timestamp();

        let mut cycle = Self::current_cycle(&store)?;
        let rollover = !cycle.executed && cycle.voting_ended(now);
        if rollover {
            Self::require_no_pending_winner(&store, &cycle)?;
            cycle = Self::next_cycle(&store, &config, now);
        }
        if !cycle.accepts_proposals(now) {
            return Err(ContractError::ProposalWindowClosed);
        }

        let staking = StakingClient::new(env, &Self::staking(&store)?);
        let stake = staking.balance(&proposer);
        let total_supply = staking.total_supply();
        if config.min_stake_bps > 0
            && (stake <= 0 || !meets_bps(stake, total_supply, config.min_stake_bps))
        {
            return Err(ContractError::InsufficientStake);
        }

        if !rollover {
            if store.has_proposed(cycle.id, &proposer, kind) {
                return Err(ContractError::AlreadyProposed);
            }
            if store.kind_count(cycle.id, kind) >= config.max_active_proposals {
                return Err(ContractError::MaxProposalsReached);
            }
        }

        let treasury_balance = token::Client::new(env, &token).balance(&treasury);
        if amount > apply_bps(treasury_balance, config.max_proposal_amount_bps) {
            return Err(ContractError::AmountExceedsCap);
        }

        if rollover {
            Self::open_cycle(env, &store, &cycle);
        }

        let id = store.next_proposal_id();
        let proposal = Proposal {
            id,
            cycle_id: cycle.id,
            kind,
            proposer: proposer.clone(),
            token: token.clone(),
            amount,
            recipient,
            description,
            created_at: now,
            yes_votes: 0,
            no_votes: 0,
            total_balance_voted: 0,
            voter_count: 0,
            executed: false,
            snapshot: ProposalSnapshot {
                total_supply,
                quorum_bps: config.quorum_bps,
                approval_bps: config.approval_bps,
            },
        };
        store.set_proposal(&proposal);
        store.push_cycle_proposal(cycle.id, id);
        store.mark_proposed(cycle.id, &proposer, kind);
        store.set_kind_count(cycle.id, kind, store.kind_count(cycle.id, kind).saturating_add(1));

        events::publish_proposed(env, id, cycle.id, proposer, kind, token, amount);

        Ok(id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_cycle;
