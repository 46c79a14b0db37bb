#![allow(deprecated)] // events().publish migration tracked separately

use common::AccessTier;
use soroban_sdk::{symbol_short, Address, Env};

use crate::storage::ProposalKind;

// ── Event payloads ──────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub staking: Address,
    pub treasury: Address,
    pub timestamp: u64,
}

/// Fired whenever a cycle opens, on initialisation and every advance.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleStartedEvent {
    pub cycle_id: u64,
    pub proposal_window_end: u64,
    pub voting_window_end: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProposedEvent {
    pub proposal_id: u64,
    pub cycle_id: u64,
    pub proposer: Address,
    pub kind: ProposalKind,
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VotedEvent {
    pub proposal_id: u64,
    pub voter: Address,
    pub support: bool,
    pub votes: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutedEvent {
    pub proposal_id: u64,
    pub cycle_id: u64,
    pub kind: ProposalKind,
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSetEvent {
    pub quorum_bps: u32,
    pub approval_bps: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub caller: Address,
    pub target: Address,
    pub tier: Option<AccessTier>,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, staking: Address, treasury: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            staking,
            treasury,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_cycle_started(
    env: &Env,
    cycle_id: u64,
    proposal_window_end: u64,
    voting_window_end: u64,
) {
    env.events().publish(
        (symbol_short!("CYCLE"), cycle_id),
        CycleStartedEvent {
            cycle_id,
            proposal_window_end,
            voting_window_end,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_proposed(
    env: &Env,
    proposal_id: u64,
    cycle_id: u64,
    proposer: Address,
    kind: ProposalKind,
    token: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("PROPOSED"), proposer.clone()),
        ProposedEvent {
            proposal_id,
            cycle_id,
            proposer,
            kind,
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_voted(env: &Env, proposal_id: u64, voter: Address, support: bool, votes: i128) {
    env.events().publish(
        (symbol_short!("VOTED"), voter.clone()),
        VotedEvent {
            proposal_id,
            voter,
            support,
            votes,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_executed(
    env: &Env,
    proposal_id: u64,
    cycle_id: u64,
    kind: ProposalKind,
    token: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("EXECUTED"), proposal_id),
        ExecutedEvent {
            proposal_id,
            cycle_id,
            kind,
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_config_set(env: &Env, quorum_bps: u32, approval_bps: u32) {
    env.events().publish(
        (symbol_short!("CFG_SET"),),
        ConfigSetEvent {
            quorum_bps,
            approval_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_changed(env: &Env, caller: Address, target: Address, tier: Option<AccessTier>) {
    let topic = if tier.is_some() {
        symbol_short!("ROLE_SET")
    } else {
        symbol_short!("ROLE_DEL")
    };
    env.events().publish(
        (topic, target.clone()),
        RoleChangedEvent {
            caller,
            target,
            tier,
            timestamp: env.ledger().timestamp(),
        },
    );
}
