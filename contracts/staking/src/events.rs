#![allow(deprecated)] // events().publish migration tracked separately

use common::AccessTier;
use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub underlying: Address,
    pub decimals: u32,
    pub timestamp: u64,
}

/// Fired when a user deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a user withdraws stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakedEvent {
    pub staker: Address,
    pub recipient: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub voting_power: i128,
    pub timestamp: u64,
}

/// Fired when receipt balance moves between accounts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApprovalEvent {
    pub owner: Address,
    pub spender: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when fresh funds start (or extend) a reward stream.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsAccruedEvent {
    pub token: Address,
    pub new_funds: i128,
    pub carried_over: i128,
    pub stream_end: u64,
    pub timestamp: u64,
}

/// Fired when a user claims accumulated rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub account: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhitelistEvent {
    pub token: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSetEvent {
    pub stream_window_seconds: u64,
    pub max_reward_tokens: u32,
    pub min_accrual_amount: i128,
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

pub fn publish_initialized(env: &Env, admin: Address, underlying: Address, decimals: u32) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            underlying,
            decimals,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstaked(
    env: &Env,
    staker: Address,
    recipient: Address,
    amount: i128,
    new_total_staked: i128,
    voting_power: i128,
) {
    env.events().publish(
        (symbol_short!("UNSTAKED"), staker.clone()),
        UnstakedEvent {
            staker,
            recipient,
            amount,
            new_total_staked,
            voting_power,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_transfer(env: &Env, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("TRANSFER"), from.clone(), to.clone()),
        TransferEvent {
            from,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_approval(env: &Env, owner: Address, spender: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("APPROVE"), owner.clone()),
        ApprovalEvent {
            owner,
            spender,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_accrued(
    env: &Env,
    token: Address,
    new_funds: i128,
    carried_over: i128,
    stream_end: u64,
) {
    env.events().publish(
        (symbol_short!("ACCRUED"), token.clone()),
        RewardsAccruedEvent {
            token,
            new_funds,
            carried_over,
            stream_end,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(
    env: &Env,
    account: Address,
    recipient: Address,
    token: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("CLAIMED"), account.clone()),
        RewardClaimedEvent {
            account,
            recipient,
            token,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token_whitelisted(env: &Env, token: Address) {
    env.events().publish(
        (symbol_short!("WL_ADD"),),
        WhitelistEvent {
            token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_token_unwhitelisted(env: &Env, token: Address) {
    env.events().publish(
        (symbol_short!("WL_DEL"),),
        WhitelistEvent {
            token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_config_set(
    env: &Env,
    stream_window_seconds: u64,
    max_reward_tokens: u32,
    min_accrual_amount: i128,
) {
    env.events().publish(
        (symbol_short!("CFG_SET"),),
        ConfigSetEvent {
            stream_window_seconds,
            max_reward_tokens,
            min_accrual_amount,
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
