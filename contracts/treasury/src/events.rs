#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub governor: Address,
    pub staking: Address,
    pub timestamp: u64,
}

/// Fired when the owner hands fund control to a new governor.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernorSetEvent {
    pub caller: Address,
    pub previous: Address,
    pub governor: Address,
    pub timestamp: u64,
}

/// Fired when funds leave the treasury for an arbitrary recipient.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub token: Address,
    pub recipient: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when funds are pushed into the staking reward streams.
/// `accrued` is false when the follow-up accrual was skipped or failed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BoostEvent {
    pub token: Address,
    pub amount: i128,
    pub accrued: bool,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address, governor: Address, staking: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            governor,
            staking,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_governor_set(env: &Env, caller: Address, previous: Address, governor: Address) {
    env.events().publish(
        (symbol_short!("GOV_SET"), governor.clone()),
        GovernorSetEvent {
            caller,
            previous,
            governor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_transfer(env: &Env, token: Address, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("XFER"), token.clone()),
        TransferEvent {
            token,
            recipient,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_boost(env: &Env, token: Address, amount: i128, accrued: bool) {
    env.events().publish(
        (symbol_short!("BOOST"), token.clone()),
        BoostEvent {
            token,
            amount,
            accrued,
            timestamp: env.ledger().timestamp(),
        },
    );
}
