//! Cross-contract surfaces governance depends on.

use soroban_sdk::{contractclient, Address, Env};

/// Read side of the staking contract.
#[allow(dead_code)]
#[contractclient(name = "StakingClient")]
pub trait StakingInterface {
    fn voting_power(env: Env, account: Address) -> i128;
    fn balance(env: Env, id: Address) -> i128;
    fn total_supply(env: Env) -> i128;
}

/// Actions the treasury performs on behalf of governance. Both abort the
/// calling transaction when they fail.
#[allow(dead_code)]
#[contractclient(name = "TreasuryClient")]
pub trait TreasuryInterface {
    fn transfer(env: Env, token: Address, recipient: Address, amount: i128);
    fn apply_boost(env: Env, token: Address, amount: i128);
}
