#![no_std]

pub mod events;

use common::{AccessPolicy, AccessTier};
use soroban_sdk::{
    contract, contractclient, contractimpl, contracttype, symbol_short, token, Address, Env,
    Symbol,
};

// ── Storage keys ────────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");

// ── Types ──────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreasuryConfig {
    /// The only identity allowed to move funds.
    pub governor: Address,
    /// Staking contract that receives boosts.
    pub staking: Address,
}

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InvalidRecipient = 5,
    InsufficientBalance = 6,
}

/// Reward entry point of the staking contract.
#[allow(dead_code)]
#[contractclient(name = "StakingRewardsClient")]
pub trait StakingRewards {
    fn accrue_rewards(env: Env, token: Address) -> i128;
}

// ── Helpers ────────────────────────────────────────────────────────────────────

fn load_config(env: &Env) -> Result<TreasuryConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

/// Authenticates the governor and checks that the treasury can pay `amount`
/// of `token`.
fn prepare_payout(
    env: &Env,
    token: &Address,
    amount: i128,
) -> Result<TreasuryConfig, ContractError> {
    let cfg = load_config(env)?;
    cfg.governor.require_auth();

    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let held = token::Client::new(env, token).balance(&env.current_contract_address());
    if held < amount {
        return Err(ContractError::InsufficientBalance);
    }
    Ok(cfg)
}

// ── Contract ───────────────────────────────────────────────────────────────────

#[contract]
pub struct TreasuryContract;

#[contractimpl]
impl TreasuryContract {
    // ── Configuration ─────────────────────────────────────────────────────────

    /// Initialise the treasury. `governor` is the governance contract that
    /// executes winning proposals.
    pub fn initialize(
        env: Env,
        admin: Address,
        governor: Address,
        staking: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }

        let cfg = TreasuryConfig {
            governor: governor.clone(),
            staking: staking.clone(),
        };
        env.storage().instance().set(&CONFIG, &cfg);
        AccessPolicy::new(&env).bootstrap(&admin);

        events::publish_initialized(&env, admin, governor, staking);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<TreasuryConfig, ContractError> {
        load_config(&env)
    }

    /// Current `Owner` of the treasury, the only identity that may replace
    /// the governor.
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        AccessPolicy::new(&env)
            .owner()
            .ok_or(ContractError::NotInitialized)
    }

    /// Hand fund control to a new governor. Requires `Owner` tier.
    pub fn set_governor(env: Env, caller: Address, governor: Address) -> Result<(), ContractError> {
        let mut cfg = load_config(&env)?;
        caller.require_auth();
        if !AccessPolicy::new(&env).allows(&caller, AccessTier::Owner) {
            return Err(ContractError::Unauthorized);
        }
        let previous = cfg.governor.clone();
        cfg.governor = governor.clone();
        env.storage().instance().set(&CONFIG, &cfg);

        events::publish_governor_set(&env, caller, previous, governor);
        Ok(())
    }

    // ── Fund movements ────────────────────────────────────────────────────────

    /// Pay `amount` of `token` to `recipient`. Governor only.
    pub fn transfer(
        env: Env,
        token: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        prepare_payout(&env, &token, amount)?;
        if recipient == env.current_contract_address() {
            return Err(ContractError::InvalidRecipient);
        }

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );

        events::publish_transfer(&env, token, recipient, amount);
        Ok(())
    }

    /// Move `amount` of `token` into the staking contract and try to start a
    /// reward stream with it. Governor only.
    ///
    /// The accrual is best-effort: if staking rejects it (token not
    /// whitelisted, below the dust threshold) the funds stay with staking and
    /// can be accrued later by anyone.
    pub fn apply_boost(env: Env, token: Address, amount: i128) -> Result<(), ContractError> {
        let cfg = prepare_payout(&env, &token, amount)?;

        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &cfg.staking,
            &amount,
        );

        let accrued = matches!(
            StakingRewardsClient::new(&env, &cfg.staking).try_accrue_rewards(&token),
            Ok(Ok(_))
        );

        events::publish_boost(&env, token, amount, accrued);
        Ok(())
    }

    // ── Reporting helpers ─────────────────────────────────────────────────────

    /// Treasury holdings of `token`.
    pub fn balance(env: Env, token: Address) -> i128 {
        token::Client::new(&env, &token).balance(&env.current_contract_address())
    }
}
