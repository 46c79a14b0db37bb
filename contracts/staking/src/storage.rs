use soroban_sdk::{contracttype, Address, Env, String, Vec};

use crate::rewards::{AccountRewardState, RewardStream};

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Storage keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Initialized,
    Underlying,
    Unit,
    Decimals,
    TokenName,
    TokenSymbol,
    Config,
    TotalStaked,
    RewardTokens,
    Position(Address),
    Allowance(Address, Address),
    Stream(Address),
    AccountReward(Address, Address),
}

// ── Records ──────────────────────────────────────────────────────────────────

/// One account's stake. `balance` is also the account's receipt-token
/// balance; `stake_start_time` only matters while `balance > 0`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakePosition {
    pub balance: i128,
    pub stake_start_time: u64,
}

/// Tunables for reward streaming. Replacing the config only affects streams
/// started afterwards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    /// Length of every new vesting window, in seconds.
    pub stream_window_seconds: u64,
    /// Upper bound on concurrently whitelisted reward tokens, the underlying
    /// included.
    pub max_reward_tokens: u32,
    /// Smallest amount of fresh funds `accrue_rewards` will start a stream for.
    pub min_accrual_amount: i128,
}

// ── Ledger store ─────────────────────────────────────────────────────────────

/// Typed access to everything the staking contract persists.
///
/// The engine never touches `env.storage()` directly; every read and write of
/// positions, totals, allowances and reward state goes through here.
pub struct LedgerStore<'a> {
    env: &'a Env,
}

impl<'a> LedgerStore<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &Env {
        self.env
    }

    // ── Instance values ─────────────────────────────────────────────────

    pub fn is_initialized(&self) -> bool {
        self.env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn mark_initialized(&self) {
        self.env.storage().instance().set(&DataKey::Initialized, &true);
    }

    pub fn underlying(&self) -> Option<Address> {
        self.env.storage().instance().get(&DataKey::Underlying)
    }

    pub fn set_underlying(&self, token: &Address) {
        self.env.storage().instance().set(&DataKey::Underlying, token);
    }

    /// One whole underlying token in base units.
    pub fn unit(&self) -> i128 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::Unit)
            .unwrap_or(1)
    }

    pub fn decimals(&self) -> u32 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::Decimals)
            .unwrap_or(0)
    }

    pub fn set_decimals(&self, decimals: u32) {
        let unit = 10i128.saturating_pow(decimals);
        self.env.storage().instance().set(&DataKey::Decimals, &decimals);
        self.env.storage().instance().set(&DataKey::Unit, &unit);
    }

    pub fn metadata(&self) -> (String, String) {
        let name = self
            .env
            .storage()
            .instance()
            .get(&DataKey::TokenName)
            .unwrap_or_else(|| String::from_str(self.env, ""));
        let symbol = self
            .env
            .storage()
            .instance()
            .get(&DataKey::TokenSymbol)
            .unwrap_or_else(|| String::from_str(self.env, ""));
        (name, symbol)
    }

    pub fn set_metadata(&self, name: &String, symbol: &String) {
        self.env.storage().instance().set(&DataKey::TokenName, name);
        self.env.storage().instance().set(&DataKey::TokenSymbol, symbol);
    }

    pub fn config(&self) -> Option<StakingConfig> {
        self.env.storage().instance().get(&DataKey::Config)
    }

    pub fn set_config(&self, config: &StakingConfig) {
        self.env.storage().instance().set(&DataKey::Config, config);
    }

    pub fn total_staked(&self) -> i128 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0)
    }

    pub fn set_total_staked(&self, total: i128) {
        self.env.storage().instance().set(&DataKey::TotalStaked, &total);
    }

    pub fn reward_tokens(&self) -> Vec<Address> {
        self.env
            .storage()
            .instance()
            .get(&DataKey::RewardTokens)
            .unwrap_or_else(|| Vec::new(self.env))
    }

    pub fn set_reward_tokens(&self, tokens: &Vec<Address>) {
        self.env.storage().instance().set(&DataKey::RewardTokens, tokens);
    }

    // ── Positions ───────────────────────────────────────────────────────

    pub fn position(&self, account: &Address) -> StakePosition {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Position(account.clone()))
            .unwrap_or_default()
    }

    pub fn set_position(&self, account: &Address, position: &StakePosition) {
        let key = DataKey::Position(account.clone());
        self.env.storage().persistent().set(&key, position);
        self.bump(&key);
    }

    // ── Allowances ──────────────────────────────────────────────────────

    pub fn allowance(&self, owner: &Address, spender: &Address) -> i128 {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Allowance(owner.clone(), spender.clone()))
            .unwrap_or(0)
    }

    pub fn set_allowance(&self, owner: &Address, spender: &Address, amount: i128) {
        let key = DataKey::Allowance(owner.clone(), spender.clone());
        if amount == 0 {
            self.env.storage().persistent().remove(&key);
        } else {
            self.env.storage().persistent().set(&key, &amount);
            self.bump(&key);
        }
    }

    // ── Reward streams ──────────────────────────────────────────────────

    pub fn stream(&self, token: &Address) -> Option<RewardStream> {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Stream(token.clone()))
    }

    pub fn set_stream(&self, stream: &RewardStream) {
        let key = DataKey::Stream(stream.token.clone());
        self.env.storage().persistent().set(&key, stream);
        self.bump(&key);
    }

    pub fn account_reward(&self, token: &Address, account: &Address) -> AccountRewardState {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::AccountReward(token.clone(), account.clone()))
            .unwrap_or_default()
    }

    pub fn set_account_reward(&self, token: &Address, account: &Address, state: &AccountRewardState) {
        let key = DataKey::AccountReward(token.clone(), account.clone());
        self.env.storage().persistent().set(&key, state);
        self.bump(&key);
    }

    fn bump(&self, key: &DataKey) {
        self.env
            .storage()
            .persistent()
            .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}
