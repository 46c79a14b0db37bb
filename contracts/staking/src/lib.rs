#![no_std]

pub mod events;
pub mod rewards;
pub mod storage;
pub mod voting_power;

use common::{AccessPolicy, AccessTier};
use soroban_sdk::{contract, contractimpl, token, Address, Env, String, Vec};

use rewards::RewardStream;
pub use storage::{LedgerStore, StakePosition, StakingConfig};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    InvalidRecipient = 7,
    InvalidConfig = 8,
    TokenNotWhitelisted = 9,
    TokenAlreadyWhitelisted = 10,
    CannotUnwhitelistUnderlying = 11,
    StreamActive = 12,
    PendingRewards = 13,
    TooManyRewardTokens = 14,
    InsufficientNewRewards = 15,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `underlying` – SAC address of the token users stake. It is also the
    ///   first, permanently whitelisted reward token.
    /// * `name`, `symbol` – metadata of the staking receipt token.
    /// * `config` – reward streaming parameters.
    pub fn initialize(
        env: Env,
        admin: Address,
        underlying: Address,
        name: String,
        symbol: String,
        config: StakingConfig,
    ) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        if store.is_initialized() {
            return Err(ContractError::AlreadyInitialized);
        }
        Self::validate_config(&config)?;

        let decimals = token::Client::new(&env, &underlying).decimals();

        store.mark_initialized();
        store.set_underlying(&underlying);
        store.set_decimals(decimals);
        store.set_metadata(&name, &symbol);
        store.set_config(&config);

        let mut tokens = Vec::new(&env);
        tokens.push_back(underlying.clone());
        store.set_reward_tokens(&tokens);
        store.set_stream(&RewardStream::new(underlying.clone()));

        AccessPolicy::new(&env).bootstrap(&admin);

        events::publish_initialized(&env, admin, underlying, decimals);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the underlying and mint the same amount of receipt.
    ///
    /// Rewards are checkpointed at the old balance first, and the stake start
    /// time is averaged so existing time credit survives the top-up.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let underlying = Self::underlying(&store)?;
        let now = env.ledger().timestamp();

        // 1. Checkpoint every reward stream at the pre-deposit balance.
        Self::checkpoint_accounts(&store, &[&staker], now);

        // 2. Pull tokens from the staker into the contract.
        token::Client::new(&env, &underlying).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        // 3. Mint receipt and credit the position.
        let mut position = store.position(&staker);
        position.stake_start_time = voting_power::start_after_increase(
            position.balance,
            position.stake_start_time,
            amount,
            now,
        );
        position.balance = position.balance.saturating_add(amount);
        store.set_position(&staker, &position);

        let new_total = store.total_staked().saturating_add(amount);
        store.set_total_staked(new_total);

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    /// Burn `amount` of receipt and send the same amount of underlying to
    /// `recipient`. Returns the staker's voting power after the withdrawal.
    pub fn unstake(
        env: Env,
        staker: Address,
        amount: i128,
        recipient: Address,
    ) -> Result<i128, ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if recipient == env.current_contract_address() {
            return Err(ContractError::InvalidRecipient);
        }

        let mut position = store.position(&staker);
        if position.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let underlying = Self::underlying(&store)?;
        let now = env.ledger().timestamp();

        // 1. Checkpoint rewards before the balance shrinks.
        Self::checkpoint_accounts(&store, &[&staker], now);

        // 2. Burn receipt, shrink time credit, and reduce the global total.
        position.stake_start_time = voting_power::start_after_decrease(
            position.balance,
            position.stake_start_time,
            amount,
            now,
        );
        position.balance -= amount;
        store.set_position(&staker, &position);

        let new_total = store.total_staked().saturating_sub(amount);
        store.set_total_staked(new_total);

        // 3. Return the underlying only after all effects are committed.
        token::Client::new(&env, &underlying).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );

        let vp = voting_power::voting_power(
            position.balance,
            position.stake_start_time,
            now,
            store.unit(),
        );
        events::publish_unstaked(&env, staker, recipient, amount, new_total, vp);

        Ok(vp)
    }

    // ── Receipt token ───────────────────────────────────────────────────────

    pub fn balance(env: Env, id: Address) -> i128 {
        LedgerStore::new(&env).position(&id).balance
    }

    pub fn total_supply(env: Env) -> i128 {
        LedgerStore::new(&env).total_staked()
    }

    pub fn decimals(env: Env) -> u32 {
        LedgerStore::new(&env).decimals()
    }

    pub fn name(env: Env) -> String {
        LedgerStore::new(&env).metadata().0
    }

    pub fn symbol(env: Env) -> String {
        LedgerStore::new(&env).metadata().1
    }

    /// Move receipt balance. The sender keeps its accrued rewards; its time
    /// credit shrinks as on unstake. The receiver's credit is averaged.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        from.require_auth();

        Self::move_balance(&store, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        from.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        store.set_allowance(&from, &spender, amount);

        events::publish_approval(&env, from, spender, amount);

        Ok(())
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        LedgerStore::new(&env).allowance(&from, &spender)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        spender.require_auth();

        let allowance = store.allowance(&from, &spender);
        if allowance < amount {
            return Err(ContractError::InsufficientAllowance);
        }

        Self::move_balance(&store, &from, &to, amount)?;
        // A self transfer moves nothing, so it spends nothing either.
        if from != to {
            store.set_allowance(&from, &spender, allowance - amount);
        }

        Ok(())
    }

    // ── Voting power ────────────────────────────────────────────────────────

    /// Time-weighted voting power of `account` right now.
    pub fn voting_power(env: Env, account: Address) -> i128 {
        let store = LedgerStore::new(&env);
        let position = store.position(&account);
        voting_power::voting_power(
            position.balance,
            position.stake_start_time,
            env.ledger().timestamp(),
            store.unit(),
        )
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Start or top up the stream of `token` with whatever the contract holds
    /// beyond what is already committed. Returns the newly streamed amount.
    ///
    /// Callable by anyone; the dust threshold keeps repeated tiny accruals
    /// from stretching a stream forever.
    pub fn accrue_rewards(env: Env, token: Address) -> Result<i128, ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;

        let mut stream = store
            .stream(&token)
            .filter(|s| s.whitelisted)
            .ok_or(ContractError::TokenNotWhitelisted)?;
        let config = Self::config(&store)?;
        let now = env.ledger().timestamp();
        let total_staked = store.total_staked();

        stream.settle(total_staked, now);

        let new_funds = Self::available_funds(&store, &stream);
        if new_funds < config.min_accrual_amount || new_funds <= 0 {
            return Err(ContractError::InsufficientNewRewards);
        }

        let carried = stream.unvested();
        stream.restart(new_funds, now, config.stream_window_seconds);
        store.set_stream(&stream);

        events::publish_rewards_accrued(&env, token, new_funds, carried, stream.stream_end);

        Ok(new_funds)
    }

    /// Pay out everything `account` can claim for each of `tokens` to
    /// `recipient`. Tokens with nothing claimable are skipped without error.
    /// Returns the amount paid per token, in input order.
    pub fn claim_rewards(
        env: Env,
        account: Address,
        tokens: Vec<Address>,
        recipient: Address,
    ) -> Result<Vec<i128>, ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        account.require_auth();

        if recipient == env.current_contract_address() {
            return Err(ContractError::InvalidRecipient);
        }

        let now = env.ledger().timestamp();
        let total_staked = store.total_staked();
        let balance = store.position(&account).balance;
        let mut paid = Vec::new(&env);

        // Effects: zero every credit and release escrow before paying out.
        for token in tokens.iter() {
            let amount = match store.stream(&token) {
                Some(mut stream) => {
                    stream.settle(total_staked, now);
                    let mut state = stream.checkpoint(&store.account_reward(&token, &account), balance);
                    let amount = state.accrued;
                    state.accrued = 0;
                    stream.escrow = stream.escrow.saturating_sub(amount);
                    store.set_stream(&stream);
                    store.set_account_reward(&token, &account, &state);
                    amount
                }
                None => 0,
            };
            paid.push_back(amount);
        }

        // Interactions.
        for (token, amount) in tokens.iter().zip(paid.iter()) {
            if amount > 0 {
                token::Client::new(&env, &token).transfer(
                    &env.current_contract_address(),
                    &recipient,
                    &amount,
                );
                events::publish_reward_claimed(
                    &env,
                    account.clone(),
                    recipient.clone(),
                    token,
                    amount,
                );
            }
        }

        Ok(paid)
    }

    /// Real-time claimable amount of `token` for `account`, without mutating
    /// state.
    pub fn claimable_rewards(env: Env, account: Address, token: Address) -> i128 {
        let store = LedgerStore::new(&env);
        match store.stream(&token) {
            Some(mut stream) => {
                stream.settle(store.total_staked(), env.ledger().timestamp());
                stream.pending(
                    &store.account_reward(&token, &account),
                    store.position(&account).balance,
                )
            }
            None => 0,
        }
    }

    /// `(available, unvested)` for `token`: funds held but not yet streamed,
    /// and streamed funds still waiting to vest.
    pub fn outstanding_rewards(env: Env, token: Address) -> (i128, i128) {
        let store = LedgerStore::new(&env);
        let mut stream = match store.stream(&token) {
            Some(stream) => stream,
            None => RewardStream::new(token),
        };
        stream.settle(store.total_staked(), env.ledger().timestamp());
        (Self::available_funds(&store, &stream).max(0), stream.unvested())
    }

    pub fn get_reward_stream(env: Env, token: Address) -> Option<RewardStream> {
        LedgerStore::new(&env).stream(&token)
    }

    /// Emission rate of the current stream of `token`, per second.
    pub fn get_reward_rate(env: Env, token: Address) -> i128 {
        let now = env.ledger().timestamp();
        LedgerStore::new(&env)
            .stream(&token)
            .filter(|s| s.is_active() && s.stream_end > now)
            .map(|s| s.rate_per_second())
            .unwrap_or(0)
    }

    // ── Reward token whitelist ──────────────────────────────────────────────

    /// Allow `token` to be streamed. Requires at least `Manager` tier.
    pub fn whitelist_token(env: Env, caller: Address, token: Address) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        caller.require_auth();
        Self::require_tier(&env, &caller, AccessTier::Manager)?;

        let existing = store.stream(&token);
        if existing.as_ref().map(|s| s.whitelisted).unwrap_or(false) {
            return Err(ContractError::TokenAlreadyWhitelisted);
        }

        let mut tokens = store.reward_tokens();
        let config = Self::config(&store)?;
        if tokens.len() >= config.max_reward_tokens {
            return Err(ContractError::TooManyRewardTokens);
        }

        let stream = match existing {
            Some(mut retired) => {
                retired.whitelisted = true;
                retired
            }
            None => RewardStream::new(token.clone()),
        };
        store.set_stream(&stream);
        tokens.push_back(token.clone());
        store.set_reward_tokens(&tokens);

        events::publish_token_whitelisted(&env, token);

        Ok(())
    }

    /// Retire `token`. Refused for the underlying, while its stream is still
    /// vesting, or while unclaimed rewards at or above the dust threshold
    /// remain. Requires at least `Manager` tier.
    pub fn unwhitelist_token(
        env: Env,
        caller: Address,
        token: Address,
    ) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        caller.require_auth();
        Self::require_tier(&env, &caller, AccessTier::Manager)?;

        if token == Self::underlying(&store)? {
            return Err(ContractError::CannotUnwhitelistUnderlying);
        }

        let mut stream = store
            .stream(&token)
            .filter(|s| s.whitelisted)
            .ok_or(ContractError::TokenNotWhitelisted)?;
        let config = Self::config(&store)?;

        stream.settle(store.total_staked(), env.ledger().timestamp());
        if stream.is_active() {
            return Err(ContractError::StreamActive);
        }
        if stream.escrow >= config.min_accrual_amount.max(1) {
            return Err(ContractError::PendingRewards);
        }

        stream.retire();
        store.set_stream(&stream);

        let mut remaining = Vec::new(&env);
        for listed in store.reward_tokens().iter() {
            if listed != token {
                remaining.push_back(listed);
            }
        }
        store.set_reward_tokens(&remaining);

        events::publish_token_unwhitelisted(&env, token);

        Ok(())
    }

    pub fn is_whitelisted(env: Env, token: Address) -> bool {
        LedgerStore::new(&env)
            .stream(&token)
            .map(|s| s.whitelisted)
            .unwrap_or(false)
    }

    pub fn reward_tokens(env: Env) -> Vec<Address> {
        LedgerStore::new(&env).reward_tokens()
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Staked balance; always equal to the receipt balance.
    pub fn get_staked(env: Env, staker: Address) -> i128 {
        LedgerStore::new(&env).position(&staker).balance
    }

    pub fn get_position(env: Env, staker: Address) -> StakePosition {
        LedgerStore::new(&env).position(&staker)
    }

    pub fn get_total_staked(env: Env) -> i128 {
        LedgerStore::new(&env).total_staked()
    }

    pub fn get_underlying(env: Env) -> Result<Address, ContractError> {
        Self::underlying(&LedgerStore::new(&env))
    }

    pub fn get_config(env: Env) -> Result<StakingConfig, ContractError> {
        Self::config(&LedgerStore::new(&env))
    }

    pub fn is_initialized(env: Env) -> bool {
        LedgerStore::new(&env).is_initialized()
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        AccessPolicy::new(&env)
            .owner()
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Replace the streaming configuration. Running streams keep their window.
    ///
    /// Requires at least `Manager` tier.
    pub fn set_config(env: Env, caller: Address, config: StakingConfig) -> Result<(), ContractError> {
        let store = LedgerStore::new(&env);
        Self::require_initialized(&store)?;
        caller.require_auth();
        Self::require_tier(&env, &caller, AccessTier::Manager)?;
        Self::validate_config(&config)?;
        if config.max_reward_tokens < store.reward_tokens().len() {
            return Err(ContractError::InvalidConfig);
        }

        store.set_config(&config);

        events::publish_config_set(
            &env,
            config.stream_window_seconds,
            config.max_reward_tokens,
            config.min_accrual_amount,
        );

        Ok(())
    }

    /// Assign `tier` to `target`. Only an `Owner` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        target: Address,
        tier: AccessTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&LedgerStore::new(&env))?;
        caller.require_auth();
        if !AccessPolicy::new(&env).grant(&caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_changed(&env, caller, target, Some(tier));
        Ok(())
    }

    /// Remove any tier held by `target`. Only an `Owner` may call this.
    pub fn revoke_role(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&LedgerStore::new(&env))?;
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

    fn require_initialized(store: &LedgerStore) -> Result<(), ContractError> {
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

    fn underlying(store: &LedgerStore) -> Result<Address, ContractError> {
        store.underlying().ok_or(ContractError::NotInitialized)
    }

    fn config(store: &LedgerStore) -> Result<StakingConfig, ContractError> {
        store.config().ok_or(ContractError::NotInitialized)
    }

    fn validate_config(config: &StakingConfig) -> Result<(), ContractError> {
        if config.stream_window_seconds == 0
            || config.max_reward_tokens == 0
            || config.min_accrual_amount <= 0
        {
            return Err(ContractError::InvalidConfig);
        }
        Ok(())
    }

    /// Token balance held by the contract beyond staked principal and escrow.
    fn available_funds(store: &LedgerStore, stream: &RewardStream) -> i128 {
        let env = store.env();
        let held = token::Client::new(env, &stream.token).balance(&env.current_contract_address());
        let mut committed = stream.escrow;
        if store.underlying().as_ref() == Some(&stream.token) {
            committed = committed.saturating_add(store.total_staked());
        }
        held.saturating_sub(committed)
    }

    /// Settle every whitelisted stream to `now` and checkpoint `accounts` at
    /// their current balances. Must run before any balance or total changes.
    fn checkpoint_accounts(store: &LedgerStore, accounts: &[&Address], now: u64) {
        let total_staked = store.total_staked();
        for token in store.reward_tokens().iter() {
            let Some(mut stream) = store.stream(&token) else {
                continue;
            };
            stream.settle(total_staked, now);
            store.set_stream(&stream);
            for account in accounts {
                let balance = store.position(account).balance;
                let state = stream.checkpoint(&store.account_reward(&token, account), balance);
                store.set_account_reward(&token, account, &state);
            }
        }
    }

    /// Shared body of `transfer` and `transfer_from`.
    fn move_balance(
        store: &LedgerStore,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let env = store.env();
        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        if *to == env.current_contract_address() {
            return Err(ContractError::InvalidRecipient);
        }

        let mut sender = store.position(from);
        if sender.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }
        if from == to {
            return Ok(());
        }

        let now = env.ledger().timestamp();
        Self::checkpoint_accounts(store, &[from, to], now);

        sender.stake_start_time =
            voting_power::start_after_decrease(sender.balance, sender.stake_start_time, amount, now);
        sender.balance -= amount;
        store.set_position(from, &sender);

        let mut receiver = store.position(to);
        receiver.stake_start_time =
            voting_power::start_after_increase(receiver.balance, receiver.stake_start_time, amount, now);
        receiver.balance = receiver.balance.saturating_add(amount);
        store.set_position(to, &receiver);

        events::publish_transfer(env, from.clone(), to.clone(), amount);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_access;


#[cfg(test)]
mod test_transfer;
