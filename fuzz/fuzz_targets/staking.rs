#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env, String,
};
use staking::{StakingConfig, StakingContract, StakingContractClient};

const USERS: usize = 4;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, amount: u32 },
    Unstake { user: u8, amount: u32 },
    Transfer { from: u8, to: u8, amount: u32 },
    FundRewards { amount: u32 },
    Accrue,
    Claim { user: u8 },
    Wait { seconds: u32 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let underlying = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &underlying,
        &String::from_str(&env, "Staked"),
        &String::from_str(&env, "STK"),
        &StakingConfig {
            stream_window_seconds: 3 * 86_400,
            max_reward_tokens: 10,
            min_accrual_amount: 1_000,
        },
    );

    let minter = StellarAssetClient::new(&env, &underlying);
    let token = TokenClient::new(&env, &underlying);
    let users: Vec<Address> = (0..USERS).map(|_| Address::generate(&env)).collect();
    for user in &users {
        minter.mint(user, &(u32::MAX as i128));
    }

    let mut funded: i128 = 0;
    let mut claimed: i128 = 0;

    // Only failures the contract reports are tolerated; the accounting
    // invariants below must hold after every step.
    for action in actions {
        match action {
            FuzzAction::Stake { user, amount } => {
                let who = &users[user as usize % USERS];
                let _ = client.try_stake(who, &(amount as i128));
            }
            FuzzAction::Unstake { user, amount } => {
                let who = &users[user as usize % USERS];
                let _ = client.try_unstake(who, &(amount as i128), who);
            }
            FuzzAction::Transfer { from, to, amount } => {
                let from = &users[from as usize % USERS];
                let to = &users[to as usize % USERS];
                let _ = client.try_transfer(from, to, &(amount as i128));
            }
            FuzzAction::FundRewards { amount } => {
                minter.mint(&contract_id, &(amount as i128));
                funded += amount as i128;
            }
            FuzzAction::Accrue => {
                let _ = client.try_accrue_rewards(&underlying);
            }
            FuzzAction::Claim { user } => {
                let who = &users[user as usize % USERS];
                if let Ok(Ok(paid)) =
                    client.try_claim_rewards(who, &vec![&env, underlying.clone()], who)
                {
                    claimed += paid.get(0).unwrap_or(0);
                }
            }
            FuzzAction::Wait { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64 % (30 * 86_400));
            }
        }

        let supply = client.total_supply();
        let sum: i128 = users.iter().map(|u| client.balance(u)).sum();
        assert_eq!(sum, supply);
        assert!(claimed <= funded);
        assert_eq!(token.balance(&contract_id), supply + funded - claimed);
    }
});
