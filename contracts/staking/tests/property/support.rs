use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env, String,
};
use staking::{StakingConfig, StakingContract, StakingContractClient};

pub const UNIT: i128 = 10_000_000;
pub const DAY: u64 = 86_400;

pub fn setup() -> (Env, StakingContractClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let underlying = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &underlying,
        &String::from_str(&env, "Staked Token"),
        &String::from_str(&env, "sTKN"),
        &StakingConfig {
            stream_window_seconds: 3 * DAY,
            max_reward_tokens: 10,
            min_accrual_amount: 1_000,
        },
    );

    (env, client, admin, underlying)
}

pub fn mint(env: &Env, token: &Address, to: &Address, amount: i128) {
    StellarAssetClient::new(env, token).mint(to, &amount);
}

pub fn advance(env: &Env, seconds: u64) {
    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + seconds);
}
