//! Reward stream conservation.
//!
//! Invariants tested:
//! - Claims never exceed what was funded.
//! - Once every stream has ended, stakers receive everything that was
//!   funded, minus per-share rounding.
//! - Escrow always covers what is still owed.

use proptest::prelude::*;
use soroban_sdk::{testutils::Address as _, token::TokenClient, vec, Address};

use crate::support::{advance, mint, setup, DAY, UNIT};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_funded_rewards_are_paid_out(
        stake_a in 1i128..1_000_000 * UNIT,
        stake_b in 1i128..1_000_000 * UNIT,
        deposits in prop::collection::vec((1_000i128..1_000_000 * UNIT, 0u64..4 * DAY), 1..5),
    ) {
        let (env, client, admin, underlying) = setup();
        let reward = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        client.whitelist_token(&admin, &reward);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        mint(&env, &underlying, &alice, stake_a);
        mint(&env, &underlying, &bob, stake_b);
        client.stake(&alice, &stake_a);
        client.stake(&bob, &stake_b);

        let token = TokenClient::new(&env, &reward);
        let mut funded: i128 = 0;
        for (amount, gap) in deposits {
            mint(&env, &reward, &client.address, amount);
            client.accrue_rewards(&reward);
            funded += amount;
            advance(&env, gap);

            let (_available, unvested) = client.outstanding_rewards(&reward);
            let stream = client.get_reward_stream(&reward).unwrap();
            prop_assert!(stream.escrow >= unvested);
            prop_assert!(token.balance(&client.address) >= stream.escrow);
        }

        advance(&env, 4 * DAY);

        let tokens = vec![&env, reward.clone()];
        let paid_a = client.claim_rewards(&alice, &tokens, &alice).get(0).unwrap();
        let paid_b = client.claim_rewards(&bob, &tokens, &bob).get(0).unwrap();
        let paid = paid_a + paid_b;

        prop_assert!(paid <= funded);
        // Each settlement can strand at most one base unit per staker.
        prop_assert!(funded - paid <= 64, "funded={} paid={}", funded, paid);

        let held = token.balance(&client.address);
        prop_assert_eq!(held, funded - paid);
    }
}
