//! Ledger accounting under random operation sequences.
//!
//! Invariants tested:
//! - The sum of all balances equals `total_supply`.
//! - The contract holds exactly `total_supply` of the underlying while no
//!   reward has been funded in it.
//! - A failed operation leaves every balance untouched.

use proptest::prelude::*;
use soroban_sdk::{testutils::Address as _, token::TokenClient, Address};

use crate::support::{advance, mint, setup, UNIT};

#[derive(Debug, Clone)]
enum Op {
    Stake { who: usize, amount: i128 },
    Unstake { who: usize, amount: i128 },
    Transfer { from: usize, to: usize, amount: i128 },
    Wait { seconds: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1i128..1_000 * UNIT).prop_map(|(who, amount)| Op::Stake { who, amount }),
        (0usize..3, 1i128..1_000 * UNIT).prop_map(|(who, amount)| Op::Unstake { who, amount }),
        (0usize..3, 0usize..3, 1i128..1_000 * UNIT)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (1u64..10 * 86_400).prop_map(|seconds| Op::Wait { seconds }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_supply_matches_balances(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let (env, client, _admin, underlying) = setup();
        let token = TokenClient::new(&env, &underlying);
        let accounts = [
            Address::generate(&env),
            Address::generate(&env),
            Address::generate(&env),
        ];
        for account in accounts.iter() {
            mint(&env, &underlying, account, 10_000 * UNIT);
        }

        for op in ops {
            let before: [i128; 3] = [
                client.balance(&accounts[0]),
                client.balance(&accounts[1]),
                client.balance(&accounts[2]),
            ];
            let ok = match op {
                Op::Stake { who, amount } => client.try_stake(&accounts[who], &amount).is_ok(),
                Op::Unstake { who, amount } => client
                    .try_unstake(&accounts[who], &amount, &accounts[who])
                    .is_ok(),
                Op::Transfer { from, to, amount } => client
                    .try_transfer(&accounts[from], &accounts[to], &amount)
                    .is_ok(),
                Op::Wait { seconds } => {
                    advance(&env, seconds);
                    true
                }
            };

            let after: [i128; 3] = [
                client.balance(&accounts[0]),
                client.balance(&accounts[1]),
                client.balance(&accounts[2]),
            ];
            if !ok {
                prop_assert_eq!(before, after);
            }

            let sum: i128 = after.iter().sum();
            prop_assert_eq!(sum, client.total_supply());
            prop_assert_eq!(token.balance(&client.address), client.total_supply());
            for (account, balance) in accounts.iter().zip(after.iter()) {
                prop_assert!(*balance >= 0);
                if *balance == 0 {
                    prop_assert_eq!(client.voting_power(account), 0);
                }
            }
        }
    }
}
