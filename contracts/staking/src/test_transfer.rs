extern crate std;

use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::test::{advance, mint, new_staker, setup, DAY, UNIT};
use crate::ContractError;

// ── Balance movement ──────────────────────────────────────────────────────────

#[test]
fn test_transfer_moves_receipt_balance() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000);
    let bob = Address::generate(&env);

    client.transfer(&alice, &bob, &400);

    assert_eq!(client.balance(&alice), 600);
    assert_eq!(client.balance(&bob), 400);
    assert_eq!(client.get_staked(&bob), 400);
    assert_eq!(client.total_supply(), 1_000);
}

#[test]
fn test_transfer_more_than_balance_fails() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 100);
    let bob = Address::generate(&env);

    let result = client.try_transfer(&alice, &bob, &101);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientBalance),
        _ => unreachable!("Expected InsufficientBalance error"),
    }
}

#[test]
fn test_transfer_zero_fails() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 100);

    let result = client.try_transfer(&alice, &Address::generate(&env), &0);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

#[test]
fn test_self_transfer_changes_nothing() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000 * UNIT);
    advance(&env, 4 * DAY);

    client.transfer(&alice, &alice, &(500 * UNIT));

    assert_eq!(client.balance(&alice), 1_000 * UNIT);
    assert_eq!(client.voting_power(&alice), 4_000);
}

// ── Voting power semantics ────────────────────────────────────────────────────

#[test]
fn test_transfer_out_applies_unstake_decay() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000 * UNIT);
    let bob = Address::generate(&env);

    advance(&env, 10 * DAY);
    client.transfer(&alice, &bob, &(500 * UNIT));

    assert_eq!(client.voting_power(&alice), 2_500);
    // Fresh receiver starts from zero and accrues from now on.
    assert_eq!(client.voting_power(&bob), 0);
    advance(&env, DAY);
    assert_eq!(client.voting_power(&bob), 500);
}

#[test]
fn test_dust_transfer_cannot_reset_receiver() {
    let (env, client, _admin, underlying) = setup();
    let victim = new_staker(&env, &client, &underlying, 1_000 * UNIT);
    let attacker = new_staker(&env, &client, &underlying, 10);

    advance(&env, 10 * DAY);
    assert_eq!(client.voting_power(&victim), 10_000);

    client.transfer(&attacker, &victim, &1);

    assert!(client.voting_power(&victim) >= 9_999);
}

#[test]
fn test_transfer_in_averages_existing_credit() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000 * UNIT);
    let bob = new_staker(&env, &client, &underlying, 1_000 * UNIT);

    advance(&env, 10 * DAY);
    client.transfer(&alice, &bob, &(1_000 * UNIT));

    // Bob keeps his 10 000 and the incoming half starts fresh.
    assert_eq!(client.voting_power(&bob), 10_000);
    assert_eq!(client.voting_power(&alice), 0);
    advance(&env, DAY);
    assert_eq!(client.voting_power(&bob), 12_000);
}

// ── Allowances ────────────────────────────────────────────────────────────────

#[test]
fn test_transfer_from_spends_allowance() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000);
    let spender = Address::generate(&env);
    let carol = Address::generate(&env);

    client.approve(&alice, &spender, &300);
    assert_eq!(client.allowance(&alice, &spender), 300);

    client.transfer_from(&spender, &alice, &carol, &200);
    assert_eq!(client.balance(&carol), 200);
    assert_eq!(client.allowance(&alice, &spender), 100);

    let result = client.try_transfer_from(&spender, &alice, &carol, &101);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientAllowance),
        _ => unreachable!("Expected InsufficientAllowance error"),
    }
    assert_eq!(client.allowance(&alice, &spender), 100);
}

#[test]
fn test_self_transfer_from_keeps_allowance() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000);
    let spender = Address::generate(&env);
    client.approve(&alice, &spender, &300);

    client.transfer_from(&spender, &alice, &alice, &200);
    assert_eq!(client.balance(&alice), 1_000);
    assert_eq!(client.allowance(&alice, &spender), 300);

    // The allowance still bounds a self transfer.
    let result = client.try_transfer_from(&spender, &alice, &alice, &301);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InsufficientAllowance),
        _ => unreachable!("Expected InsufficientAllowance error"),
    }
}

#[test]
fn test_approve_negative_fails() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000);

    let result = client.try_approve(&alice, &Address::generate(&env), &-5);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }
}

// ── Rewards stay with the account ─────────────────────────────────────────────

#[test]
fn test_transfer_does_not_claim_or_forfeit_rewards() {
    let (env, client, _admin, underlying) = setup();
    let alice = new_staker(&env, &client, &underlying, 1_000 * UNIT);
    let bob = Address::generate(&env);

    mint(&env, &underlying, &client.address, 300 * UNIT);
    client.accrue_rewards(&underlying);

    advance(&env, DAY);
    client.transfer(&alice, &bob, &(1_000 * UNIT));

    // Alice earned a third of the stream while she held everything.
    assert_eq!(client.balance(&alice), 0);
    assert_eq!(client.claimable_rewards(&alice, &underlying), 100 * UNIT);
    assert_eq!(client.claimable_rewards(&bob, &underlying), 0);

    // Nothing more accrues to Alice, the rest goes to Bob.
    advance(&env, 2 * DAY);
    assert_eq!(client.claimable_rewards(&alice, &underlying), 100 * UNIT);
    assert_eq!(client.claimable_rewards(&bob, &underlying), 200 * UNIT);

    let paid = client.claim_rewards(&alice, &vec![&env, underlying.clone()], &alice);
    assert_eq!(paid, vec![&env, 100 * UNIT]);
}
