extern crate std;

use common::AccessTier;
use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{default_config, setup};
use crate::ContractError;

// ── Owner bootstrapped on initialize ─────────────────────────────────────────

#[test]
fn test_admin_is_owner_after_init() {
    let (_env, client, admin, _underlying) = setup();
    assert_eq!(client.get_role(&admin), Some(AccessTier::Owner));
}

#[test]
fn test_unknown_address_has_no_role() {
    let (env, client, _admin, _underlying) = setup();
    assert_eq!(client.get_role(&Address::generate(&env)), None);
}

// ── Granting and revoking ────────────────────────────────────────────────────

#[test]
fn test_owner_grants_manager() {
    let (env, client, admin, _underlying) = setup();
    let manager = Address::generate(&env);

    client.grant_role(&admin, &manager, &AccessTier::Manager);
    assert_eq!(client.get_role(&manager), Some(AccessTier::Manager));

    // Managers can whitelist reward tokens and change configuration.
    client.whitelist_token(&manager, &Address::generate(&env));
    let mut config = default_config();
    config.min_accrual_amount = 5_000;
    client.set_config(&manager, &config);
    assert_eq!(client.get_config().min_accrual_amount, 5_000);
}

#[test]
fn test_manager_cannot_grant() {
    let (env, client, admin, _underlying) = setup();
    let manager = Address::generate(&env);
    client.grant_role(&admin, &manager, &AccessTier::Manager);

    let result = client.try_grant_role(&manager, &Address::generate(&env), &AccessTier::Owner);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_revoked_manager_loses_access() {
    let (env, client, admin, _underlying) = setup();
    let manager = Address::generate(&env);
    client.grant_role(&admin, &manager, &AccessTier::Manager);
    client.revoke_role(&admin, &manager);

    assert_eq!(client.get_role(&manager), None);
    let result = client.try_set_config(&manager, &default_config());
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_bootstrapped_owner_cannot_be_revoked() {
    let (env, client, admin, _underlying) = setup();
    let second_owner = Address::generate(&env);
    client.grant_role(&admin, &second_owner, &AccessTier::Owner);

    let result = client.try_revoke_role(&second_owner, &admin);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_role(&admin), Some(AccessTier::Owner));
}

// ── Config validation ────────────────────────────────────────────────────────

#[test]
fn test_set_config_rejects_invalid_values() {
    let (_env, client, admin, _underlying) = setup();

    let mut config = default_config();
    config.min_accrual_amount = 0;
    let result = client.try_set_config(&admin, &config);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidConfig),
        _ => unreachable!("Expected InvalidConfig error"),
    }

    let mut config = default_config();
    config.max_reward_tokens = 0;
    let result = client.try_set_config(&admin, &config);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidConfig),
        _ => unreachable!("Expected InvalidConfig error"),
    }
}
