extern crate std;

use soroban_sdk::{testutils::Address as _, Address, String};

use crate::test::{
    set_time, setup, staker, voting_closed, voting_opens, Setup, PROPOSAL_WINDOW, T0, UNIT,
    VOTING_WINDOW,
};
use crate::{ContractError, CyclePhase, ProposalState};

fn propose(s: &Setup, proposer: &Address) -> u64 {
    s.gov.propose_transfer(
        proposer,
        &s.token,
        &Address::generate(&s.env),
        &UNIT,
        &String::from_str(&s.env, "ops"),
    )
}

#[test]
fn test_phases_follow_the_clock() {
    let s = setup();
    let alice = staker(&s, 1_000);
    let id = propose(&s, &alice);

    assert_eq!(s.gov.get_cycle_phase(&1), CyclePhase::ProposalWindow);

    set_time(&s.env, voting_opens());
    assert_eq!(s.gov.get_cycle_phase(&1), CyclePhase::VotingWindow);
    s.gov.vote(&alice, &id, &true);

    set_time(&s.env, voting_closed());
    assert_eq!(s.gov.get_cycle_phase(&1), CyclePhase::Executable);

    s.gov.execute(&id);
    assert_eq!(s.gov.get_cycle_phase(&1), CyclePhase::Executed);
    assert_eq!(s.gov.get_cycle_phase(&2), CyclePhase::ProposalWindow);
}

#[test]
fn test_unknown_cycle_phase() {
    let s = setup();
    match s.gov.try_get_cycle_phase(&7) {
        Err(Ok(e)) => assert_eq!(e, ContractError::CycleNotFound),
        _ => unreachable!("Expected CycleNotFound error"),
    }
}

#[test]
fn test_start_new_cycle_refused_while_voting_runs() {
    let s = setup();

    match s.gov.try_start_new_cycle() {
        Err(Ok(e)) => assert_eq!(e, ContractError::CycleStillActive),
        _ => unreachable!("Expected CycleStillActive error"),
    }

    set_time(&s.env, T0 + PROPOSAL_WINDOW + VOTING_WINDOW);
    match s.gov.try_start_new_cycle() {
        Err(Ok(e)) => assert_eq!(e, ContractError::CycleStillActive),
        _ => unreachable!("Expected CycleStillActive error"),
    }
    assert_eq!(s.gov.current_cycle_id(), 1);
}

#[test]
fn test_start_new_cycle_after_defeat() {
    let s = setup();
    let alice = staker(&s, 1_000);
    let id = propose(&s, &alice);

    set_time(&s.env, voting_closed());
    assert_eq!(s.gov.get_cycle_phase(&1), CyclePhase::Defeated);
    assert_eq!(s.gov.proposal_state(&id), ProposalState::Defeated);
    assert_eq!(s.gov.get_winner(&1), 0);

    assert_eq!(s.gov.start_new_cycle(), 2);
    assert_eq!(s.gov.current_cycle_id(), 2);

    let cycle = s.gov.get_cycle(&2).unwrap();
    assert_eq!(cycle.proposal_window_start, voting_closed());
    assert_eq!(cycle.proposal_window_end, voting_closed() + PROPOSAL_WINDOW);
    assert!(!s.gov.get_cycle(&1).unwrap().executed);
}

#[test]
fn test_pending_winner_blocks_new_cycle() {
    let s = setup();
    let alice = staker(&s, 1_000);
    let id = propose(&s, &alice);

    set_time(&s.env, voting_opens());
    s.gov.vote(&alice, &id, &true);

    set_time(&s.env, voting_closed());
    assert_eq!(s.gov.proposal_state(&id), ProposalState::Succeeded);

    match s.gov.try_start_new_cycle() {
        Err(Ok(e)) => assert_eq!(e, ContractError::ExecutableProposalsRemaining),
        _ => unreachable!("Expected ExecutableProposalsRemaining error"),
    }
    let result = s.gov.try_propose_boost(&alice, &s.token, &UNIT);
    match result {
        Err(Ok(e)) => assert_eq!(e, ContractError::ExecutableProposalsRemaining),
        _ => unreachable!("Expected ExecutableProposalsRemaining error"),
    }
    assert_eq!(s.gov.current_cycle_id(), 1);
}

#[test]
fn test_first_proposal_after_voting_opens_next_cycle() {
    let s = setup();
    let alice = staker(&s, 1_000);
    let old = propose(&s, &alice);

    set_time(&s.env, voting_closed());
    let id = propose(&s, &alice);

    assert_eq!(s.gov.current_cycle_id(), 2);
    let proposal = s.gov.get_proposal(&id).unwrap();
    assert_eq!(proposal.cycle_id, 2);
    assert_eq!(s.gov.get_cycle(&2).unwrap().proposal_window_start, voting_closed());

    // The stale proposal can no longer collect votes.
    set_time(&s.env, voting_closed() + PROPOSAL_WINDOW + 1);
    match s.gov.try_vote(&alice, &old, &true) {
        Err(Ok(e)) => assert_eq!(e, ContractError::VotingNotActive),
        _ => unreachable!("Expected VotingNotActive error"),
    }
    s.gov.vote(&alice, &id, &true);
}

#[test]
fn test_rejected_proposal_does_not_open_cycle() {
    let s = setup();
    let alice = staker(&s, 1_000);

    set_time(&s.env, voting_closed());
    match s.gov.try_propose_boost(&alice, &s.token, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAmount),
        _ => unreachable!("Expected InvalidAmount error"),
    }
    assert_eq!(s.gov.current_cycle_id(), 1);
    assert!(s.gov.get_cycle(&2).is_none());
}
