//! Budget debit atomicity under concurrent finalization.
//!
//! Many sessions may be authorized against the same remaining amount; the
//! store must let exactly as many debits through as fit.

use std::sync::Arc;

use proptest::prelude::*;

use cloud_steward::adapters::memory::InMemoryStore;
use cloud_steward::domain::budget::Budget;
use cloud_steward::domain::directory::{Account, Group, Manager};
use cloud_steward::domain::foundation::{ErrorCode, GroupId, Money, Role, Username};
use cloud_steward::ports::{AccountRepository, BudgetRepository, GroupRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn store_with_budget(total: Money) -> (Arc<InMemoryStore>, GroupId) {
    let store = Arc::new(InMemoryStore::new());
    let manager = Username::new("morgan").unwrap();
    store
        .save_manager(
            &Manager::new(manager.clone(), 1).unwrap(),
            &Account::new(manager.clone(), "hash".to_string(), Role::Manager),
        )
        .await
        .unwrap();
    let group = Group::new(manager, "research").unwrap();
    GroupRepository::create(store.as_ref(), &group, 1).await.unwrap();
    store
        .allocate(&Budget::allocate(*group.id(), total))
        .await
        .unwrap();
    (store, *group.id())
}

// =============================================================================
// Concurrent debits
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_debits_never_overspend() {
    let (store, group_id) = store_with_budget(Money::from_cents(1_000)).await;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.debit(&group_id, Money::from_cents(100)).await })
        })
        .collect();

    let mut accepted = 0;
    let mut refused = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => {
                assert_eq!(e.code, ErrorCode::InsufficientBudget);
                refused += 1;
            }
        }
    }

    assert_eq!(accepted, 10);
    assert_eq!(refused, 40);
    let budget = store.find(&group_id).await.unwrap().unwrap();
    assert_eq!(budget.used(), Money::from_cents(1_000));
    assert_eq!(budget.remaining(), Money::ZERO);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_sessions_racing_for_the_same_remainder() {
    // Both were authorized against $1000 remaining; only one fits.
    let (store, group_id) = store_with_budget(Money::from_dollars(1_000)).await;

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.debit(&group_id, Money::from_dollars(600)).await })
    };
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.debit(&group_id, Money::from_dollars(600)).await })
    };
    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let refused = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_eq!(refused.code, ErrorCode::InsufficientBudget);
    let budget = store.find(&group_id).await.unwrap().unwrap();
    assert_eq!(budget.remaining(), Money::from_dollars(400));
}

#[tokio::test]
async fn revision_below_used_is_refused() {
    let (store, group_id) = store_with_budget(Money::from_dollars(100)).await;
    store.debit(&group_id, Money::from_dollars(60)).await.unwrap();

    let err = store
        .revise(&group_id, Money::from_dollars(50))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let revised = store.revise(&group_id, Money::from_dollars(60)).await.unwrap();
    assert_eq!(revised.remaining(), Money::ZERO);
}

// =============================================================================
// Property: used never exceeds total
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn used_tracks_accepted_debits(
        total in 0u64..100_000,
        debits in proptest::collection::vec(1u64..20_000, 0..30),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (store, group_id) = store_with_budget(Money::from_cents(total)).await;

            let mut expected_used = 0u64;
            for cents in debits {
                match store.debit(&group_id, Money::from_cents(cents)).await {
                    Ok(usage) => {
                        expected_used += cents;
                        prop_assert_eq!(usage.used.cents(), expected_used);
                    }
                    Err(e) => {
                        prop_assert_eq!(e.code, ErrorCode::InsufficientBudget);
                        prop_assert!(expected_used + cents > total);
                    }
                }
            }

            let budget = store.find(&group_id).await.unwrap().unwrap();
            prop_assert!(budget.used() <= budget.total());
            prop_assert_eq!(budget.used().cents(), expected_used);
            Ok(())
        })?;
    }
}
