// tests/integration_tests.rs
use chrono::{Duration, Utc};
use rosca::{
    adapters::MemoryAdapter, Engine, EntryDraft, EntryFilter, Error, ExecutionPlan, Operation,
    PoolSpec, Rate, RoscaSystem, StoreAdapter,
};
use uuid::Uuid;

fn setup() -> Engine {
    let system = RoscaSystem::new(Box::new(MemoryAdapter::new()));
    system.engine()
}

static PERSON_SEQ: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

async fn register_members(engine: &Engine, count: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let n = PERSON_SEQ.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let person = engine
            .register_person(
                &format!("Member {}", n),
                &format!("M{}", n),
                "9000000000",
                None,
                0,
            )
            .await
            .unwrap();
        ids.push(person.id);
    }
    ids
}

async fn create_pool(
    engine: &Engine,
    amount: i64,
    tenure: u32,
    min_interest: Rate,
    members: &[Uuid],
) -> rosca::Pool {
    engine
        .create_pool(PoolSpec {
            name: "Monthly committee".to_string(),
            start_date: Utc::now(),
            amount,
            tenure,
            min_interest,
            member_ids: members.to_vec(),
            narration: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_pool_creation_generates_hands() {
    let engine = setup();
    let members = register_members(&engine, 12).await;
    let pool = create_pool(&engine, 120_000_00, 12, Rate::ZERO, &members).await;

    assert_eq!(pool.number, 1);
    assert_eq!(pool.current_hand, 1);

    let hands = engine.adapter().get_hands(pool.id).await.unwrap();
    assert_eq!(hands.len(), 12);
    assert_eq!(hands[0].number, 1);
    assert_eq!(hands[0].date, pool.start_date);
    assert_eq!(hands[11].date, pool.start_date + Duration::days(330));
    assert!(hands.iter().all(|h| h.contribution_amount == 10_000_00));
}

#[tokio::test]
async fn test_pool_creation_validation() {
    let engine = setup();
    let members = register_members(&engine, 3).await;

    let spec = |member_ids: Vec<Uuid>, tenure: u32, amount: i64| PoolSpec {
        name: "Bad pool".to_string(),
        start_date: Utc::now(),
        amount,
        tenure,
        min_interest: Rate::ZERO,
        member_ids,
        narration: None,
    };

    let result = engine.create_pool(spec(vec![], 3, 3_000_00)).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // strict rule: member count must equal tenure
    let result = engine.create_pool(spec(members.clone(), 4, 4_000_00)).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let mut duplicated = members.clone();
    duplicated[2] = duplicated[0];
    let result = engine.create_pool(spec(duplicated, 3, 3_000_00)).await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let result = engine.create_pool(spec(members.clone(), 3, 0)).await;
    assert!(matches!(result, Err(Error::InvalidAmount)));

    let mut with_stranger = members.clone();
    with_stranger[2] = Uuid::now_v7();
    let result = engine.create_pool(spec(with_stranger, 3, 3_000_00)).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_three_member_settlement_scenario() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    let winner = members[0];
    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[winner], 3_000_00, None)
        .await
        .unwrap();

    // one contribution of 1000 per member, the winner's paid
    assert_eq!(result.contributions.len(), 3);
    assert!(result.contributions.iter().all(|c| c.amount == 1_000_00));
    for contribution in &result.contributions {
        assert_eq!(contribution.paid, contribution.person == winner);
    }

    // winner credited the full bid, the others debited their share
    assert_eq!(engine.get_last_balance(winner).await.unwrap(), 3_000_00);
    for member in &members[1..] {
        assert_eq!(engine.get_last_balance(*member).await.unwrap(), -1_000_00);
    }

    // the two unpaid shares remain due
    assert_eq!(engine.total_due(pool.id).await.unwrap(), 2_000_00);
    assert_eq!(engine.amount_due(hands[0].id, winner).await.unwrap(), 0);
    assert_eq!(
        engine.amount_due(hands[0].id, members[1]).await.unwrap(),
        1_000_00
    );

    // pointer advanced off the settled hand
    assert_eq!(engine.current_hand(pool.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_settlement_is_idempotent() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();

    let entries_before = engine.adapter().get_entries(members[1]).await.unwrap().len();

    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[members[1]], 3_000_00, None)
        .await;
    assert!(matches!(result, Err(Error::AlreadySettled(h)) if h == hands[0].id));

    // no extra rows from the failed second call
    let contributions = engine.adapter().get_contributions(hands[0].id).await.unwrap();
    let distributions = engine.adapter().get_distributions(hands[0].id).await.unwrap();
    assert_eq!(contributions.len(), 3);
    assert_eq!(distributions.len(), 1);
    assert_eq!(
        engine.adapter().get_entries(members[1]).await.unwrap().len(),
        entries_before
    );
}

#[tokio::test]
async fn test_winner_may_win_only_once() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();

    let result = engine
        .distribute_hand(pool.id, hands[1].id, &[members[0]], 3_000_00, None)
        .await;
    assert!(matches!(result, Err(Error::IneligibleWinner(p)) if p == members[0]));

    // a first-time winner is still fine
    engine
        .distribute_hand(pool.id, hands[1].id, &[members[1]], 3_000_00, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_conservation_with_remainders() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    // 1000.00 split three ways does not divide evenly
    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 1_000_00, None)
        .await
        .unwrap();

    let contribution_total: i64 = result.contributions.iter().map(|c| c.amount).sum();
    let distribution_total: i64 = result.distributions.iter().map(|d| d.amount).sum();
    assert_eq!(contribution_total, 1_000_00);
    assert_eq!(distribution_total, 1_000_00);

    let spread: Vec<i64> = result.contributions.iter().map(|c| c.amount).collect();
    assert!(spread.iter().max().unwrap() - spread.iter().min().unwrap() <= 1);
}

#[tokio::test]
async fn test_multi_winner_split() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    let winners = [members[0], members[1]];
    let result = engine
        .distribute_hand(pool.id, hands[0].id, &winners, 3_000_00, None)
        .await
        .unwrap();

    assert_eq!(result.distributions.len(), 2);
    assert!(result.distributions.iter().all(|d| d.amount == 1_500_00));

    // both winners' shares are paid, only the third member is debited
    for contribution in &result.contributions {
        assert_eq!(contribution.paid, winners.contains(&contribution.person));
    }
    assert_eq!(engine.get_last_balance(members[0]).await.unwrap(), 1_500_00);
    assert_eq!(engine.get_last_balance(members[2]).await.unwrap(), -1_000_00);
    assert_eq!(engine.total_due(pool.id).await.unwrap(), 1_000_00);
}

#[tokio::test]
async fn test_bid_floor_enforcement() {
    let engine = setup();
    let members = register_members(&engine, 10).await;
    let pool = create_pool(&engine, 100_000_00, 10, Rate::from_percent(2.0), &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    // hand 1 is 10 steps from the end: projected payout 80,000.00
    assert_eq!(
        engine.projected_payout(hands[0].id).await.unwrap(),
        80_000_00
    );

    // 85,000 leaves only 15,000 interest against the required 20,000
    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 85_000_00, None)
        .await;
    assert!(
        matches!(result, Err(Error::BidTooHigh { bid, floor }) if bid == 85_000_00 && floor == 80_000_00)
    );

    // exactly at the floor succeeds
    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 80_000_00, None)
        .await
        .unwrap();

    assert_eq!(engine.interest_rate_bps(hands[0].id).await.unwrap(), 2_000);
}

#[tokio::test]
async fn test_distribution_input_validation() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[], 3_000_00, None)
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 0, None)
        .await;
    assert!(matches!(result, Err(Error::InvalidAmount)));

    let result = engine
        .distribute_hand(
            pool.id,
            hands[0].id,
            &[members[0], members[0]],
            3_000_00,
            None,
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let stranger = Uuid::now_v7();
    let result = engine
        .distribute_hand(pool.id, hands[0].id, &[stranger], 3_000_00, None)
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // a hand from another pool is not found in this one
    let other_members = register_members(&engine, 3).await;
    let other_pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &other_members).await;
    let other_hands = engine.adapter().get_hands(other_pool.id).await.unwrap();
    let result = engine
        .distribute_hand(pool.id, other_hands[0].id, &[members[0]], 3_000_00, None)
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_settlements_of_same_hand() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();
    let hand = hands[0].id;

    let engine1 = engine.clone();
    let engine2 = engine.clone();
    let (m0, m1) = (members[0], members[1]);

    let handle1 = tokio::spawn(async move {
        engine1
            .distribute_hand(pool.id, hand, &[m0], 3_000_00, None)
            .await
    });
    let handle2 = tokio::spawn(async move {
        engine2
            .distribute_hand(pool.id, hand, &[m1], 3_000_00, None)
            .await
    });

    let (result1, result2) = tokio::join!(handle1, handle2);
    let result1 = result1.unwrap();
    let result2 = result2.unwrap();

    // Under true concurrency we don't know which wins — assert exactly one of each
    let outcomes = [&result1, &result2];
    let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
    let settled_twice = outcomes
        .iter()
        .filter(|r| matches!(r, Err(Error::AlreadySettled(_))))
        .count();

    assert_eq!(succeeded, 1, "exactly one settlement should succeed");
    assert_eq!(settled_twice, 1, "the loser must fail AlreadySettled");

    let distributions = engine.adapter().get_distributions(hand).await.unwrap();
    assert_eq!(distributions.len(), 1);
}

#[tokio::test]
async fn test_balance_chain_invariant() {
    let engine = setup();
    let opener = engine
        .register_person("Chain Person", "CP", "9111111111", None, 500_00)
        .await
        .unwrap();
    let mut members = register_members(&engine, 2).await;
    members.push(opener.id);

    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();
    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();
    engine
        .record_contribution_payment(hands[0].id, opener.id, 1_000_00, Utc::now(), None)
        .await
        .unwrap();

    for person in &members {
        let opening = engine.adapter().get_person(*person).await.unwrap().opening_balance;
        let entries = engine.adapter().get_entries(*person).await.unwrap();

        let mut running = opening;
        for entry in &entries {
            running += entry.credit - entry.debit;
            assert_eq!(entry.balance, running, "balance snapshot must chain");
        }
        assert_eq!(engine.get_last_balance(*person).await.unwrap(), running);
        assert_eq!(engine.total_balance(*person).await.unwrap(), running);
    }
}

#[tokio::test]
async fn test_record_payment_matches_pending_contribution() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();

    let payer = members[1];
    engine
        .record_contribution_payment(hands[0].id, payer, 1_000_00, Utc::now(), Some("cash"))
        .await
        .unwrap();

    // the pending share was matched, not duplicated
    let contributions = engine.adapter().get_contributions(hands[0].id).await.unwrap();
    assert_eq!(contributions.len(), 3);
    assert!(
        contributions
            .iter()
            .find(|c| c.person == payer)
            .unwrap()
            .paid
    );

    assert_eq!(engine.amount_due(hands[0].id, payer).await.unwrap(), 0);
    assert_eq!(engine.get_last_balance(payer).await.unwrap(), 0);
    assert_eq!(engine.total_due(pool.id).await.unwrap(), 1_000_00);
}

#[tokio::test]
async fn test_prepayment_before_settlement() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    // nothing pending yet: a fresh paid contribution is created
    let payer = members[1];
    engine
        .record_contribution_payment(hands[0].id, payer, 400_00, Utc::now(), None)
        .await
        .unwrap();

    let contributions = engine.adapter().get_contributions(hands[0].id).await.unwrap();
    assert_eq!(contributions.len(), 1);
    assert!(contributions[0].paid);
    assert_eq!(contributions[0].amount, 400_00);

    // the projected share (3000/3 = 1000) is reduced by the prepayment
    assert_eq!(engine.amount_due(hands[0].id, payer).await.unwrap(), 600_00);

    let stranger = Uuid::now_v7();
    let result = engine
        .record_contribution_payment(hands[0].id, stranger, 100_00, Utc::now(), None)
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_edit_payout() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();
    let winner_balance_before = engine.get_last_balance(members[0]).await.unwrap();

    // over the floor is rejected on edit too
    let result = engine.edit_payout(hands[0].id, members[1], 3_100_00).await;
    assert!(matches!(result, Err(Error::BidTooHigh { .. })));

    let updated = engine
        .edit_payout(hands[0].id, members[1], 2_800_00)
        .await
        .unwrap();
    assert_eq!(updated.person, members[1]);
    assert_eq!(updated.amount, 2_800_00);

    let distributions = engine.adapter().get_distributions(hands[0].id).await.unwrap();
    assert_eq!(distributions.len(), 1);
    assert_eq!(distributions[0].person, members[1]);
    assert_eq!(distributions[0].amount, 2_800_00);

    // contributions regenerated at the new split, new winner's share paid
    let contributions = engine.adapter().get_contributions(hands[0].id).await.unwrap();
    assert_eq!(contributions.len(), 3);
    assert_eq!(
        contributions.iter().map(|c| c.amount).sum::<i64>(),
        2_800_00
    );
    for contribution in &contributions {
        assert_eq!(contribution.paid, contribution.person == members[1]);
    }

    // posted ledger history is deliberately left alone
    assert_eq!(
        engine.get_last_balance(members[0]).await.unwrap(),
        winner_balance_before
    );
}

#[tokio::test]
async fn test_edit_payout_rejects_prior_winner() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();
    engine
        .distribute_hand(pool.id, hands[1].id, &[members[1]], 3_000_00, None)
        .await
        .unwrap();

    let result = engine.edit_payout(hands[0].id, members[1], 3_000_00).await;
    assert!(matches!(result, Err(Error::IneligibleWinner(p)) if p == members[1]));

    // re-targeting at the same winner is a plain amount change
    engine
        .edit_payout(hands[0].id, members[0], 2_900_00)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_close_ledger() {
    let engine = setup();
    let person = engine
        .register_person("Solo Saver", "SS", "9222222222", None, 0)
        .await
        .unwrap();

    // nothing to close yet
    assert!(!engine.close_ledger(person.id).await.unwrap());

    engine
        .post_entry(person.id, None, Utc::now(), "deposit", 0, 700_00)
        .await
        .unwrap();
    engine
        .post_entry(person.id, None, Utc::now(), "withdrawal", 200_00, 0)
        .await
        .unwrap();

    assert!(engine.close_ledger(person.id).await.unwrap());

    let entries = engine.adapter().get_entries(person.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].balance, 500_00);
    assert_eq!(entries[0].debit, 0);
    assert_eq!(entries[0].credit, 0);
    assert!(entries[0].narration.starts_with("Ledger closed on"));
    assert_eq!(engine.get_last_balance(person.id).await.unwrap(), 500_00);
}

#[tokio::test]
async fn test_delete_pool_freezes_balances() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();

    let mut balances_before = Vec::new();
    for member in &members {
        balances_before.push(engine.get_last_balance(*member).await.unwrap());
    }

    engine.delete_pool(pool.id).await.unwrap();

    assert!(matches!(
        engine.adapter().get_pool(pool.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(engine.adapter().get_hands(pool.id).await.unwrap().is_empty());
    assert!(
        engine
            .adapter()
            .get_contributions(hands[0].id)
            .await
            .unwrap()
            .is_empty()
    );

    // each member keeps exactly one closing entry with the old balance
    for (member, before) in members.iter().zip(balances_before) {
        let entries = engine.adapter().get_entries(*member).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].narration.starts_with("Ledger closed on"));
        assert_eq!(engine.get_last_balance(*member).await.unwrap(), before);
    }
}

#[tokio::test]
async fn test_plan_rollback_leaves_no_partial_state() {
    let engine = setup();
    let person = engine
        .register_person("Atomic Person", "AP", "9333333333", None, 0)
        .await
        .unwrap();

    // a posting followed by an op that must fail: nothing may survive
    let mut plan = ExecutionPlan::new();
    plan.add(Operation::PostEntry {
        draft: EntryDraft::new(person.id, None, Utc::now(), "doomed", 0, 100_00),
    });
    plan.add(Operation::MarkContributionPaid {
        contribution_id: Uuid::now_v7(),
    });

    let result = engine.adapter().execute_plan(&plan).await;
    assert!(matches!(result, Err(Error::Storage(_))));
    assert!(engine.adapter().get_entries(person.id).await.unwrap().is_empty());
    assert_eq!(engine.get_last_balance(person.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_full_pool_lifecycle() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    for (hand, winner) in hands.iter().zip(&members) {
        engine
            .distribute_hand(pool.id, hand.id, &[*winner], 3_000_00, None)
            .await
            .unwrap();
    }

    // pointer ran past the last hand and reads clamp to the tenure
    assert_eq!(engine.current_hand(pool.id).await.unwrap(), 3);

    // everyone won once: every hand paid out the same face value, so each
    // member's net position is payout minus the two shares they owed
    for member in &members {
        assert_eq!(engine.get_last_balance(*member).await.unwrap(), 1_000_00);
    }

    // settle the books: every member pays their outstanding shares in
    for hand in &hands {
        for member in &members {
            let due = engine.amount_due(hand.id, *member).await.unwrap();
            if due > 0 {
                engine
                    .record_contribution_payment(hand.id, *member, due, Utc::now(), None)
                    .await
                    .unwrap();
            }
        }
    }

    assert_eq!(engine.total_due(pool.id).await.unwrap(), 0);
    assert_eq!(engine.completed_hands(pool.id).await.unwrap(), 3);

    let summary = engine.pool_summary(pool.id).await.unwrap();
    assert_eq!(summary.member_count, 3);
    assert_eq!(summary.total_due, 0);
    assert_eq!(summary.completed_hands, 3);
    assert_eq!(summary.current_hand, 3);
}

#[tokio::test]
async fn test_entry_filters() {
    let engine = setup();
    let members = register_members(&engine, 3).await;
    let pool = create_pool(&engine, 3_000_00, 3, Rate::ZERO, &members).await;
    let hands = engine.adapter().get_hands(pool.id).await.unwrap();

    let person = members[1];
    engine
        .post_entry(person, None, Utc::now(), "personal loan", 0, 50_00)
        .await
        .unwrap();
    engine
        .distribute_hand(pool.id, hands[0].id, &[members[0]], 3_000_00, None)
        .await
        .unwrap();

    let all = engine
        .entries_for(person, &EntryFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // newest first
    assert!(all[0].date >= all[1].date);

    let pool_only = engine
        .entries_for(
            person,
            &EntryFilter {
                pool: Some(pool.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pool_only.len(), 1);
    assert_eq!(pool_only[0].pool, Some(pool.id));

    let none = engine
        .entries_for(
            person,
            &EntryFilter {
                to: Some(Utc::now() - Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_opening_balance_flows_through_ledger() {
    let engine = setup();
    let person = engine
        .register_person("Opener", "OP", "9444444444", None, 250_00)
        .await
        .unwrap();

    // the person record itself carries zero; the ledger holds the opening
    assert_eq!(person.opening_balance, 0);
    let entries = engine.adapter().get_entries(person.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].narration, "Opening balance");
    assert_eq!(entries[0].credit, 250_00);
    assert_eq!(engine.get_last_balance(person.id).await.unwrap(), 250_00);

    let debtor = engine
        .register_person("Debtor", "DB", "9555555555", None, -100_00)
        .await
        .unwrap();
    assert_eq!(engine.get_last_balance(debtor.id).await.unwrap(), -100_00);
}
