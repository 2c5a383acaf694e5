//! End-to-end ledger scenarios against the in-memory store: every operation
//! runs through `transact`, so these exercise the same atomic units the LMDB
//! backend commits.

use std::sync::Arc;

use duck_ledger::{AdminPolicy, CoinLedger, ErrorKind, LedgerError, Outcome};
use duck_nullables::{NullClock, NullRandom, NullStore};
use duck_store::{Direction, EntryReason, NotificationKind, TransactionalStore};
use duck_types::{
    AccountId, CoinAmount, ContentId, Decision, EventId, FundsKind, Gift, LedgerParams,
    RequestStatus, RestrictionKind, SECS_PER_DAY,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type TestLedger = CoinLedger<NullStore, Arc<NullClock>, NullRandom>;

fn id(raw: &str) -> AccountId {
    AccountId::new(raw).expect("valid account id")
}

fn admin() -> AccountId {
    id("admin")
}

fn setup() -> (TestLedger, Arc<NullClock>) {
    let clock = Arc::new(NullClock::new(1_000_000));
    let ledger = CoinLedger::new(
        NullStore::new(),
        LedgerParams::default(),
        AdminPolicy::new([admin()]),
    )
    .with_clock(clock.clone())
    .with_random(NullRandom::new(vec![0, 1, 2, 3]));
    (ledger, clock)
}

fn open(ledger: &TestLedger, raw: &str) -> AccountId {
    let account = id(raw);
    ledger.open_account(&account, None).expect("open account");
    account
}

fn fund(ledger: &TestLedger, account: &AccountId, coins: u64) {
    ledger
        .admin_direct_credit(&admin(), account, CoinAmount::coins(coins))
        .expect("fund account");
    ledger.drain_messages(account).expect("drain");
}

// ---------------------------------------------------------------------------
// 1. Ad rewards
// ---------------------------------------------------------------------------

#[test]
fn referred_view_credits_viewer_and_owner_once() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");
    let owner = open(&ledger, "O");
    let event = EventId::new("post123").unwrap();

    let receipt = ledger
        .credit_for_ad_view(&viewer, &event, Some(&owner))
        .unwrap();
    assert_eq!(receipt.viewer_reward, CoinAmount::cents(15));
    assert_eq!(receipt.owner_reward, Some(CoinAmount::cents(25)));
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(15));
    assert_eq!(ledger.balance(&owner).unwrap(), CoinAmount::cents(25));

    let err = ledger
        .credit_for_ad_view(&viewer, &event, Some(&owner))
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyClaimed { .. }));
    assert!(err.is_benign());
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(15));
    assert_eq!(ledger.balance(&owner).unwrap(), CoinAmount::cents(25));
}

#[test]
fn solo_view_credits_only_viewer() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");

    let receipt = ledger
        .credit_for_ad_view(&viewer, &EventId::new("e1").unwrap(), None)
        .unwrap();
    assert_eq!(receipt.viewer_reward, CoinAmount::cents(25));
    assert_eq!(receipt.owner, None);

    // Watching an ad on your own content is a solo view.
    ledger
        .credit_for_ad_view(&viewer, &EventId::new("e2").unwrap(), Some(&viewer))
        .unwrap();
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(50));
}

#[test]
fn same_event_for_different_viewers_is_not_a_duplicate() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "a");
    let b = open(&ledger, "b");
    let event = EventId::new("shared-ad").unwrap();
    ledger.credit_for_ad_view(&a, &event, None).unwrap();
    ledger.credit_for_ad_view(&b, &event, None).unwrap();
    assert_eq!(ledger.balance(&b).unwrap(), CoinAmount::cents(25));
}

#[test]
fn reward_to_missing_owner_records_no_claim() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");
    let event = EventId::new("post9").unwrap();

    let err = ledger
        .credit_for_ad_view(&viewer, &event, Some(&id("ghost")))
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::ZERO);

    // The aborted unit left no claim behind, so a retry succeeds.
    ledger.credit_for_ad_view(&viewer, &event, None).unwrap();
}

#[test]
fn restricted_accounts_still_earn() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");
    ledger
        .admin_apply_restriction(&admin(), &viewer, RestrictionKind::Ban, None)
        .unwrap();
    ledger
        .credit_for_ad_view(&viewer, &EventId::new("e").unwrap(), None)
        .unwrap();
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(25));
}

// ---------------------------------------------------------------------------
// 2. Gifts
// ---------------------------------------------------------------------------

#[test]
fn rose_gift_moves_five_coins_and_notifies() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 10);

    let receipt = ledger
        .send_gift(&a, &b, Gift::Rose, &ContentId::new("clip1").unwrap())
        .unwrap();
    assert_eq!(receipt.price, CoinAmount::coins(5));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(5));
    assert_eq!(ledger.balance(&b).unwrap(), CoinAmount::coins(5));

    let notes = ledger.notifications(&b).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Gift);
    assert_eq!(notes[0].actor, a);
    assert!(notes[0].subject.contains("clip1"));
    assert!(!notes[0].read);
}

#[test]
fn gift_beyond_balance_changes_nothing() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 24);

    let err = ledger
        .send_gift(&a, &b, Gift::Star, &ContentId::new("clip1").unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientBalance { needed, available }
            if needed == CoinAmount::coins(25) && available == CoinAmount::coins(24)
    ));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(24));
    assert_eq!(ledger.balance(&b).unwrap(), CoinAmount::ZERO);
    assert!(ledger.notifications(&b).unwrap().is_empty());
}

#[test]
fn gift_to_self_is_refused() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 10);
    let err = ledger
        .send_gift(&a, &a, Gift::Rose, &ContentId::new("c").unwrap())
        .unwrap_err();
    assert!(matches!(err, LedgerError::SelfTransfer));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(10));
}

#[test]
fn gift_to_missing_recipient_keeps_sender_balance() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 10);
    let err = ledger
        .send_gift(&a, &id("nobody"), Gift::Rose, &ContentId::new("c").unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(10));
}

// ---------------------------------------------------------------------------
// 3. Verification
// ---------------------------------------------------------------------------

#[test]
fn verification_debits_once() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 600);

    let record = ledger.purchase_verification(&a).unwrap();
    assert!(record.verified);
    assert_eq!(record.balance, CoinAmount::coins(100));
    assert_eq!(ledger.drain_messages(&a).unwrap().len(), 1);

    let err = ledger.purchase_verification(&a).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyVerified(_)));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(100));
}

#[test]
fn verification_needs_full_cost() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 499);
    let err = ledger.purchase_verification(&a).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert!(!ledger.account(&a).unwrap().verified);
}

// ---------------------------------------------------------------------------
// 4. Withdrawals and deposits
// ---------------------------------------------------------------------------

#[test]
fn rejected_withdrawal_refunds_and_cannot_be_resolved_again() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 600);

    let request = ledger
        .submit_withdrawal(&a, CoinAmount::coins(500), "N1")
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(100));

    let resolved = ledger
        .resolve_withdrawal(&admin(), request.id, Decision::Reject)
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Rejected);
    assert_eq!(resolved.resolved_by, Some(admin()));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(600));

    let messages = ledger.drain_messages(&a).unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].contains("rejected"));
    assert!(ledger.drain_messages(&a).unwrap().is_empty());

    let err = ledger
        .resolve_withdrawal(&admin(), request.id, Decision::Approve)
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::NotPending { status: RequestStatus::Rejected, .. }
    ));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(600));
}

#[test]
fn approved_withdrawal_keeps_the_debit() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 500);
    let request = ledger
        .submit_withdrawal(&a, CoinAmount::coins(500), "+201001234567")
        .unwrap();
    ledger
        .resolve_withdrawal(&admin(), request.id, Decision::Approve)
        .unwrap();
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::ZERO);

    let notes = ledger.notifications(&a).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Withdrawal);
}

#[test]
fn withdrawal_preconditions() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 400);

    assert!(matches!(
        ledger.submit_withdrawal(&a, CoinAmount::ZERO, "N1"),
        Err(LedgerError::ZeroAmount)
    ));
    assert!(matches!(
        ledger.submit_withdrawal(&a, CoinAmount::coins(499), "N1"),
        Err(LedgerError::BelowMinimum { .. })
    ));
    assert!(matches!(
        ledger.submit_withdrawal(&a, CoinAmount::coins(500), "N1"),
        Err(LedgerError::InsufficientBalance { .. })
    ));
    fund(&ledger, &a, 200);
    assert!(matches!(
        ledger.submit_withdrawal(&a, CoinAmount::coins(500), "not a number"),
        Err(LedgerError::InvalidChannel(_))
    ));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(600));
    assert!(ledger.requests_for(&a).unwrap().is_empty());
}

#[test]
fn deposit_credits_only_on_approval() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");

    let request = ledger
        .submit_deposit(&a, CoinAmount::coins(50), "N7")
        .unwrap();
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::ZERO);

    ledger
        .resolve_deposit(&admin(), request.id, Decision::Approve)
        .unwrap();
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(50));

    let rejected = ledger
        .submit_deposit(&a, CoinAmount::coins(20), "N7")
        .unwrap();
    ledger
        .resolve_deposit(&admin(), rejected.id, Decision::Reject)
        .unwrap();
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(50));
}

#[test]
fn resolving_with_the_wrong_kind_is_refused() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let request = ledger
        .submit_deposit(&a, CoinAmount::coins(50), "N7")
        .unwrap();
    let err = ledger
        .resolve_withdrawal(&admin(), request.id, Decision::Reject)
        .unwrap_err();
    assert!(matches!(err, LedgerError::WrongRequestKind { .. }));
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::ZERO);
}

#[test]
fn review_table_filters_by_kind_and_status() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 1000);
    let w = ledger
        .submit_withdrawal(&a, CoinAmount::coins(500), "N1")
        .unwrap();
    ledger.submit_deposit(&a, CoinAmount::coins(5), "N1").unwrap();
    ledger
        .resolve_withdrawal(&admin(), w.id, Decision::Approve)
        .unwrap();

    let all = ledger.list_requests(&admin(), None, None).unwrap();
    assert_eq!(all.len(), 2);
    let pending = ledger
        .list_requests(&admin(), None, Some(RequestStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, FundsKind::Deposit);
    let withdrawals = ledger
        .list_requests(&admin(), Some(FundsKind::Withdrawal), None)
        .unwrap();
    assert_eq!(withdrawals[0].id, w.id);

    assert!(matches!(
        ledger.list_requests(&a, None, None),
        Err(LedgerError::NotPrivileged(_))
    ));
}

#[test]
fn unknown_request_is_not_found() {
    let (ledger, _clock) = setup();
    let err = ledger
        .resolve_deposit(&admin(), duck_types::RequestId::new(42), Decision::Approve)
        .unwrap_err();
    assert!(matches!(err, LedgerError::RequestNotFound(_)));
}

// ---------------------------------------------------------------------------
// 5. Administration
// ---------------------------------------------------------------------------

#[test]
fn non_admins_cannot_act() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let err = ledger
        .admin_direct_credit(&a, &a, CoinAmount::coins(10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(ledger
        .admin_apply_restriction(&a, &a, RestrictionKind::Ban, None)
        .is_err());
    assert!(ledger.simulate_bulk_reward(&a, 5).is_err());
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::ZERO);
}

#[test]
fn admin_credit_queues_a_message() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    ledger
        .admin_direct_credit(&admin(), &a, CoinAmount::coins(100))
        .unwrap();
    let messages = ledger.drain_messages(&a).unwrap();
    assert_eq!(messages, vec!["An administrator added 100 coins to your balance.".to_string()]);

    assert!(matches!(
        ledger.admin_direct_credit(&admin(), &a, CoinAmount::ZERO),
        Err(LedgerError::ZeroAmount)
    ));
}

#[test]
fn timed_restriction_blocks_debits_until_it_lapses() {
    let (ledger, clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 700);

    ledger
        .admin_apply_restriction(&admin(), &a, RestrictionKind::Timed, Some(2))
        .unwrap();
    assert!(matches!(
        ledger.send_gift(&a, &b, Gift::Rose, &ContentId::new("c").unwrap()),
        Err(LedgerError::AccountRestricted(_))
    ));
    assert!(matches!(
        ledger.submit_withdrawal(&a, CoinAmount::coins(500), "N1"),
        Err(LedgerError::AccountRestricted(_))
    ));
    assert!(matches!(
        ledger.purchase_verification(&a),
        Err(LedgerError::AccountRestricted(_))
    ));

    clock.advance(2 * SECS_PER_DAY);
    ledger
        .send_gift(&a, &b, Gift::Rose, &ContentId::new("c").unwrap())
        .unwrap();
}

#[test]
fn restriction_needs_a_positive_duration() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    for days in [None, Some(0)] {
        assert!(matches!(
            ledger.admin_apply_restriction(&admin(), &a, RestrictionKind::Timed, days),
            Err(LedgerError::InvalidDuration)
        ));
    }
}

#[test]
fn lifting_a_ban_restores_spending() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 10);
    ledger
        .admin_apply_restriction(&admin(), &a, RestrictionKind::Ban, None)
        .unwrap();
    let notes = ledger.notifications(&a).unwrap();
    assert_eq!(notes[0].kind, NotificationKind::Moderation);

    ledger.admin_lift_restriction(&admin(), &a).unwrap();
    ledger
        .send_gift(&a, &b, Gift::Rose, &ContentId::new("c").unwrap())
        .unwrap();
}

#[test]
fn simulation_spreads_credits_over_unrestricted_accounts() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    let banned = open(&ledger, "C");
    ledger
        .admin_apply_restriction(&admin(), &banned, RestrictionKind::Ban, None)
        .unwrap();

    let report = ledger.simulate_bulk_reward(&admin(), 4).unwrap();
    assert_eq!(report.events, 4);
    assert_eq!(report.total, CoinAmount::cents(100));
    assert!(!report.per_account.contains_key(&banned));

    let a_balance = ledger.balance(&a).unwrap();
    let b_balance = ledger.balance(&b).unwrap();
    assert_eq!(a_balance.checked_add(b_balance), Some(CoinAmount::cents(100)));
    assert_eq!(ledger.balance(&banned).unwrap(), CoinAmount::ZERO);
}

#[test]
fn simulation_without_targets_fails() {
    let (ledger, _clock) = setup();
    assert!(matches!(
        ledger.simulate_bulk_reward(&admin(), 3),
        Err(LedgerError::NoEligibleAccounts)
    ));
    open(&ledger, "A");
    assert!(matches!(
        ledger.simulate_bulk_reward(&admin(), 0),
        Err(LedgerError::EmptySimulation)
    ));
}

// ---------------------------------------------------------------------------
// 6. Accounts, journal, atomicity
// ---------------------------------------------------------------------------

#[test]
fn accounts_are_opened_once_and_never_invented() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    assert!(matches!(
        ledger.open_account(&a, Some("Again".into())),
        Err(LedgerError::AccountExists(_))
    ));
    assert!(matches!(
        ledger.balance(&id("missing")),
        Err(LedgerError::AccountNotFound(_))
    ));
}

#[test]
fn journal_explains_the_balance() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 600);
    ledger
        .send_gift(&a, &b, Gift::Crown, &ContentId::new("c").unwrap())
        .unwrap();
    let request = ledger
        .submit_withdrawal(&a, CoinAmount::coins(500), "N1")
        .unwrap();
    ledger
        .resolve_withdrawal(&admin(), request.id, Decision::Reject)
        .unwrap();

    let entries = ledger.entries(&a).unwrap();
    let reasons: Vec<_> = entries.iter().map(|e| (e.direction, e.reason)).collect();
    assert_eq!(
        reasons,
        vec![
            (Direction::Credit, EntryReason::AdminCredit),
            (Direction::Debit, EntryReason::GiftSent),
            (Direction::Debit, EntryReason::WithdrawalHold),
            (Direction::Credit, EntryReason::WithdrawalRefund),
        ]
    );

    for account in [&a, &b] {
        let audit = ledger.audit_account(account).unwrap();
        assert!(audit.consistent, "{audit:?}");
    }
}

#[test]
fn failed_commit_leaves_no_trace() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 10);

    ledger.store().fail_next_commits(1);
    let err = ledger
        .send_gift(&a, &b, Gift::Rose, &ContentId::new("c").unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(10));
    assert_eq!(ledger.balance(&b).unwrap(), CoinAmount::ZERO);
    assert!(ledger.notifications(&b).unwrap().is_empty());
    assert_eq!(ledger.entries(&a).unwrap().len(), 1);

    // A failed reward commit does not burn the claim.
    let event = EventId::new("post1").unwrap();
    ledger.store().fail_next_commits(1);
    assert!(ledger.credit_for_ad_view(&b, &event, None).is_err());
    ledger.credit_for_ad_view(&b, &event, None).unwrap();
}

#[test]
fn notifications_can_be_marked_read() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    let b = open(&ledger, "B");
    fund(&ledger, &a, 20);
    ledger.send_gift(&a, &b, Gift::Rose, &ContentId::new("c1").unwrap()).unwrap();
    ledger.send_gift(&a, &b, Gift::Rose, &ContentId::new("c2").unwrap()).unwrap();
    assert_eq!(ledger.unread_notifications(&b).unwrap(), 2);
    assert_eq!(ledger.mark_notifications_read(&b).unwrap(), 2);
    assert_eq!(ledger.unread_notifications(&b).unwrap(), 0);
    assert_eq!(ledger.mark_notifications_read(&b).unwrap(), 0);
}

#[test]
fn outcome_wraps_results_for_callers() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");
    let event = EventId::new("post123").unwrap();

    let first = Outcome::from_result(ledger.credit_for_ad_view(&viewer, &event, None), |r| {
        format!("earned {}", r.viewer_reward)
    });
    assert!(first.success);
    assert_eq!(first.message, "earned 0.25");

    let second = Outcome::from_result(ledger.credit_for_ad_view(&viewer, &event, None), |_| {
        String::new()
    });
    assert!(!second.success);
    assert!(second.is_benign());
}

// ---------------------------------------------------------------------------
// 7. Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_gifts_never_overdraw() {
    let (ledger, _clock) = setup();
    let sender = open(&ledger, "S");
    let recipients: Vec<_> = (0..8).map(|i| open(&ledger, &format!("R{i}"))).collect();
    fund(&ledger, &sender, 50);

    let successes: usize = std::thread::scope(|s| {
        let handles: Vec<_> = recipients
            .iter()
            .map(|recipient| {
                let ledger = &ledger;
                let sender = &sender;
                s.spawn(move || {
                    ledger
                        .send_gift(sender, recipient, Gift::Heart, &ContentId::new("c").unwrap())
                        .is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 5);
    assert_eq!(ledger.balance(&sender).unwrap(), CoinAmount::ZERO);
    let received = recipients
        .iter()
        .map(|r| ledger.balance(r).unwrap())
        .try_fold(CoinAmount::ZERO, |acc, b| acc.checked_add(b))
        .unwrap();
    assert_eq!(received, CoinAmount::coins(50));
}

#[test]
fn concurrent_claims_of_one_event_credit_once() {
    let (ledger, _clock) = setup();
    let viewer = open(&ledger, "V");
    let event = EventId::new("post123").unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                let _ = ledger.credit_for_ad_view(&viewer, &event, None);
            });
        }
    });

    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(25));
}

#[test]
fn concurrent_resolutions_apply_once() {
    let (ledger, _clock) = setup();
    let a = open(&ledger, "A");
    fund(&ledger, &a, 500);
    let request = ledger
        .submit_withdrawal(&a, CoinAmount::coins(500), "N1")
        .unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let _ = ledger.resolve_withdrawal(&admin(), request.id, Decision::Reject);
            });
        }
    });

    assert_eq!(ledger.balance(&a).unwrap(), CoinAmount::coins(500));
    let stored = ledger
        .store()
        .read(|txn| txn.get_request(request.id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RequestStatus::Rejected);
}
