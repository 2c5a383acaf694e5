//! The ledger on the LMDB backend: effects survive a reopen, failed units
//! leave nothing behind, and concurrent writers serialise.

use std::sync::Arc;

use duck_ledger::{AdminPolicy, CoinLedger, ErrorKind, LedgerError};
use duck_nullables::{NullClock, NullRandom};
use duck_store_lmdb::LmdbEnvironment;
use duck_types::{AccountId, CoinAmount, ContentId, Decision, EventId, Gift, LedgerParams};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type LmdbLedger = CoinLedger<LmdbEnvironment, Arc<NullClock>, NullRandom>;

fn id(raw: &str) -> AccountId {
    AccountId::new(raw).expect("valid account id")
}

fn open_ledger(dir: &std::path::Path) -> LmdbLedger {
    let env = LmdbEnvironment::open(dir, 64 * 1024 * 1024).expect("open env");
    CoinLedger::new(env, LedgerParams::default(), AdminPolicy::new([id("admin")]))
        .with_clock(Arc::new(NullClock::new(5_000)))
        .with_random(NullRandom::constant(0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn longest_ids_fit_the_claim_key_and_oversized_ones_are_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ledger = open_ledger(dir.path());
    let viewer = id(&"v".repeat(AccountId::MAX_LEN));
    ledger.open_account(&viewer, None).unwrap();

    let event = EventId::new("e".repeat(duck_types::ids::MAX_ID_LEN)).unwrap();
    ledger.credit_for_ad_view(&viewer, &event, None).unwrap();
    assert!(ledger
        .credit_for_ad_view(&viewer, &event, None)
        .unwrap_err()
        .is_benign());

    let err = LedgerError::from(EventId::new("e".repeat(600)).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::cents(25));
}

#[test]
fn balances_requests_and_claims_survive_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let request_id = {
        let ledger = open_ledger(dir.path());
        let a = id("A");
        ledger.open_account(&a, Some("Alice".into())).unwrap();
        ledger
            .admin_direct_credit(&id("admin"), &a, CoinAmount::coins(600))
            .unwrap();
        ledger
            .credit_for_ad_view(&a, &EventId::new("post123").unwrap(), None)
            .unwrap();
        ledger
            .submit_withdrawal(&a, CoinAmount::coins(500), "N1")
            .unwrap()
            .id
    };

    let ledger = open_ledger(dir.path());
    let a = id("A");
    assert_eq!(ledger.balance(&a).unwrap(), "100.25".parse::<CoinAmount>().unwrap());
    assert!(ledger
        .credit_for_ad_view(&a, &EventId::new("post123").unwrap(), None)
        .unwrap_err()
        .is_benign());

    ledger
        .resolve_withdrawal(&id("admin"), request_id, Decision::Reject)
        .unwrap();
    assert_eq!(ledger.balance(&a).unwrap(), "600.25".parse::<CoinAmount>().unwrap());
    assert_eq!(ledger.drain_messages(&a).unwrap().len(), 3);
    assert!(ledger.audit_account(&a).unwrap().consistent);
}

#[test]
fn refused_gift_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ledger = open_ledger(dir.path());
    let a = id("A");
    let b = id("B");
    ledger.open_account(&a, None).unwrap();
    ledger.open_account(&b, None).unwrap();

    let err = ledger
        .send_gift(&a, &b, Gift::Diamond, &ContentId::new("clip").unwrap())
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert!(ledger.notifications(&b).unwrap().is_empty());
    assert!(ledger.entries(&a).unwrap().is_empty());
}

#[test]
fn concurrent_rewards_on_lmdb_are_not_lost() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ledger = open_ledger(dir.path());
    let viewer = id("V");
    ledger.open_account(&viewer, None).unwrap();

    std::thread::scope(|s| {
        for t in 0..4 {
            let ledger = &ledger;
            let viewer = &viewer;
            s.spawn(move || {
                for i in 0..10 {
                    ledger
                        .credit_for_ad_view(viewer, &EventId::new(format!("e{t}-{i}")).unwrap(), None)
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(ledger.balance(&viewer).unwrap(), CoinAmount::coins(10));
}
