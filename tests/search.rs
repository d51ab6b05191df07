//! End-to-end searches over the NIP-06 test vector mnemonic.
//!
//! Golden values were computed with an independent BIP-32/bech32
//! implementation on `m/44'/1237'/0'/8` (path offset 7, worker 0).

use std::time::Duration;

use npub_vanity::crypto::node::hardened;
use npub_vanity::crypto::{npub, seed};
use npub_vanity::worker::PoolEvent;
use npub_vanity::{BaseNode, ChildDeriver, Curve, ScalarFilter, SearchTarget, VanityResult, WorkerPool};

const PREFIX: &str = "npub1q4";
const IDX3_NPUB: &str = "npub1q4rszqt4vqks3tf7qskm502zsuc97qqqp39uq7c2srcpxpsr032q9urxm9";

fn test_seed() -> [u8; 64] {
    seed::seed_from_mnemonic(seed::TEST_VECTOR_MNEMONIC).unwrap()
}

/// Runs a bounded pool to exhaustion and returns every reported match.
fn run_to_exhaustion(pool: WorkerPool) -> Vec<VanityResult> {
    let mut matches = Vec::new();
    loop {
        match pool.next_event(Duration::from_secs(60)) {
            PoolEvent::Match(result) => matches.push(result),
            PoolEvent::Tick => panic!("bounded search did not finish in time"),
            PoolEvent::Exhausted => break,
        }
    }
    pool.join();
    matches
}

#[test]
fn exhaustive_scan_finds_known_match() {
    let target = SearchTarget::new(PREFIX, None);
    let pool = WorkerPool::bounded(1, 7, test_seed(), target, 1000);
    let matches = run_to_exhaustion(pool);

    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!(m.worker_id, 0);
    assert_eq!(m.index, 3);
    assert_eq!(m.encoded, IDX3_NPUB);
    assert_eq!(m.x_hex_prefix, "05470101");
    assert_eq!(m.scalar_len, 32);
}

#[test]
fn exhaustive_scan_evaluates_every_index() {
    // With filtering disabled no index may be skipped.
    let target = SearchTarget::new("npub1qqqqqqqqqq", None);
    let pool = WorkerPool::bounded(1, 7, test_seed(), target, 500);
    loop {
        match pool.next_event(Duration::from_secs(60)) {
            PoolEvent::Match(_) => continue,
            PoolEvent::Tick => panic!("bounded search did not finish in time"),
            PoolEvent::Exhausted => break,
        }
    }
    assert_eq!(pool.total_scalars(), 500);
    assert_eq!(pool.total_evaluated(), 500);
    pool.join();
}

#[test]
fn filtered_scan_skips_short_scalars_without_losing_the_match() {
    // Index 90 carries the only sub-32-byte scalar in [0, 1000); the filter
    // bytes (0x05, 0x47) agree with the target prefix, so the filtered scan
    // must find exactly what the exhaustive one finds.
    let target = SearchTarget::new(
        PREFIX,
        Some(ScalarFilter {
            min_scalar_len: 32,
            x_prefix: [0x05, 0x47],
        }),
    );
    let pool = WorkerPool::bounded(1, 7, test_seed(), target, 1000);

    let mut matches = Vec::new();
    loop {
        match pool.next_event(Duration::from_secs(60)) {
            PoolEvent::Match(result) => matches.push(result),
            PoolEvent::Tick => panic!("bounded search did not finish in time"),
            PoolEvent::Exhausted => break,
        }
    }
    assert_eq!(pool.total_scalars(), 1000);
    assert_eq!(pool.total_evaluated(), 999);
    pool.join();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 3);
    assert_eq!(matches[0].encoded, IDX3_NPUB);
}

#[test]
fn reported_npub_round_trips_to_the_x_coordinate() {
    let target = SearchTarget::new(PREFIX, None);
    let pool = WorkerPool::bounded(1, 7, test_seed(), target, 10);
    let matches = run_to_exhaustion(pool);

    assert_eq!(matches.len(), 1);
    let x = npub::decode(&matches[0].encoded).unwrap();
    assert_eq!(hex::encode(&x[..4]), matches[0].x_hex_prefix);
}

#[test]
fn sibling_workers_scan_disjoint_subtrees() {
    // Worker 1 (thread segment 9) must derive a different scalar stream
    // than worker 0 (segment 8).
    let curve = Curve::new();
    let seed = test_seed();
    let account = [hardened(44), hardened(1237), hardened(0)];

    let node8 = BaseNode::from_seed(&curve, &seed, &account)
        .unwrap()
        .derive_child(&curve, 8)
        .unwrap();
    let node9 = BaseNode::from_seed(&curve, &seed, &account)
        .unwrap()
        .derive_child(&curve, 9)
        .unwrap();

    let mut d8 = ChildDeriver::new(&curve, &node8).unwrap();
    let mut d9 = ChildDeriver::new(&curve, &node9).unwrap();

    assert_eq!(
        hex::encode(d8.scalar_at(0)),
        "2a42041781b67bb8f4db43afe2c017cb915df04dfa9042978724914f5fc60e1d"
    );
    assert_eq!(
        hex::encode(d9.scalar_at(0)),
        "0c8ea556e936796f8925cf31141e100d7deac34a385e517e17acb0ff05cd23f1"
    );
}

#[test]
fn stop_flag_interrupts_the_search() {
    let target = SearchTarget::new("npub1qqqqqqqqqq", None);
    // Full-range pool: would run for a very long time without the stop flag.
    let pool = WorkerPool::new(1, 7, test_seed(), target);
    pool.stop();

    // Stopped workers drain the channel just like exhausted ones, so the
    // pool eventually reports Exhausted; the flag is what distinguishes an
    // interrupted run from a completed one.
    loop {
        match pool.next_event(Duration::from_secs(60)) {
            PoolEvent::Match(_) => continue,
            PoolEvent::Tick => panic!("stopped worker did not exit in time"),
            PoolEvent::Exhausted => break,
        }
    }
    assert!(pool.is_stopped());
    // Join must return promptly instead of blocking on 2^31 indices.
    pool.join();
}
