use getwork_miner_rs::miner::search::next_nonce;
use getwork_miner_rs::miner::share::{decode_header, encode};
use getwork_miner_rs::*;
use hex_literal::hex;

const GENESIS_NONCE: u32 = 2_083_236_893;

/// Bitcoin genesis block header with a zeroed nonce field
fn genesis_template() -> Vec<u8> {
    let mut header = Vec::with_capacity(80);
    header.extend_from_slice(&1u32.to_le_bytes());
    header.extend_from_slice(&[0u8; 32]);
    header.extend_from_slice(&hex!(
        "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a"
    ));
    header.extend_from_slice(&0x495fab29u32.to_le_bytes());
    header.extend_from_slice(&0x1d00ffffu32.to_le_bytes());
    header.extend_from_slice(&[0u8; 4]);
    header
}

#[test]
fn genesis_nonce_is_found_encoded_and_accepted() {
    let pool = LocalPool::new(genesis_template()).unwrap();
    let mut unit = WorkUnit::new(pool.fetch_template().unwrap()).unwrap();
    unit.set_worker_id(1);

    let mut nonce = GENESIS_NONCE - 6;
    assert!(search(&mut unit, &mut nonce, 10, 1).unwrap());
    assert_eq!(nonce, GENESIS_NONCE);
    assert_eq!(unit.state(), WorkState::ShareFound);
    assert_eq!(
        unit.current_digest(),
        hex!("6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000")
    );

    unit.set_final_nonce(nonce);
    unit.calculate_share();
    let share = unit.share().unwrap();

    assert_eq!(share.payload.len(), 256);
    assert!(share.submit(&pool));
    assert_eq!(pool.accepted(), 1);
}

#[test]
fn strided_search_lands_on_genesis_nonce() {
    let stride = 4;
    let offset = GENESIS_NONCE % stride;
    let mut unit = WorkUnit::new(genesis_template()).unwrap();

    let mut nonce = GENESIS_NONCE - 3 * stride;
    assert_eq!(nonce % stride, offset);
    assert!(search(&mut unit, &mut nonce, 8, stride).unwrap());
    assert_eq!(nonce, GENESIS_NONCE);
}

#[test]
fn stale_share_is_rejected_after_template_refresh() {
    let pool = LocalPool::new(genesis_template()).unwrap();
    let mut unit = WorkUnit::new(genesis_template()).unwrap();
    let mut nonce = GENESIS_NONCE;
    assert!(search(&mut unit, &mut nonce, 1, 1).unwrap());
    unit.set_final_nonce(nonce);
    unit.calculate_share();
    let share = unit.share().unwrap();

    let mut refreshed = genesis_template();
    refreshed[68] ^= 0xff;
    pool.set_template(refreshed).unwrap();

    assert!(!share.submit(&pool));
    assert_eq!(pool.rejected(), 1);
}

#[test]
fn clones_search_independently_over_one_template() {
    let base = WorkUnit::new(genesis_template()).unwrap();
    let mut a = base.clone();
    let mut b = base.clone();
    let (mut na, mut nb) = (0u32, 1u32);

    assert!(!search(&mut a, &mut na, 5, 2).unwrap());
    assert!(!search(&mut b, &mut nb, 5, 2).unwrap());

    assert_eq!((na, nb), (10, 11));
    assert_eq!(a.nonce(), 8);
    assert_eq!(b.nonce(), 9);
    assert_eq!(base.nonce(), 0);
    assert_eq!(&a.working()[..76], &b.working()[..76]);
    assert!(std::sync::Arc::ptr_eq(a.template(), b.template()));
}

#[test]
fn encoded_payload_round_trips_through_pool_decoding() {
    let mut unit = WorkUnit::new(genesis_template()).unwrap();
    unit.write_nonce(GENESIS_NONCE);

    let payload = unit.calculate_share().to_string();

    assert_eq!(payload, encode(unit.working()));
    assert_eq!(decode_header(&payload, 80).unwrap(), unit.working());
    assert!(payload.ends_with(&format!("00000080{}80020000", "0".repeat(80))));
}

#[test]
fn wrap_law_matches_documented_example() {
    assert_eq!(next_nonce(u32::MAX - 1, 5), u32::MAX % 5);
}
