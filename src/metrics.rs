//! Lightweight global metrics for Corral.
//!
//! Потокобезопасные атомарные счётчики по подсистемам:
//! - аллокация (next/specific/release/exhausted)
//! - снапшоты (take/restore)
//! - provisioning

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Allocation -----
static ALLOCATIONS_TOTAL: AtomicU64 = AtomicU64::new(0);
static SPECIFIC_ALLOCATIONS_TOTAL: AtomicU64 = AtomicU64::new(0);
static RELEASES_TOTAL: AtomicU64 = AtomicU64::new(0);
static EXHAUSTION_HITS: AtomicU64 = AtomicU64::new(0);

// ----- Snapshots -----
static SNAPSHOTS_TAKEN: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static RESTORES_TOTAL: AtomicU64 = AtomicU64::new(0);
static RESTORED_IDS_TOTAL: AtomicU64 = AtomicU64::new(0);

// ----- Provisioning -----
static PROVISION_FAILURES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub allocations_total: u64,
    pub specific_allocations_total: u64,
    pub releases_total: u64,
    pub exhaustion_hits: u64,

    pub snapshots_taken: u64,
    pub snapshot_bytes_written: u64,
    pub restores_total: u64,
    pub restored_ids_total: u64,

    pub provision_failures: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        allocations_total: ALLOCATIONS_TOTAL.load(Ordering::Relaxed),
        specific_allocations_total: SPECIFIC_ALLOCATIONS_TOTAL.load(Ordering::Relaxed),
        releases_total: RELEASES_TOTAL.load(Ordering::Relaxed),
        exhaustion_hits: EXHAUSTION_HITS.load(Ordering::Relaxed),

        snapshots_taken: SNAPSHOTS_TAKEN.load(Ordering::Relaxed),
        snapshot_bytes_written: SNAPSHOT_BYTES_WRITTEN.load(Ordering::Relaxed),
        restores_total: RESTORES_TOTAL.load(Ordering::Relaxed),
        restored_ids_total: RESTORED_IDS_TOTAL.load(Ordering::Relaxed),

        provision_failures: PROVISION_FAILURES.load(Ordering::Relaxed),
    }
}

/// Обнулить счётчики (для тестов).
pub fn reset() {
    for c in [
        &ALLOCATIONS_TOTAL,
        &SPECIFIC_ALLOCATIONS_TOTAL,
        &RELEASES_TOTAL,
        &EXHAUSTION_HITS,
        &SNAPSHOTS_TAKEN,
        &SNAPSHOT_BYTES_WRITTEN,
        &RESTORES_TOTAL,
        &RESTORED_IDS_TOTAL,
        &PROVISION_FAILURES,
    ] {
        c.store(0, Ordering::Relaxed);
    }
}

// ----- recorders -----

#[inline]
pub fn record_allocation() {
    ALLOCATIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_specific_allocation() {
    SPECIFIC_ALLOCATIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_release() {
    RELEASES_TOTAL.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_exhaustion() {
    EXHAUSTION_HITS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_snapshot(bytes: u64) {
    SNAPSHOTS_TAKEN.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_WRITTEN.fetch_add(bytes, Ordering::Relaxed);
}

#[inline]
pub fn record_restore(ids: u64) {
    RESTORES_TOTAL.fetch_add(1, Ordering::Relaxed);
    RESTORED_IDS_TOTAL.fetch_add(ids, Ordering::Relaxed);
}

#[inline]
pub fn record_provision_failure() {
    PROVISION_FAILURES.fetch_add(1, Ordering::Relaxed);
}
