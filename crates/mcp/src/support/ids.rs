#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Short entity id: 8 lowercase hex characters. The hash input (seed, clock
/// nanos, process-wide counter) keeps ids distinct within a process; the
/// primary key constraint backs the residual collision risk.
pub(crate) fn short_id(seed: &str) -> String {
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(nanos.to_be_bytes());
    hasher.update(counter.to_be_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
