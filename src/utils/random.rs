use base64::Engine as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// URL-safe random token built from `bytes_len` random bytes.
///
/// The result only contains `[A-Za-z0-9_-]`, so it is usable as an HTML
/// element id and as a slash-command argument without quoting.
pub fn random_urlsafe(bytes_len: usize) -> String {
    let bytes = best_effort_random_bytes(bytes_len);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn best_effort_random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0_u8; len];
    if getrandom::fill(&mut out).is_ok() {
        return out;
    }

    tracing::warn!("system randomness unavailable; falling back to time-seeded bytes");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let count = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut x = nanos
        ^ ((std::process::id() as u64) << 32)
        ^ count.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (len as u64);
    for byte in &mut out {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        *byte = (x & 0xFF) as u8;
    }
    out
}
