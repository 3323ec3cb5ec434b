//! Anti-forgery tokens.
//!
//! A token is bound to an action name and a time window ("tick"). Tokens are
//! issued when a form is rendered and checked when it is submitted; a token
//! stays valid for its own tick and the one after it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

/// Action the font metadata box binds its token to.
pub const FONT_META_ACTION: &str = "font_meta_save";
/// Form field carrying the font metadata token.
pub const FONT_META_FIELD: &str = "font_meta_nonce";

/// Action guarding media library uploads and deletions.
pub const MEDIA_UPLOAD_ACTION: &str = "upload-media";

/// Action guarding creation of a new font.
pub const CREATE_FONT_ACTION: &str = "create-font";

/// Action for host-level edits of one font (title, deletion).
pub fn font_action(verb: &str, font_id: i32) -> String {
    format!("{}-font_{}", verb, font_id)
}

/// Default token lifetime
const DEFAULT_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Issues and verifies action-bound tokens
pub struct NonceIssuer {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl NonceIssuer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            lifetime: DEFAULT_LIFETIME,
        }
    }

    /// Issuer with a per-process secret; tokens die with the process
    pub fn with_random_secret() -> Self {
        Self::new(generate_secret())
    }

    /// Issue a token for `action`
    pub fn create(&self, action: &str) -> String {
        self.create_at(action, now_secs())
    }

    /// Check a submitted token against `action`
    pub fn verify(&self, token: &str, action: &str) -> bool {
        self.verify_at(token, action, now_secs())
    }

    fn tick(&self, now: u64) -> u64 {
        let half = (self.lifetime.as_secs() / 2).max(1);
        now / half + 1
    }

    fn create_at(&self, action: &str, now: u64) -> String {
        self.token_for_tick(action, self.tick(now))
    }

    fn verify_at(&self, token: &str, action: &str, now: u64) -> bool {
        if token.is_empty() {
            return false;
        }
        let tick = self.tick(now);
        [tick, tick.saturating_sub(1)]
            .iter()
            .any(|t| constant_time_eq(token.as_bytes(), self.token_for_tick(action, *t).as_bytes()))
    }

    fn token_for_tick(&self, action: &str, tick: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update([0u8]);
        hasher.update(action.as_bytes());
        hasher.update([0u8]);
        hasher.update(tick.to_le_bytes());
        let result = hasher.finalize();
        URL_SAFE_NO_PAD.encode(&result[..18]) // 18 bytes = 24 chars
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

static SECRET_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a process-local secret
fn generate_secret() -> Vec<u8> {
    let mut hasher = Sha256::new();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    hasher.update(timestamp.to_le_bytes());

    let thread_id = std::thread::current().id();
    hasher.update(format!("{:?}", thread_id).as_bytes());

    hasher.update(std::process::id().to_le_bytes());
    hasher.update(SECRET_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());

    // Address of a fresh heap allocation
    let marker = Box::new(timestamp);
    let addr = &*marker as *const u128 as usize;
    hasher.update(addr.to_le_bytes());

    hasher.finalize().to_vec()
}
