//! Classification Rules & Constants
//!
//! Fixed lists and scores used by the local override rules.
//! No classify logic here, only constants and matchers.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// SCORES
// ============================================================================

/// Score of the insecure-protocol override
pub const INSECURE_PROTOCOL_SCORE: f32 = 0.95;

/// Score of the trusted-domain override
pub const TRUSTED_DOMAIN_SCORE: f32 = 0.01;

/// Score of the link + spam keyword escalation
pub const SPAM_COMPOUND_SCORE: f32 = 0.99;

/// Unknown HTTPS links are only softened when the model scored at most this
pub const UNKNOWN_HTTPS_MAX_BASE: f32 = 0.8;

/// Minimum score of a message carrying an unknown HTTPS link
pub const UNKNOWN_HTTPS_FLOOR: f32 = 0.55;

/// Impact recorded for each spam keyword hit
pub const TRIGGER_IMPACT: f32 = 1.0;

// ============================================================================
// REASONS
// ============================================================================

pub const REASON_UNENCRYPTED: &str = "Unencrypted connection (HTTP)";
pub const REASON_INTERCEPTION: &str = "Data may be intercepted";

pub const REASON_TRUSTED_DOMAIN: &str = "Link points to a trusted domain";

pub const REASON_SPAM_LINK: &str = "Link combined with spam/fraud keywords";
pub const REASON_SPAM_PATTERN: &str = "Typical pattern of fraudulent mailings";

pub const REASON_UNKNOWN_LINK: &str = "Link to an unknown website";
pub const REASON_CHECK_SOURCE: &str = "Do not follow links from unknown sources";

// ============================================================================
// TOKENS
// ============================================================================

pub const INSECURE_PROTOCOL: &str = "http://";
pub const SECURE_PROTOCOL: &str = "https://";
pub const LINK_TOKEN: &str = "http";

/// Domains of messengers and OS vendors. A message mentioning one of them
/// is treated as safe without asking the model.
pub const SAFE_DOMAINS: &[&str] = &[
    "t.me",
    "telegram.org",
    "whatsapp.com",
    "wa.me",
    "google.com",
    "youtube.com",
    "android.com",
    "apple.com",
    "microsoft.com",
    "gosuslugi.ru",
    "yandex.ru",
    "vk.com",
];

/// Gambling, prizes, crypto/investment bait and account urgency terms
/// (substring match against the lower-cased text).
pub const SPAM_KEYWORDS: &[&str] = &[
    // gambling
    "казино",
    "casino",
    "ставк",
    "1xbet",
    "джекпот",
    "jackpot",
    // prizes
    "выигр",
    "приз",
    "подарок",
    "лотере",
    "winner",
    "prize",
    // crypto / investment
    "bitcoin",
    "биткоин",
    "крипт",
    "crypto",
    "инвест",
    "invest",
    "заработ",
    "пассивный доход",
    // loans
    "займ",
    "кредит одобрен",
    // account urgency
    "заблокирован",
    "блокировк",
    "подтвердите",
    "verify your account",
    "account suspended",
];

// ============================================================================
// MATCHERS
// ============================================================================

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("link pattern is valid"));

/// Case-insensitive substring check
pub fn contains_ci(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// First safe domain mentioned in the lower-cased text
pub fn find_safe_domain(lowered: &str) -> Option<&'static str> {
    SAFE_DOMAINS.iter().copied().find(|d| lowered.contains(d))
}

/// All spam keywords present in the lower-cased text, in list order
pub fn find_spam_keywords(lowered: &str) -> Vec<&'static str> {
    SPAM_KEYWORDS.iter().copied().filter(|k| lowered.contains(k)).collect()
}

/// Every http(s) URL in the text, in order of appearance
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
