//! Collision-free attachment naming.
//!
//! Names combine the wall-clock millisecond, a random integer in `[0, 1e9)` and the
//! client's file name with whitespace runs collapsed to single hyphens. Two uploads only
//! collide when they land in the same millisecond and draw the same random number, so
//! uniqueness is probabilistic (about 1 in 1e9 per shared millisecond), not guaranteed.

use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use rand::Rng;
use regex::Regex;

const MAX_SANITIZED_NAME_BYTES: usize = 200;
const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;
const FALLBACK_NAME: &str = "file";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Assign a storage name for an uploaded file: `<millis>-<random>-<sanitized name>`.
pub fn assign_name(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let random = rand::rng().random_range(0..RANDOM_SUFFIX_BOUND);
    format!("{}-{}-{}", millis, random, sanitize_original_name(original_name))
}

/// Reduce a client-supplied file name to one safe path segment.
///
/// Directory components are dropped, whitespace runs become a single `-`, and overly
/// long names keep their tail so the extension survives.
pub fn sanitize_original_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let base = Path::new(base)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let collapsed = WHITESPACE_RUN.replace_all(base, "-");
    let collapsed = keep_tail(&collapsed, MAX_SANITIZED_NAME_BYTES);

    if collapsed.is_empty() || collapsed.chars().all(|c| c == '-' || c == '.') {
        return FALLBACK_NAME.to_string();
    }
    collapsed.to_string()
}

fn keep_tail(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut start = name.len() - max_bytes;
    while !name.is_char_boundary(start) {
        start += 1;
    }
    &name[start..]
}
