//! Rate limiter key naming
//!
//! Request logs live at `<namespace><identifier>:log` and manual blocks at
//! `<namespace><identifier>:block`.

use crate::error::{StatsError, StatsResult};

/// Suffix of a rate limit request log key
pub const LOG_SUFFIX: &str = ":log";

/// Suffix of a manual block key
pub const BLOCK_SUFFIX: &str = ":block";

/// Escape glob metacharacters so the namespace is matched literally
pub fn escape_pattern(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern enumerating every request log key in a namespace
pub fn log_pattern(namespace: &str) -> String {
    format!("{}*{}", escape_pattern(namespace), LOG_SUFFIX)
}

/// Pattern enumerating every manual block key in a namespace
pub fn block_pattern(namespace: &str) -> String {
    format!("{}*{}", escape_pattern(namespace), BLOCK_SUFFIX)
}

/// Recover the logical identifier from a full store key
pub fn parse_identifier<'a>(namespace: &str, suffix: &str, key: &'a str) -> StatsResult<&'a str> {
    let rest = key
        .strip_prefix(namespace)
        .ok_or_else(|| StatsError::MalformedKey {
            key: key.to_string(),
            expected: format!("prefix {:?}", namespace),
        })?;

    rest.strip_suffix(suffix)
        .ok_or_else(|| StatsError::MalformedKey {
            key: key.to_string(),
            expected: format!("suffix {:?}", suffix),
        })
}

/// Full request log key for an identifier
pub fn log_key(namespace: &str, identifier: &str) -> String {
    format!("{}{}{}", namespace, identifier, LOG_SUFFIX)
}

/// Full manual block key for an identifier
pub fn block_key(namespace: &str, identifier: &str) -> String {
    format!("{}{}{}", namespace, identifier, BLOCK_SUFFIX)
}
