//! JSON pointer lookup (RFC 6901 flavour)
//!
//! Differs from [`serde_json::Value::pointer`] in one place: `"/"` addresses
//! the root document instead of the empty-string key.

use serde_json::Value;

/// Look up `pointer` inside `root`
///
/// Returns `None` when the pointer is malformed or any step misses.
pub fn resolve<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() || pointer == "/" {
        return Some(root);
    }

    let rest = pointer.strip_prefix('/')?;

    rest.split('/').try_fold(root, |current, token| {
        let key = decode_token(token);
        match current {
            Value::Object(map) => map.get(key.as_str()),
            Value::Array(items) => parse_index(&key).and_then(|index| items.get(index)),
            _ => None,
        }
    })
}

/// Unescape one reference token: `~1` becomes `/`, then `~0` becomes `~`
pub fn decode_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
