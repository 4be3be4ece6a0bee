//! Placeholder substitution for URL and header templates
//!
//! Two placeholders exist:
//! - `${ENV:NAME}` - value of the process environment variable `NAME` (empty if unset)
//! - `${FILENAME}` - percent-encoded base name of the uploaded file (URL templates only)
//!
//! Everything else is passed through untouched.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

const FILENAME_PLACEHOLDER: &str = "${FILENAME}";

/// Everything except RFC 3986 unreserved characters gets escaped
const FILE_NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{ENV:([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Replace `${ENV:NAME}` with values from the process environment
pub fn substitute_env(text: &str) -> String {
    substitute_env_with(text, |name| env::var(name).ok())
}

/// Replace `${ENV:NAME}` using a custom lookup
///
/// Each placeholder is expanded once, left to right. Substituted values are
/// never scanned again, so a value that itself looks like a placeholder ends
/// up in the output literally.
pub fn substitute_env_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

/// Percent-encode a file name so it can sit inside a URL path segment
pub fn encode_file_name(file_name: &str) -> String {
    utf8_percent_encode(file_name, FILE_NAME_ENCODE_SET).to_string()
}

/// Expand a URL template for the given file base name
pub fn apply_url_template(template: &str, file_name: &str) -> String {
    substitute_env(template).replace(FILENAME_PLACEHOLDER, &encode_file_name(file_name))
}
