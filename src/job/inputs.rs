//! Resolving the job payload into local file paths

use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Collect existing regular files named by the payload
///
/// `urls` is consulted first; the single `url` field only when `urls` yields
/// nothing. Entries may be `file://` URIs or plain paths. Other schemes,
/// missing files and duplicates are skipped. Order is preserved.
pub fn collect_file_paths(data: &Value) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    if let Some(urls) = data.get("urls").and_then(Value::as_array) {
        for text in urls.iter().filter_map(Value::as_str) {
            if let Some(path) = resolve_local_file(text) {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }
    }

    if !paths.is_empty() {
        return paths;
    }

    data.get("url")
        .and_then(Value::as_str)
        .and_then(resolve_local_file)
        .into_iter()
        .collect()
}

/// Turn one user-supplied location into an absolute path of an existing file
pub fn resolve_local_file(text: &str) -> Option<PathBuf> {
    if text.is_empty() {
        return None;
    }

    let path = match Url::parse(text) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok()?,
        // drive letters like C:\ parse as a one-letter scheme
        Ok(url) if url.scheme().len() == 1 => PathBuf::from(text),
        Ok(url) => {
            debug!(scheme = url.scheme(), input = text, "Skipping non-local input");
            return None;
        }
        Err(_) => PathBuf::from(text),
    };

    existing_file(&path)
}

fn existing_file(path: &Path) -> Option<PathBuf> {
    if !path.is_file() {
        debug!(path = %path.display(), "Skipping missing or non-regular input");
        return None;
    }
    std::path::absolute(path).ok()
}
