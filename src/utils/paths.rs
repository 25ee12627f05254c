use std::path::Path;

use super::random::random_alphanumeric;

/// Prefix used when no bucket root is configured.
pub const DEFAULT_BUCKET_ROOT: &str = "artifacts/";

pub const RANDOM_DIR_LEN: usize = 32;

/// Strips one leading `/` and makes sure a non-empty value ends with exactly
/// the `/` it already had or one appended. Returns `None` for empty input so
/// callers pick their own fallback.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let trimmed = raw.strip_prefix('/').unwrap_or(raw);
    if trimmed.is_empty() || trimmed.ends_with('/') {
        return Some(trimmed.to_string());
    }
    Some(format!("{}/", trimmed))
}

pub fn normalize_bucket_root(raw: &str) -> String {
    normalize_prefix(raw).unwrap_or_else(|| DEFAULT_BUCKET_ROOT.to_string())
}

/// An empty destination becomes a fresh random directory for this run.
pub fn normalize_destination_dir(raw: &str) -> String {
    normalize_prefix(raw).unwrap_or_else(|| format!("{}/", random_alphanumeric(RANDOM_DIR_LEN)))
}

/// Final path component of the local file, taken verbatim.
pub fn base_name(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `bucket_root + destination_dir + name`, no escaping.
pub fn build_storage_key(bucket_root: &str, destination_dir: &str, name: &str) -> String {
    format!("{}{}{}", bucket_root, destination_dir, name)
}
