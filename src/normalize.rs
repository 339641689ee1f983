//! Reference normalization
//!
//! Collapses the many shapes a Facebook profile reference arrives in
//! (`@handle`, vanity URLs, mobile URLs, `profile.php?id=` links and
//! `share.php?u=` redirects) into a single canonical string.
//!
//! Every function here is total: malformed intermediate URLs degrade to the
//! best string produced so far instead of failing.

use url::Url;

const FACEBOOK_PREFIXES: [&str; 3] = ["facebook.com/", "www.facebook.com/", "m.facebook.com/"];
const SHARE_PATH: &str = "share.php";
const SHARE_PARAM: &str = "u";
const ID_PARAM: &str = "id";
const PARSE_BASE: &str = "https://facebook.com/";
const PROFILE_BASE: &str = "https://www.facebook.com/";

/// Maximum number of nested `share.php?u=` redirects that are unwrapped.
/// Deeper chains are returned as-is.
pub const MAX_SHARE_DEPTH: usize = 2;

/// Rewrites a raw reference into its canonical form.
///
/// ```rust,ignore
/// assert_eq!(normalize("@TheQbanguy"), "TheQbanguy");
/// assert_eq!(normalize("https://m.facebook.com/TheQbanguy/"), "TheQbanguy");
/// ```
pub fn normalize(input: &str) -> String {
    normalize_at(input, 0)
}

fn normalize_at(input: &str, depth: usize) -> String {
    let trimmed = input.trim();
    let clean = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    let clean = strip_facebook_prefix(clean);
    let clean = clean.strip_suffix('/').unwrap_or(clean);

    if clean.starts_with(SHARE_PATH) {
        if depth >= MAX_SHARE_DEPTH {
            tracing::warn!(depth, "share link nesting too deep, not unwrapping further");
            return clean.to_string();
        }

        if let Some(shared) = query_param(&format!("{}{}", PARSE_BASE, clean), SHARE_PARAM) {
            return normalize_at(&shared, depth + 1);
        }
    }

    clean.to_string()
}

fn strip_facebook_prefix(s: &str) -> &str {
    let rest = match s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return s,
    };

    FACEBOOK_PREFIXES
        .iter()
        .find_map(|prefix| rest.strip_prefix(*prefix))
        .unwrap_or(s)
}

/// Returns the non-empty value of `name` in the query string of `raw_url`,
/// or `None` when the URL does not parse or the parameter is absent.
fn query_param(raw_url: &str, name: &str) -> Option<String> {
    let url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(error = %e, url = raw_url, "could not parse reference as url");
            return None;
        }
    };

    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Pulls the `id` query parameter out of a canonical reference such as
/// `profile.php?id=100012345678`.
pub fn extract_profile_id(canonical: &str) -> Option<String> {
    if canonical.starts_with("http") {
        query_param(canonical, ID_PARAM)
    } else {
        query_param(&format!("{}{}", PARSE_BASE, canonical), ID_PARAM)
    }
}

/// Builds the profile URL handed to the external lookup.
pub fn profile_url(canonical: &str) -> String {
    if canonical.starts_with("http") {
        canonical.to_string()
    } else {
        format!("{}{}", PROFILE_BASE, canonical)
    }
}
