//! Canonical URL selection.

use crate::{Deployment, Domain};

/// Reserved suffix of the platform's default subdomains.
pub const DEFAULT_PLATFORM_SUFFIX: &str = "vercel.app";

/// True when `host` is the platform suffix itself or a subdomain of it.
pub fn is_platform_host(host: &str, platform_suffix: &str) -> bool {
    let host = host.trim();
    let suffix = platform_suffix.trim().trim_start_matches('.');
    if suffix.is_empty() || host.len() < suffix.len() {
        return false;
    }

    let split = host.len() - suffix.len();
    let Some(tail) = host.get(split..) else {
        return false;
    };
    if !tail.eq_ignore_ascii_case(suffix) {
        return false;
    }
    split == 0 || host.as_bytes()[split - 1] == b'.'
}

/// Pick the single absolute URL that represents `deployment`.
///
/// Preference order: the first custom domain in `domains`, the deployment's
/// own platform URL, then `<name>.<platform_suffix>`. The result always
/// carries an `http://` or `https://` scheme.
pub fn select_url(deployment: &Deployment, domains: &[Domain], platform_suffix: &str) -> String {
    let host = domains
        .iter()
        .find(|domain| domain.is_custom(platform_suffix))
        .map(|domain| domain.name.trim().to_string())
        .or_else(|| {
            deployment
                .url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            let name = deployment
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or("unknown");
            format!("{}.{}", name, platform_suffix.trim().trim_start_matches('.'))
        });

    with_scheme(host)
}

fn with_scheme(host: String) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host
    } else {
        format!("https://{}", host)
    }
}
