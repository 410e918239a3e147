//! Mapping between profile URLs and `(service, username)` pairs.

use crate::core::registry::{strip_www, ServiceRegistry, PLACEHOLDER};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProfile {
    pub service: &'static str,
    pub username: String,
}

/// Pull the username out of `url` using a profile template.
///
/// The scheme may be `http` or `https` and a leading `www.` is optional on
/// either side. When the template does not match, the last non-empty path
/// segment (minus any leading `@`) is used instead.
pub fn extract_username(url: &str, template: &str) -> Option<String> {
    let url = url.trim();
    if let Some(matcher) = template_matcher(template) {
        if let Some(username) = matcher
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        {
            return Some(username);
        }
    }
    last_path_segment(url)
}

/// First registered service whose domain matches the URL host and which
/// yields a username.
pub fn resolve_service_from_url(registry: &ServiceRegistry, url: &str) -> Option<ResolvedProfile> {
    let parsed = parse_loose(url)?;
    let host = strip_www(parsed.host_str()?).to_string();

    for descriptor in registry.iter().filter(|s| s.has_profile_url()) {
        if registry.domain_of(descriptor.key) != host {
            continue;
        }
        if let Some(username) = extract_username(url, descriptor.profile_url_template) {
            tracing::debug!(service = descriptor.key, %username, "resolved profile url");
            return Some(ResolvedProfile {
                service: descriptor.key,
                username,
            });
        }
    }
    None
}

fn template_matcher(template: &str) -> Option<Regex> {
    let (prefix, suffix) = template.split_once(PLACEHOLDER)?;
    let prefix = strip_scheme(prefix);
    let prefix = prefix.strip_prefix("www.").unwrap_or(prefix);

    let pattern = format!(
        r"^(?:https?://)?(?:www\.)?{}([^/?#]+){}$",
        regex::escape(prefix),
        regex::escape(suffix)
    );
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(matcher) => Some(matcher),
        Err(e) => {
            tracing::warn!(template, error = %e, "could not build template matcher");
            None
        }
    }
}

fn strip_scheme(value: &str) -> &str {
    value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value)
}

/// Parse a URL, assuming `https://` when no scheme is given.
pub(crate) fn parse_loose(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let parsed = if url.contains("://") {
        Url::parse(url).ok()?
    } else {
        Url::parse(&format!("https://{}", url)).ok()?
    };
    parsed.host_str()?;
    Some(parsed)
}

pub(crate) fn last_path_segment(url: &str) -> Option<String> {
    let parsed = parse_loose(url)?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let segment = segment.trim_start_matches('@');
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}
