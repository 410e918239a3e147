//! Cleanup of corrupted social-profile records.
//!
//! Each record is classified independently and ends up in exactly one of
//! three states:
//!
//! * **Nullified**: a defunct service, a pasted URL with no recoverable id,
//!   or no plausible username anywhere. All fields are cleared.
//! * **Rewritten**: the profile URL was rebuilt from the registry template.
//! * **Preserved**: the URL is kept; service name and username casing may
//!   still be normalized.
//!
//! Repair is lossy. Callers that need an audit trail must keep the input.

use crate::core::registry::{template_domain, ServiceRegistry};
use crate::domain::model::{ProfileRecord, RepairOutcome, RepairedProfile};
use serde::{Deserialize, Serialize};

/// Service names (lowercased substrings) of services that no longer exist.
pub const DEFUNCT_SERVICE_PATTERNS: &[&str] = &["plus.goo", "google+", "googleplus"];

/// Canonical URL for a numeric profile id pasted into the username field.
pub const PROFILE_ID_URL: &str = "https://www.facebook.com/profile.php?id=";

const PROFILE_ID_MARKER: &str = "profile.php?id=";
const PASTED_URL_MARKERS: &[&str] = &["profile.php", "facebook.com", "http"];
const TLD_FRAGMENTS: &[&str] = &[".com", ".org", ".net"];
const RECOVERY_DENYLIST: &[&str] = &["www", "com", "org", "net", "people", "in", "u", "user", "profile", "add"];
const SERVICE_NAME_FRAGMENTS: &[&str] = &["facebook", "twitter", "linkedin", "instagram", "flickr"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOptions {
    /// Username values written by broken importers instead of a real handle.
    pub placeholder_sentinels: Vec<String>,
    /// Shortest path segment accepted when recovering a username from a URL.
    pub min_recovered_username_len: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            placeholder_sentinels: vec!["TYPE=PREF".to_string()],
            min_recovered_username_len: 3,
        }
    }
}

pub struct ProfileRepairer<'a> {
    registry: &'a ServiceRegistry,
    options: RepairOptions,
    known_domains: Vec<String>,
}

impl<'a> ProfileRepairer<'a> {
    pub fn new(registry: &'a ServiceRegistry, options: RepairOptions) -> Self {
        Self {
            registry,
            options,
            known_domains: registry.known_domains(),
        }
    }

    pub fn repair_all(&self, records: &[ProfileRecord]) -> Vec<RepairedProfile> {
        records.iter().map(|record| self.repair(record)).collect()
    }

    pub fn repair(&self, record: &ProfileRecord) -> RepairedProfile {
        let service = non_empty(record.service.as_deref());
        let username = non_empty(record.username.as_deref());
        let url = non_empty(record.url.as_deref());

        let service_lower = service.map(str::to_lowercase).unwrap_or_default();
        if is_defunct_service(&service_lower) {
            tracing::debug!(service = %service_lower, "defunct service, clearing profile");
            return nullified();
        }

        let descriptor = service.and_then(|s| self.registry.lookup(s));
        let service_name = descriptor
            .map(|d| d.display_name.to_string())
            .or_else(|| record.service.clone());

        if let Some(pasted) = username.filter(|u| looks_like_pasted_url(u)) {
            return match extract_profile_id(pasted) {
                Some(id) => {
                    tracing::debug!(%id, "rebuilt profile url from pasted username");
                    rewritten(ProfileRecord {
                        service: service_name,
                        username: None,
                        url: Some(format!("{}{}", PROFILE_ID_URL, id)),
                    })
                }
                None => {
                    tracing::debug!(username = pasted, "pasted url without profile id, clearing profile");
                    nullified()
                }
            };
        }

        let expected_domain = descriptor
            .map(|d| template_domain(d.profile_url_template))
            .unwrap_or_default();

        let mut handle = username
            .filter(|u| self.is_plausible_handle(u, &expected_domain))
            .map(str::to_string);

        if handle.is_none() {
            // A path-shaped username is the only source when the url field is empty
            let source = url.or_else(|| username.filter(|u| u.contains('/')));
            handle = source.and_then(|s| self.recover_from_path(s));
            if let Some(recovered) = &handle {
                tracing::debug!(username = %recovered, "recovered username from path");
            }
        }

        if url.is_some_and(|u| u.to_lowercase().contains(PROFILE_ID_MARKER)) {
            return preserved(ProfileRecord {
                service: service_name,
                username: record.username.clone(),
                url: record.url.clone(),
            });
        }

        let Some(handle) = handle else {
            tracing::debug!(?record, "no usable username, clearing profile");
            return nullified();
        };
        let handle = handle.to_lowercase();

        let needs_url = match url {
            None => true,
            Some(existing) => {
                (!expected_domain.is_empty() && !existing.to_lowercase().contains(&expected_domain))
                    || !existing.contains(&handle)
            }
        };

        let rebuilt = if needs_url {
            descriptor.and_then(|d| self.registry.build_profile_url(d.key, &handle))
        } else {
            None
        };

        match rebuilt {
            Some(new_url) => rewritten(ProfileRecord {
                service: service_name,
                username: Some(handle),
                url: Some(new_url),
            }),
            None => preserved(ProfileRecord {
                service: service_name,
                username: Some(handle),
                url: record.url.clone(),
            }),
        }
    }

    fn is_plausible_handle(&self, username: &str, expected_domain: &str) -> bool {
        if self
            .options
            .placeholder_sentinels
            .iter()
            .any(|sentinel| sentinel.eq_ignore_ascii_case(username))
        {
            return false;
        }

        let lower = username.to_lowercase();
        if self.looks_like_domain(&lower) {
            return false;
        }

        // "facebook" for a Facebook profile is the service, not a handle
        expected_domain.is_empty() || !expected_domain.contains(&lower)
    }

    fn looks_like_domain(&self, lower: &str) -> bool {
        lower.contains("www.")
            || TLD_FRAGMENTS.iter().any(|tld| lower.contains(tld))
            || self.known_domains.iter().any(|d| contains_host(lower, d))
    }

    fn recover_from_path(&self, value: &str) -> Option<String> {
        let segment = value.split('/').filter(|s| !s.is_empty()).last()?;
        let segment = segment.split(['?', '#']).next().unwrap_or_default();
        let segment = segment.trim().trim_start_matches('@');

        if segment.chars().count() < self.options.min_recovered_username_len {
            return None;
        }

        let lower = segment.to_lowercase();
        let denied = RECOVERY_DENYLIST.contains(&lower.as_str())
            || TLD_FRAGMENTS.iter().any(|tld| lower.contains(tld))
            || SERVICE_NAME_FRAGMENTS.iter().any(|name| lower.contains(name));
        if denied {
            None
        } else {
            Some(segment.to_string())
        }
    }
}

pub fn is_defunct_service(service_lower: &str) -> bool {
    DEFUNCT_SERVICE_PATTERNS
        .iter()
        .any(|pattern| service_lower.contains(pattern))
}

/// `host` appears in `value` delimited like a host name, so `t.me` does not
/// match inside `matt.meyer`.
fn contains_host(value: &str, host: &str) -> bool {
    value.match_indices(host).any(|(start, _)| {
        let before = value[..start].chars().next_back();
        let after = value[start + host.len()..].chars().next();
        before.map_or(true, |c| matches!(c, '.' | '/' | '@'))
            && after.map_or(true, |c| matches!(c, '/' | ':' | '?' | '#'))
    })
}

fn looks_like_pasted_url(username: &str) -> bool {
    let lower = username.to_lowercase();
    PASTED_URL_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Value following `id=`, up to the next `&`.
fn extract_profile_id(value: &str) -> Option<String> {
    let start = value.to_lowercase().find("id=")? + "id=".len();
    let id = value.get(start..)?.split('&').next()?.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn nullified() -> RepairedProfile {
    RepairedProfile {
        outcome: RepairOutcome::Nullified,
        record: ProfileRecord::default(),
    }
}

fn rewritten(record: ProfileRecord) -> RepairedProfile {
    RepairedProfile {
        outcome: RepairOutcome::Rewritten,
        record,
    }
}

fn preserved(record: ProfileRecord) -> RepairedProfile {
    RepairedProfile {
        outcome: RepairOutcome::Preserved,
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repair(service: Option<&str>, username: Option<&str>, url: Option<&str>) -> RepairedProfile {
        let repairer = ProfileRepairer::new(ServiceRegistry::builtin(), RepairOptions::default());
        repairer.repair(&ProfileRecord::new(service, username, url))
    }

    #[test]
    fn google_plus_is_nullified() {
        for service in ["Google+", "googleplus", "plus.google.com"] {
            let result = repair(Some(service), Some("someone"), Some("https://plus.google.com/123"));
            assert_eq!(result.outcome, RepairOutcome::Nullified, "{}", service);
            assert!(result.record.is_blank());
        }
    }

    #[test]
    fn missing_url_is_rebuilt() {
        let result = repair(Some("GitHub"), Some("octocat"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.url.as_deref(), Some("https://github.com/octocat"));
        assert_eq!(result.record.username.as_deref(), Some("octocat"));
        assert_eq!(result.record.service.as_deref(), Some("GitHub"));
    }

    #[test]
    fn placeholder_username_without_url_is_nullified() {
        let result = repair(Some("Twitter"), Some("TYPE=PREF"), None);
        assert_eq!(result.outcome, RepairOutcome::Nullified);
    }

    #[test]
    fn domain_like_username_is_recovered_from_its_path() {
        let result = repair(Some("LinkedIn"), Some("WWW.LINKEDIN.COM/IN/JDOE"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.username.as_deref(), Some("jdoe"));
        assert_eq!(result.record.url.as_deref(), Some("https://www.linkedin.com/in/jdoe"));
    }

    #[test]
    fn domain_like_username_is_recovered_from_url_field() {
        let result = repair(
            Some("linkedin"),
            Some("WWW.LINKEDIN.COM/IN/JDOE"),
            Some("WWW.LINKEDIN.COM/IN/JDOE"),
        );
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.service.as_deref(), Some("LinkedIn"));
        assert_eq!(result.record.username.as_deref(), Some("jdoe"));
        assert_eq!(result.record.url.as_deref(), Some("https://www.linkedin.com/in/jdoe"));
    }

    #[test]
    fn pasted_profile_id_url_is_rewritten() {
        let result = repair(
            Some("facebook"),
            Some("WWW.FACEBOOK.COM/PROFILE.PHP?ID=100004&ref=br_rs"),
            None,
        );
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.username, None);
        assert_eq!(
            result.record.url.as_deref(),
            Some("https://www.facebook.com/profile.php?id=100004")
        );
        assert_eq!(result.record.service.as_deref(), Some("Facebook"));
    }

    #[test]
    fn pasted_url_without_id_is_nullified() {
        let result = repair(Some("Twitter"), Some("https://twitter.com/jdoe"), None);
        assert_eq!(result.outcome, RepairOutcome::Nullified);
    }

    #[test]
    fn profile_id_urls_are_preserved() {
        let result = repair(
            Some("facebook"),
            Some("facebook"),
            Some("https://www.facebook.com/profile.php?id=12345"),
        );
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.service.as_deref(), Some("Facebook"));
        assert_eq!(
            result.record.url.as_deref(),
            Some("https://www.facebook.com/profile.php?id=12345")
        );
    }

    #[test]
    fn service_name_as_username_is_garbage() {
        let result = repair(Some("Facebook"), Some("facebook"), None);
        assert_eq!(result.outcome, RepairOutcome::Nullified);

        let result = repair(Some("Facebook"), Some("facebook"), Some("https://www.facebook.com/jane.doe"));
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.username.as_deref(), Some("jane.doe"));
    }

    #[test]
    fn recovery_rejects_short_and_domain_segments() {
        let result = repair(Some("Twitter"), Some("TYPE=PREF"), Some("https://twitter.com/ab"));
        assert_eq!(result.outcome, RepairOutcome::Nullified);

        let result = repair(Some("Twitter"), Some(""), Some("https://www.twitter.com/"));
        assert_eq!(result.outcome, RepairOutcome::Nullified);

        let result = repair(Some("Flickr"), None, Some("https://www.flickr.com/people/"));
        assert_eq!(result.outcome, RepairOutcome::Nullified);
    }

    #[test]
    fn username_is_lowercased_and_url_fixed_on_case_mismatch() {
        let result = repair(Some("twitter"), Some("JaneDoe"), Some("https://twitter.com/JaneDoe"));
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.service.as_deref(), Some("Twitter"));
        assert_eq!(result.record.username.as_deref(), Some("janedoe"));
        assert_eq!(result.record.url.as_deref(), Some("https://twitter.com/janedoe"));
    }

    #[test]
    fn clean_records_are_preserved() {
        let result = repair(Some("Twitter"), Some("janedoe"), Some("https://twitter.com/janedoe"));
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record, ProfileRecord::new(Some("Twitter"), Some("janedoe"), Some("https://twitter.com/janedoe")));
    }

    #[test]
    fn url_on_wrong_domain_is_rebuilt() {
        let result = repair(Some("LinkedIn"), Some("jdoe"), Some("https://example.com/jdoe"));
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.url.as_deref(), Some("https://www.linkedin.com/in/jdoe"));
    }

    #[test]
    fn services_without_templates_are_preserved() {
        let result = repair(Some("GameCenter"), Some("Player1"), None);
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.username.as_deref(), Some("player1"));
        assert_eq!(result.record.url, None);

        let result = repair(Some("Friendster"), Some("bob"), None);
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.service.as_deref(), Some("Friendster"));
    }

    #[test]
    fn blank_records_are_nullified() {
        assert_eq!(repair(None, None, None).outcome, RepairOutcome::Nullified);
        assert_eq!(repair(Some(""), Some(" "), Some("")).outcome, RepairOutcome::Nullified);
    }

    #[test]
    fn dotted_handles_are_not_mistaken_for_domains() {
        let result = repair(Some("Facebook"), Some("matt.meyer"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.username.as_deref(), Some("matt.meyer"));
        assert_eq!(result.record.url.as_deref(), Some("https://www.facebook.com/matt.meyer"));

        let result = repair(Some("Twitter"), Some("angel.cortez"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.url.as_deref(), Some("https://twitter.com/angel.cortez"));
    }

    #[test]
    fn bare_service_hosts_are_still_domains() {
        let result = repair(Some("Telegram"), Some("t.me/JDoe"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.username.as_deref(), Some("jdoe"));
        assert_eq!(result.record.url.as_deref(), Some("https://t.me/jdoe"));

        assert!(contains_host("angel.co", "angel.co"));
        assert!(contains_host("https://angel.co/u/x", "angel.co"));
        assert!(!contains_host("angel.cortez", "angel.co"));
        assert!(!contains_host("matt.meyer", "t.me"));
    }

    #[test]
    fn recovery_accepts_segment_at_minimum_length() {
        let result = repair(Some("Twitter"), Some("TYPE=PREF"), Some("https://twitter.com/abc"));
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.username.as_deref(), Some("abc"));
        assert_eq!(result.record.url.as_deref(), Some("https://twitter.com/abc"));
    }

    #[test]
    fn valid_handle_with_profile_id_url_keeps_its_case() {
        let result = repair(
            Some("facebook"),
            Some("JaneDoe"),
            Some("https://www.facebook.com/profile.php?id=12345"),
        );
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.service.as_deref(), Some("Facebook"));
        assert_eq!(result.record.username.as_deref(), Some("JaneDoe"));
        assert_eq!(
            result.record.url.as_deref(),
            Some("https://www.facebook.com/profile.php?id=12345")
        );
    }

    #[test]
    fn pasted_url_under_unknown_service_keeps_service_name() {
        let result = repair(Some("MyBlog"), Some("https://myblog.example/profile.php?id=77"), None);
        assert_eq!(result.outcome, RepairOutcome::Rewritten);
        assert_eq!(result.record.service.as_deref(), Some("MyBlog"));
        assert_eq!(result.record.username, None);
        assert_eq!(
            result.record.url.as_deref(),
            Some("https://www.facebook.com/profile.php?id=77")
        );
    }

    #[test]
    fn custom_sentinels_and_min_length() {
        let options = RepairOptions {
            placeholder_sentinels: vec!["N/A".to_string()],
            min_recovered_username_len: 2,
        };
        let repairer = ProfileRepairer::new(ServiceRegistry::builtin(), options);

        let result = repairer.repair(&ProfileRecord::new(Some("Twitter"), Some("n/a"), Some("https://twitter.com/ab")));
        assert_eq!(result.outcome, RepairOutcome::Preserved);
        assert_eq!(result.record.username.as_deref(), Some("ab"));
    }
}
