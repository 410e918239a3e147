//! Static table of known online services.
//!
//! Each [`ServiceDescriptor`] carries the profile URL template used to build
//! and parse profile links, plus optional photo templates. Templates mark the
//! username position with [`PLACEHOLDER`].

use serde::Serialize;
use std::collections::BTreeSet;
use url::Url;

pub const PLACEHOLDER: &str = "{username}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub profile_url_template: &'static str,
    pub photo_url_template: Option<&'static str>,
    pub photo_api_template: Option<&'static str>,
    pub natively_supported: bool,
}

impl ServiceDescriptor {
    const fn native(key: &'static str, display_name: &'static str, profile: &'static str) -> Self {
        Self {
            key,
            display_name,
            profile_url_template: profile,
            photo_url_template: None,
            photo_api_template: None,
            natively_supported: true,
        }
    }

    const fn link(key: &'static str, display_name: &'static str, profile: &'static str) -> Self {
        Self {
            key,
            display_name,
            profile_url_template: profile,
            photo_url_template: None,
            photo_api_template: None,
            natively_supported: false,
        }
    }

    const fn with_photo_url(mut self, template: &'static str) -> Self {
        self.photo_url_template = Some(template);
        self
    }

    const fn with_photo_api(mut self, template: &'static str) -> Self {
        self.photo_api_template = Some(template);
        self
    }

    pub fn has_profile_url(&self) -> bool {
        !self.profile_url_template.is_empty()
    }

    pub fn has_photo_support(&self) -> bool {
        self.photo_url_template.is_some_and(|t| !t.is_empty())
            || self.photo_api_template.is_some_and(|t| !t.is_empty())
    }
}

// Iteration order is the tie-break order for URL resolution.
static SERVICES: &[ServiceDescriptor] = &[
    // Natively modelled by the contact store as social profiles
    ServiceDescriptor::native("facebook", "Facebook", "https://www.facebook.com/{username}")
        .with_photo_url("https://graph.facebook.com/{username}/picture?type=large"),
    ServiceDescriptor::native("flickr", "Flickr", "https://www.flickr.com/people/{username}"),
    ServiceDescriptor::native("linkedin", "LinkedIn", "https://www.linkedin.com/in/{username}"),
    ServiceDescriptor::native("myspace", "MySpace", "https://myspace.com/{username}"),
    ServiceDescriptor::native("sinaweibo", "SinaWeibo", "https://weibo.com/{username}"),
    ServiceDescriptor::native("tencentweibo", "TencentWeibo", ""),
    ServiceDescriptor::native("twitter", "Twitter", "https://twitter.com/{username}"),
    ServiceDescriptor::native("yelp", "Yelp", "https://www.yelp.com/user_details?userid={username}"),
    ServiceDescriptor::native("gamecenter", "GameCenter", ""),
    // Link-only services, stored as labelled URLs
    ServiceDescriptor::link("github", "GitHub", "https://github.com/{username}")
        .with_photo_url("https://github.com/{username}.png")
        .with_photo_api("https://api.github.com/users/{username}"),
    ServiceDescriptor::link("gitlab", "GitLab", "https://gitlab.com/{username}")
        .with_photo_api("https://gitlab.com/api/v4/users?username={username}"),
    ServiceDescriptor::link("instagram", "Instagram", "https://www.instagram.com/{username}"),
    ServiceDescriptor::link("tiktok", "TikTok", "https://www.tiktok.com/@{username}"),
    ServiceDescriptor::link("youtube", "YouTube", "https://www.youtube.com/@{username}"),
    ServiceDescriptor::link("threads", "Threads", "https://www.threads.net/@{username}"),
    ServiceDescriptor::link("bluesky", "Bluesky", "https://bsky.app/profile/{username}")
        .with_photo_api("https://public.api.bsky.app/xrpc/app.bsky.actor.getProfile?actor={username}"),
    ServiceDescriptor::link("mastodon", "Mastodon", "https://mastodon.social/@{username}"),
    ServiceDescriptor::link("keybase", "Keybase", "https://keybase.io/{username}")
        .with_photo_url("https://keybase.io/{username}/photo.png"),
    ServiceDescriptor::link("angellist", "AngelList", "https://angel.co/u/{username}"),
    ServiceDescriptor::link("producthunt", "Product Hunt", "https://www.producthunt.com/@{username}"),
    ServiceDescriptor::link("pinterest", "Pinterest", "https://www.pinterest.com/{username}"),
    ServiceDescriptor::link("quora", "Quora", "https://www.quora.com/profile/{username}"),
    ServiceDescriptor::link("medium", "Medium", "https://medium.com/@{username}"),
    ServiceDescriptor::link("reddit", "Reddit", "https://www.reddit.com/user/{username}"),
    ServiceDescriptor::link("snapchat", "Snapchat", "https://www.snapchat.com/add/{username}"),
    ServiceDescriptor::link("twitch", "Twitch", "https://www.twitch.tv/{username}"),
    ServiceDescriptor::link("telegram", "Telegram", "https://t.me/{username}"),
];

static ALIASES: &[(&str, &str)] = &[("x", "twitter")];

/// Read-only view over the service table.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRegistry {
    services: &'static [ServiceDescriptor],
    aliases: &'static [(&'static str, &'static str)],
}

static BUILTIN: ServiceRegistry = ServiceRegistry {
    services: SERVICES,
    aliases: ALIASES,
};

impl Default for ServiceRegistry {
    fn default() -> Self {
        *Self::builtin()
    }
}

impl ServiceRegistry {
    pub fn builtin() -> &'static ServiceRegistry {
        &BUILTIN
    }

    /// Canonical descriptors in registration order. Aliases are not included.
    pub fn iter(&self) -> impl Iterator<Item = &'static ServiceDescriptor> {
        let services: &'static [ServiceDescriptor] = self.services;
        services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Case-insensitive, alias-aware lookup.
    pub fn lookup(&self, identifier: &str) -> Option<&'static ServiceDescriptor> {
        let wanted = identifier.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        let key = self
            .aliases
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, target)| *target)
            .unwrap_or(wanted.as_str());
        self.iter().find(|s| s.key == key)
    }

    pub fn list_natively_supported(&self) -> BTreeSet<&'static str> {
        self.iter()
            .filter(|s| s.natively_supported)
            .map(|s| s.key)
            .collect()
    }

    pub fn list_with_photo_support(&self) -> BTreeSet<&'static str> {
        self.iter()
            .filter(|s| s.has_photo_support())
            .map(|s| s.key)
            .collect()
    }

    /// Host of the profile template without a leading `www.`; empty when unknown.
    pub fn domain_of(&self, key: &str) -> String {
        self.lookup(key)
            .map(|s| template_domain(s.profile_url_template))
            .unwrap_or_default()
    }

    /// Display name for known services, otherwise the input capitalised.
    pub fn normalize_service_name(&self, name: &str) -> String {
        match self.lookup(name) {
            Some(descriptor) => descriptor.display_name.to_string(),
            None => capitalize(name.trim()),
        }
    }

    pub fn build_profile_url(&self, key: &str, username: &str) -> Option<String> {
        let descriptor = self.lookup(key)?;
        fill_template(descriptor.profile_url_template, username)
    }

    pub fn build_photo_url(&self, key: &str, username: &str) -> Option<String> {
        let descriptor = self.lookup(key)?;
        fill_template(descriptor.photo_url_template?, username)
    }

    pub fn build_photo_api_url(&self, key: &str, username: &str) -> Option<String> {
        let descriptor = self.lookup(key)?;
        fill_template(descriptor.photo_api_template?, username)
    }

    /// Every distinct profile domain, used to spot domain-like usernames.
    pub fn known_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self
            .iter()
            .map(|s| template_domain(s.profile_url_template))
            .filter(|d| !d.is_empty())
            .collect();
        domains.sort_unstable();
        domains.dedup();
        domains
    }
}

pub(crate) fn template_domain(template: &str) -> String {
    if template.is_empty() {
        return String::new();
    }
    match Url::parse(template) {
        Ok(url) => url
            .host_str()
            .map(strip_www)
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    }
}

pub(crate) fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn fill_template(template: &str, username: &str) -> Option<String> {
    if template.is_empty() {
        return None;
    }
    Some(template.replacen(PLACEHOLDER, username, 1))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
