use crate::core::registry::ServiceRegistry;
use crate::core::resolver::resolve_service_from_url;
use crate::domain::model::{Contact, LabeledUrl, ProfileRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MigrationDirection {
    /// Social profiles become labelled URLs.
    #[cfg_attr(feature = "cli", value(name = "links"))]
    ToLinks,
    /// URLs of natively supported services become social profiles.
    #[cfg_attr(feature = "cli", value(name = "native"))]
    ToNative,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub contact_id: String,
    pub migrated: Vec<String>,
    pub skipped: Vec<String>,
}

/// Display name of the service a URL points at, for auto-labelling.
pub fn label_for_url(registry: &ServiceRegistry, url: &str) -> Option<String> {
    let resolved = resolve_service_from_url(registry, url)?;
    registry
        .lookup(resolved.service)
        .map(|d| d.display_name.to_string())
}

/// The labelled URL equivalent of a social profile.
pub fn social_to_link(registry: &ServiceRegistry, profile: &ProfileRecord) -> Option<LabeledUrl> {
    let service = profile.service.as_deref()?.trim();
    let username = profile.username.as_deref()?.trim();
    if username.is_empty() {
        return None;
    }
    let descriptor = registry.lookup(service)?;
    let url = registry.build_profile_url(descriptor.key, username)?;
    Some(LabeledUrl {
        url,
        label: descriptor.display_name.to_string(),
    })
}

/// The social profile equivalent of a URL, for natively supported services only.
pub fn link_to_social(registry: &ServiceRegistry, url: &str) -> Option<ProfileRecord> {
    let resolved = resolve_service_from_url(registry, url)?;
    let descriptor = registry.lookup(resolved.service)?;
    if !descriptor.natively_supported {
        return None;
    }
    Some(ProfileRecord {
        service: Some(descriptor.display_name.to_string()),
        username: Some(resolved.username),
        url: Some(url.trim().to_string()),
    })
}

/// Move profiles between the social-profile and URL representations of a contact.
pub fn migrate(
    registry: &ServiceRegistry,
    contact: &mut Contact,
    direction: MigrationDirection,
) -> MigrationReport {
    let mut report = MigrationReport {
        contact_id: contact.id.clone(),
        ..Default::default()
    };

    match direction {
        MigrationDirection::ToLinks => {
            let socials = std::mem::take(&mut contact.socials);
            for profile in socials {
                match social_to_link(registry, &profile) {
                    Some(link) => {
                        if !contact.urls.iter().any(|u| u.url == link.url) {
                            contact.urls.push(link.clone());
                        }
                        report.migrated.push(link.label);
                    }
                    None => {
                        if !profile.is_blank() {
                            let service = profile.service.as_deref().unwrap_or_default();
                            report.skipped.push(registry.normalize_service_name(service));
                            contact.socials.push(profile);
                        }
                    }
                }
            }
        }
        MigrationDirection::ToNative => {
            let urls = std::mem::take(&mut contact.urls);
            for link in urls {
                let Some(profile) = link_to_social(registry, &link.url) else {
                    contact.urls.push(link);
                    continue;
                };
                let already_present = contact.socials.iter().any(|existing| {
                    existing
                        .service
                        .as_deref()
                        .zip(profile.service.as_deref())
                        .is_some_and(|(a, b)| a.eq_ignore_ascii_case(b))
                });
                if already_present {
                    report.skipped.push(profile.service.unwrap_or_default());
                    contact.urls.push(link);
                } else {
                    report.migrated.push(profile.service.clone().unwrap_or_default());
                    contact.socials.push(profile);
                }
            }
        }
    }

    tracing::debug!(
        contact = %report.contact_id,
        migrated = report.migrated.len(),
        skipped = report.skipped.len(),
        ?direction,
        "migrated profiles"
    );
    report
}
