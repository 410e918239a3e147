//! One function per CLI command. Each returns the JSON document the binary prints.

use crate::core::migrate::{self, MigrationDirection, MigrationReport};
use crate::core::phone;
use crate::core::registry::{ServiceDescriptor, ServiceRegistry};
use crate::core::repair::{ProfileRepairer, RepairOptions};
use crate::core::resolver::resolve_service_from_url;
use crate::core::{Contact, PhotoResolver, ProfileRecord, Storage};
use crate::utils::error::{NormalizerError, Result};
use crate::utils::validation;
use serde_json::{json, Value};
use std::path::Path;

pub const MIGRATED_CONTACTS_FILE: &str = "migrated_contacts.json";

pub fn phone(raw: &str, country_prefix: &str) -> Value {
    json!({
        "input": raw,
        "normalized": phone::normalize(raw, country_prefix),
    })
}

pub fn service_show(registry: &ServiceRegistry, name: &str) -> Result<&'static ServiceDescriptor> {
    registry
        .lookup(name)
        .ok_or_else(|| NormalizerError::UnknownService {
            name: name.to_string(),
        })
}

pub fn service_list(
    registry: &ServiceRegistry,
    native_only: bool,
    photos_only: bool,
) -> Vec<&'static ServiceDescriptor> {
    let native = registry.list_natively_supported();
    let photos = registry.list_with_photo_support();
    registry
        .iter()
        .filter(|d| !native_only || native.contains(d.key))
        .filter(|d| !photos_only || photos.contains(d.key))
        .collect()
}

pub fn url_resolve(registry: &ServiceRegistry, url: &str) -> Value {
    match resolve_service_from_url(registry, url) {
        Some(resolved) => json!({
            "url": url,
            "service": resolved.service,
            "username": resolved.username,
        }),
        None => json!({ "url": url, "service": null, "username": null }),
    }
}

pub fn url_build(registry: &ServiceRegistry, service: &str, username: &str) -> Result<Value> {
    let descriptor = service_show(registry, service)?;
    Ok(json!({
        "service": descriptor.key,
        "username": username,
        "url": registry.build_profile_url(descriptor.key, username),
    }))
}

pub fn url_label(registry: &ServiceRegistry, url: &str) -> Value {
    json!({
        "url": url,
        "label": migrate::label_for_url(registry, url),
    })
}

/// Photo lookup for a profile URL. The photo API is only called with `fetch`.
pub async fn photo(
    registry: &ServiceRegistry,
    resolver: &dyn PhotoResolver,
    url: &str,
    fetch: bool,
) -> Result<Value> {
    let resolved = resolve_service_from_url(registry, url).ok_or_else(|| {
        NormalizerError::UnknownService {
            name: url.to_string(),
        }
    })?;

    let photo_url = if fetch {
        resolver.resolve(resolved.service, &resolved.username).await?
    } else {
        registry.build_photo_url(resolved.service, &resolved.username)
    };

    Ok(json!({
        "url": url,
        "service": resolved.service,
        "username": resolved.username,
        "photoUrl": photo_url,
        "photoApiUrl": registry.build_photo_api_url(resolved.service, &resolved.username),
    }))
}

pub fn repair(
    registry: &ServiceRegistry,
    options: RepairOptions,
    service: Option<&str>,
    username: Option<&str>,
    url: Option<&str>,
) -> Value {
    let before = ProfileRecord::new(service, username, url);
    let repaired = ProfileRepairer::new(registry, options).repair(&before);
    json!({
        "before": before,
        "outcome": repaired.outcome,
        "after": repaired.record,
    })
}

/// Migrate every contact in a JSON export and write the result next to the other outputs.
pub async fn migrate_file<S: Storage>(
    storage: &S,
    registry: &ServiceRegistry,
    input_path: &str,
    output_dir: &str,
    direction: MigrationDirection,
    dry_run: bool,
) -> Result<Vec<MigrationReport>> {
    validation::validate_file_extensions("input", &[input_path.to_string()], &["json"])?;

    let data = storage.read_file(input_path).await?;
    let mut contacts: Vec<Contact> = serde_json::from_slice(&data)?;

    let reports: Vec<MigrationReport> = contacts
        .iter_mut()
        .map(|contact| migrate::migrate(registry, contact, direction))
        .collect();

    let migrated: usize = reports.iter().map(|r| r.migrated.len()).sum();
    tracing::info!("Migrated {} profiles across {} contacts", migrated, contacts.len());

    if !dry_run {
        let output = Path::new(output_dir).join(MIGRATED_CONTACTS_FILE);
        storage
            .write_file(&output.to_string_lossy(), &serde_json::to_vec_pretty(&contacts)?)
            .await?;
        tracing::info!("Output saved to: {}", output.display());
    }

    Ok(reports)
}
