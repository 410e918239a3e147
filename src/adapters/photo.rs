use crate::core::registry::ServiceRegistry;
use crate::core::PhotoResolver;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const AVATAR_FIELDS: &[&str] = &["avatar_url", "avatar"];

/// Resolves profile photos from registry templates, calling the service's
/// JSON API only when no direct image URL is known.
pub struct HttpPhotoResolver {
    client: Client,
    registry: &'static ServiceRegistry,
}

impl HttpPhotoResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("contact-normalizer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            registry: ServiceRegistry::builtin(),
        })
    }

    /// GET a profile API endpoint and pull the avatar URL out of the response.
    pub async fn fetch_avatar(&self, api_url: &str) -> Result<Option<String>> {
        tracing::debug!("Requesting photo API: {}", api_url);
        let response = self
            .client
            .get(api_url)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let avatar = avatar_from_json(&body);
        if avatar.is_none() {
            tracing::warn!("No avatar field in response from {}", api_url);
        }
        Ok(avatar)
    }
}

#[async_trait]
impl PhotoResolver for HttpPhotoResolver {
    async fn resolve(&self, service: &str, username: &str) -> Result<Option<String>> {
        if let Some(photo_url) = self.registry.build_photo_url(service, username) {
            return Ok(Some(photo_url));
        }
        match self.registry.build_photo_api_url(service, username) {
            Some(api_url) => self.fetch_avatar(&api_url).await,
            None => Ok(None),
        }
    }
}

fn avatar_from_json(value: &Value) -> Option<String> {
    match value {
        // list endpoints (GitLab) return the matching user first
        Value::Array(items) => items.first().and_then(avatar_from_json),
        Value::Object(map) => AVATAR_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_avatar_fields() {
        assert_eq!(
            avatar_from_json(&json!({"login": "octocat", "avatar_url": "https://a/1.png"})).as_deref(),
            Some("https://a/1.png")
        );
        assert_eq!(
            avatar_from_json(&json!({"handle": "jay.bsky.team", "avatar": "https://cdn/av.jpg"})).as_deref(),
            Some("https://cdn/av.jpg")
        );
        assert_eq!(
            avatar_from_json(&json!([{"username": "jdoe", "avatar_url": "https://gl/av.png"}])).as_deref(),
            Some("https://gl/av.png")
        );
        assert_eq!(avatar_from_json(&json!({"avatar_url": ""})), None);
        assert_eq!(avatar_from_json(&json!([])), None);
        assert_eq!(avatar_from_json(&json!("nope")), None);
    }

    #[test]
    fn direct_photo_urls_skip_the_network() {
        let resolver = HttpPhotoResolver::new(Duration::from_secs(1)).unwrap();
        let photo = tokio_test::block_on(resolver.resolve("github", "octocat")).unwrap();
        assert_eq!(photo.as_deref(), Some("https://github.com/octocat.png"));

        let photo = tokio_test::block_on(resolver.resolve("linkedin", "jdoe")).unwrap();
        assert_eq!(photo, None);
    }
}
