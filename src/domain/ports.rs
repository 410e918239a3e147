use crate::core::repair::RepairOptions;
use crate::domain::model::{Contact, FixResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn default_country_prefix(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn repair_options(&self) -> RepairOptions;

    fn writes_format(&self, format: &str) -> bool {
        self.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Contact>>;
    async fn transform(&self, contacts: Vec<Contact>) -> Result<FixResult>;
    async fn load(&self, result: FixResult) -> Result<String>;
}

/// Finds a profile photo for a `(service, username)` pair.
#[async_trait]
pub trait PhotoResolver: Send + Sync {
    async fn resolve(&self, service: &str, username: &str) -> Result<Option<String>>;
}
