use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct FixEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> FixEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting contact fix run");

        let contacts = self.pipeline.extract().await?;
        tracing::info!("Extracted {} contacts", contacts.len());

        let result = self.pipeline.transform(contacts).await?;
        let profiles = &result.report.profiles;
        tracing::info!(
            rewritten = profiles.rewritten,
            preserved = profiles.preserved,
            nullified = profiles.nullified,
            phones = result.report.phones_normalized,
            "Repaired {} profiles",
            profiles.total()
        );

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
