use crate::core::phone;
use crate::core::registry::ServiceRegistry;
use crate::core::repair::ProfileRepairer;
use crate::core::{ConfigProvider, Contact, FixResult, Pipeline, ProfileRecord, Storage};
use crate::domain::model::{FixReport, OutcomeCounts, RepairOutcome, RepairReportRow};
use crate::utils::error::{NormalizerError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const FIXED_CONTACTS_FILE: &str = "fixed_contacts.json";
pub const FIX_REPORT_FILE: &str = "fix_report.json";
pub const REPAIR_REPORT_FILE: &str = "repair_report.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(NormalizerError::UnsupportedInputError {
                path: path.to_string(),
            }),
        }
    }
}

/// One social profile per row, grouped into contacts by `contact_id`.
#[derive(Debug, Deserialize)]
struct CsvProfileRow {
    contact_id: String,
    service: Option<String>,
    username: Option<String>,
    url: Option<String>,
}

/// Reads a contact export, normalizes phones, repairs social profiles and
/// writes the cleaned contacts plus a report.
pub struct FixPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    input_path: String,
    contact_filter: Option<String>,
    registry: &'static ServiceRegistry,
}

impl<S: Storage, C: ConfigProvider> FixPipeline<S, C> {
    pub fn new(storage: S, config: C, input_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            input_path: input_path.into(),
            contact_filter: None,
            registry: ServiceRegistry::builtin(),
        }
    }

    /// Restrict the run to a single contact id.
    pub fn with_contact(mut self, contact_id: Option<String>) -> Self {
        self.contact_filter = contact_id;
        self
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn fix_contact(
        &self,
        repairer: &ProfileRepairer<'_>,
        mut contact: Contact,
        report: &mut FixReport,
    ) -> Contact {
        for phone_entry in &mut contact.phones {
            let normalized = phone::normalize(&phone_entry.number, self.config.default_country_prefix());
            // whitespace trimming alone is not a normalization
            if normalized != phone_entry.number.trim() {
                tracing::debug!(contact = %contact.id, from = %phone_entry.number, to = %normalized, "normalized phone");
                report.phones_normalized += 1;
            }
            phone_entry.number = normalized;
        }

        let originals = std::mem::take(&mut contact.socials);
        for (before, repaired) in originals.iter().zip(repairer.repair_all(&originals)) {
            report.profiles.record(repaired.outcome);
            report.rows.push(report_row(&contact.id, before, repaired.outcome, &repaired.record));
            if repaired.outcome != RepairOutcome::Nullified {
                contact.socials.push(repaired.record);
            }
        }
        tracing::debug!(
            "{}: kept {} of {} profiles",
            contact.display_name(),
            contact.socials.len(),
            originals.len()
        );
        contact
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FixPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Contact>> {
        let format = InputFormat::from_path(&self.input_path)?;
        let data = self.storage.read_file(&self.input_path).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), self.input_path);

        let contacts = match format {
            InputFormat::Json => serde_json::from_slice::<Vec<Contact>>(&data)?,
            InputFormat::Csv => contacts_from_csv(&data)?,
        };

        match &self.contact_filter {
            Some(id) => {
                let selected: Vec<Contact> = contacts.into_iter().filter(|c| &c.id == id).collect();
                if selected.is_empty() {
                    return Err(NormalizerError::ContactNotFound { id: id.clone() });
                }
                Ok(selected)
            }
            None => Ok(contacts),
        }
    }

    async fn transform(&self, contacts: Vec<Contact>) -> Result<FixResult> {
        let repairer = ProfileRepairer::new(self.registry, self.config.repair_options());
        let mut report = FixReport {
            generated_at: chrono::Utc::now(),
            contacts: contacts.len(),
            phones_normalized: 0,
            profiles: OutcomeCounts::default(),
            rows: Vec::new(),
        };

        let contacts = contacts
            .into_iter()
            .map(|contact| self.fix_contact(&repairer, contact, &mut report))
            .collect();

        Ok(FixResult { contacts, report })
    }

    async fn load(&self, result: FixResult) -> Result<String> {
        let contacts_json = serde_json::to_vec_pretty(&result.contacts)?;
        self.storage
            .write_file(&self.output_file(FIXED_CONTACTS_FILE), &contacts_json)
            .await?;

        // output_formats only selects the extra reports
        if self.config.writes_format("json") {
            let report_json = serde_json::to_vec_pretty(&result.report)?;
            self.storage
                .write_file(&self.output_file(FIX_REPORT_FILE), &report_json)
                .await?;
        }

        if self.config.writes_format("csv") {
            let csv_data = report_csv(&result.report.rows)?;
            self.storage
                .write_file(&self.output_file(REPAIR_REPORT_FILE), &csv_data)
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}

pub fn contacts_from_csv(data: &[u8]) -> Result<Vec<Contact>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut contacts: Vec<Contact> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in reader.deserialize::<CsvProfileRow>() {
        let row = row?;
        let profile = ProfileRecord {
            service: row.service,
            username: row.username,
            url: row.url,
        };
        match positions.get(&row.contact_id) {
            Some(&index) => contacts[index].socials.push(profile),
            None => {
                positions.insert(row.contact_id.clone(), contacts.len());
                contacts.push(Contact {
                    id: row.contact_id,
                    socials: vec![profile],
                    ..Default::default()
                });
            }
        }
    }
    Ok(contacts)
}

fn report_csv(rows: &[RepairReportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| NormalizerError::ProcessingError {
            message: format!("Failed to finish CSV report: {}", e),
        })
}

fn report_row(
    contact_id: &str,
    before: &ProfileRecord,
    outcome: RepairOutcome,
    after: &ProfileRecord,
) -> RepairReportRow {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    RepairReportRow {
        contact_id: contact_id.to_string(),
        outcome,
        service_before: field(&before.service),
        username_before: field(&before.username),
        url_before: field(&before.url),
        service_after: field(&after.service),
        username_after: field(&after.username),
        url_after: field(&after.url),
    }
}
