use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A social profile as observed on a contact. Any field may be missing or garbage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ProfileRecord {
    pub fn new(service: Option<&str>, username: Option<&str>, url: Option<&str>) -> Self {
        Self {
            service: service.map(str::to_string),
            username: username.map(str::to_string),
            url: url.map(str::to_string),
        }
    }

    pub fn is_blank(&self) -> bool {
        [&self.service, &self.username, &self.url]
            .iter()
            .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairOutcome {
    Nullified,
    Rewritten,
    Preserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairedProfile {
    pub outcome: RepairOutcome,
    pub record: ProfileRecord,
}

fn default_phone_label() -> String {
    "mobile".to_string()
}

fn default_email_label() -> String {
    "home".to_string()
}

fn default_url_label() -> String {
    "homepage".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub number: String,
    #[serde(default = "default_phone_label")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub address: String,
    #[serde(default = "default_email_label")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUrl {
    pub url: String,
    #[serde(default = "default_url_label")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub phones: Vec<Phone>,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub urls: Vec<LabeledUrl>,
    #[serde(default)]
    pub socials: Vec<ProfileRecord>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.organization.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub nullified: usize,
    pub rewritten: usize,
    pub preserved: usize,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: RepairOutcome) {
        match outcome {
            RepairOutcome::Nullified => self.nullified += 1,
            RepairOutcome::Rewritten => self.rewritten += 1,
            RepairOutcome::Preserved => self.preserved += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.nullified + self.rewritten + self.preserved
    }
}

/// One repaired profile row, flattened for the CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReportRow {
    pub contact_id: String,
    pub outcome: RepairOutcome,
    pub service_before: String,
    pub username_before: String,
    pub url_before: String,
    pub service_after: String,
    pub username_after: String,
    pub url_after: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub generated_at: DateTime<Utc>,
    pub contacts: usize,
    pub phones_normalized: usize,
    pub profiles: OutcomeCounts,
    #[serde(skip)]
    pub rows: Vec<RepairReportRow>,
}

/// Output of the fix transform: repaired contacts plus the report describing them.
#[derive(Debug, Clone)]
pub struct FixResult {
    pub contacts: Vec<Contact>,
    pub report: FixReport,
}
