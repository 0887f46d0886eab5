use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

/// Opaque project identifier assigned by the backend.
///
/// The service has returned both strings and integers for this field, so both
/// are accepted and normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project_id")]
    pub id: ProjectId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Project {
    /// Name shown in headers, falling back to the id when the backend sent none.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Project {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

/// One exchange from the backend's chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

// An explicit `null` is treated like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    #[default]
    Low,
}

impl Severity {
    /// Series order used by every chart.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unrecognized severities are ranked as Low.
impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Critical" => Severity::Critical,
            "High" => Severity::High,
            "Medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

fn default_factor() -> String {
    "Unknown".to_string()
}

fn default_description() -> String {
    "No description".to_string()
}

fn default_probability() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_factor")]
    pub factor: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_probability")]
    pub probability: f64,
}

impl RiskRecord {
    pub fn new(
        severity: Severity,
        factor: impl Into<String>,
        description: impl Into<String>,
        probability: f64,
    ) -> Self {
        Self {
            severity,
            factor: factor.into(),
            description: description.into(),
            probability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MilestoneStatus {
    Completed,
    InProgress,
    NotStarted,
    #[default]
    Unknown,
}

impl From<String> for MilestoneStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "completed" => MilestoneStatus::Completed,
            "in_progress" => MilestoneStatus::InProgress,
            "not_started" => MilestoneStatus::NotStarted,
            _ => MilestoneStatus::Unknown,
        }
    }
}

fn default_milestone_name() -> String {
    "Unnamed".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    #[serde(default = "default_milestone_name")]
    pub name: String,
    #[serde(with = "iso_date")]
    pub planned_date: Date,
    #[serde(default, with = "iso_date::option")]
    pub actual_date: Option<Date>,
    #[serde(default)]
    pub status: MilestoneStatus,
}

/// Risk counts per severity on one reporting date.
///
/// Counts are keyed by the raw severity label so that unrecognized labels
/// never overwrite a known series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskHistoryPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default)]
    pub counts: BTreeMap<String, u32>,
}

impl RiskHistoryPoint {
    pub fn count(&self, severity: Severity) -> u32 {
        self.counts.get(severity.as_str()).copied().unwrap_or(0)
    }
}

/// Which of the three chat-initialization inputs a file fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    Employee,
    Project,
    Financial,
}

impl FileRole {
    pub const ALL: [FileRole; 3] = [FileRole::Employee, FileRole::Project, FileRole::Financial];

    /// Multipart field name expected by the chat-init endpoint.
    pub fn field_name(self) -> &'static str {
        match self {
            FileRole::Employee => "employee_file",
            FileRole::Project => "project_file",
            FileRole::Financial => "financial_file",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileRole::Employee => "Employee Data (CSV)",
            FileRole::Project => "Project Data (CSV)",
            FileRole::Financial => "Financial Data (CSV)",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// An uploaded file, treated as an opaque named byte payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// The three validated inputs for chat initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUploads {
    pub employee: Upload,
    pub project: Upload,
    pub financial: Upload,
}

impl ChatUploads {
    pub fn get(&self, role: FileRole) -> &Upload {
        match role {
            FileRole::Employee => &self.employee,
            FileRole::Project => &self.project,
            FileRole::Financial => &self.financial,
        }
    }
}

/// `YYYY-MM-DD` (de)serialization for [`Date`] fields.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::{Date, macros::format_description};

    pub fn parse(value: &str) -> Result<Date, time::error::Parse> {
        Date::parse(value, format_description!("[year]-[month]-[day]"))
    }

    pub fn format(date: &Date) -> Result<String, time::error::Format> {
        date.format(format_description!("[year]-[month]-[day]"))
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let formatted = format(date).map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => {
                    parse(&raw).map(Some).map_err(D::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}
