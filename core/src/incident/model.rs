use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::incident::decode::decode_nested;

/// Weather at the time of the incident. The intake form starts on the
/// empty selection, so `Unspecified` round-trips as the empty string.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeatherCondition {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Clear,
    Cloudy,
    Rainy,
    Foggy,
    Windy,
    Hot,
    Cold,
}

/// Lifecycle status of an incident record.
///
/// The collaborator API carries two vocabularies on the same column:
/// the approval flow writes `Pending`/`Approved`/`Rejected` while the
/// assignment flow reads `active`/`In Progress`/`Completed`. One tagged
/// enum covers the union; the raw strings are preserved on the wire and
/// no silent unification is applied between the two flows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IncidentStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl IncidentStatus {
    /// Decode a raw status string, defaulting to `Pending` when the field
    /// is absent or carries a value outside both vocabularies.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("Approved") => IncidentStatus::Approved,
            Some("Rejected") => IncidentStatus::Rejected,
            Some("active") => IncidentStatus::Active,
            Some("In Progress") => IncidentStatus::InProgress,
            Some("Completed") => IncidentStatus::Completed,
            _ => IncidentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "Pending",
            IncidentStatus::Approved => "Approved",
            IncidentStatus::Rejected => "Rejected",
            IncidentStatus::Active => "active",
            IncidentStatus::InProgress => "In Progress",
            IncidentStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurred/count pair of the incident classification grid.
/// The flag and the count are independent: a cleared flag does not zero
/// the count (see DESIGN.md).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeCount {
    pub occurred: bool,
    pub count: u32,
}

/// The seven independent incident categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Injury,
    PropertyDamage,
    Fire,
    NearMiss,
    Environment,
    Fatality,
    Other,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 7] = [
        IncidentKind::Injury,
        IncidentKind::PropertyDamage,
        IncidentKind::Fire,
        IncidentKind::NearMiss,
        IncidentKind::Environment,
        IncidentKind::Fatality,
        IncidentKind::Other,
    ];
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub injury: TypeCount,
    pub property_damage: TypeCount,
    pub fire: TypeCount,
    pub near_miss: TypeCount,
    pub environment: TypeCount,
    pub fatality: TypeCount,
    pub other: TypeCount,
}

impl Classification {
    pub fn get(&self, kind: IncidentKind) -> TypeCount {
        *self.slot(kind)
    }

    pub fn slot_mut(&mut self, kind: IncidentKind) -> &mut TypeCount {
        match kind {
            IncidentKind::Injury => &mut self.injury,
            IncidentKind::PropertyDamage => &mut self.property_damage,
            IncidentKind::Fire => &mut self.fire,
            IncidentKind::NearMiss => &mut self.near_miss,
            IncidentKind::Environment => &mut self.environment,
            IncidentKind::Fatality => &mut self.fatality,
            IncidentKind::Other => &mut self.other,
        }
    }

    fn slot(&self, kind: IncidentKind) -> &TypeCount {
        match kind {
            IncidentKind::Injury => &self.injury,
            IncidentKind::PropertyDamage => &self.property_damage,
            IncidentKind::Fire => &self.fire,
            IncidentKind::NearMiss => &self.near_miss,
            IncidentKind::Environment => &self.environment,
            IncidentKind::Fatality => &self.fatality,
            IncidentKind::Other => &self.other,
        }
    }
}

/// One injured-person entry. Every field stays free text; the record is
/// transcribed from paper forms and gate passes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id_no_gate_pass_no: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub contact_number: String,
}

/// Descriptive record for an uploaded file. Binary content travels on a
/// separate path; only the metadata is part of the incident payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentMeta {
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub mime_type: String,
}

impl AttachmentMeta {
    pub fn is_empty(&self) -> bool {
        self.original_name.is_empty() && self.size == 0 && self.mime_type.is_empty()
    }
}

/// A full incident record as served by the collaborator API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IncidentRecord {
    #[serde(rename = "IncidentID", skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    #[serde(rename = "IncidentDate", default)]
    pub incident_date: String,
    #[serde(rename = "IncidentTime", default)]
    pub incident_time: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "WeatherCondition", default)]
    pub weather_condition: String,
    #[serde(rename = "HTPLShiftInCharge", default)]
    pub htpl_shift_in_charge: String,
    #[serde(rename = "ContractorSupervisor", default)]
    pub contractor_supervisor: String,
    #[serde(rename = "IncidentReportedBy", default)]
    pub incident_reported_by: String,
    #[serde(rename = "ReportPreparedBy", default)]
    pub report_prepared_by: String,
    #[serde(rename = "IncidentTitle", default)]
    pub incident_title: String,
    #[serde(rename = "IncidentSummary", default)]
    pub incident_summary: String,
    #[serde(rename = "TypeInjury", default)]
    pub type_injury: bool,
    #[serde(rename = "CountInjury", default)]
    pub count_injury: u32,
    #[serde(rename = "TypePropertyDamage", default)]
    pub type_property_damage: bool,
    #[serde(rename = "CountPropertyDamage", default)]
    pub count_property_damage: u32,
    #[serde(rename = "TypeFire", default)]
    pub type_fire: bool,
    #[serde(rename = "CountFire", default)]
    pub count_fire: u32,
    #[serde(rename = "TypeNearMiss", default)]
    pub type_near_miss: bool,
    #[serde(rename = "CountNearMiss", default)]
    pub count_near_miss: u32,
    #[serde(rename = "TypeEnvironment", default)]
    pub type_environment: bool,
    #[serde(rename = "CountEnvironment", default)]
    pub count_environment: u32,
    #[serde(rename = "TypeFatality", default)]
    pub type_fatality: bool,
    #[serde(rename = "CountFatality", default)]
    pub count_fatality: u32,
    #[serde(rename = "TypeOther", default)]
    pub type_other: bool,
    #[serde(rename = "CountOther", default)]
    pub count_other: u32,
    #[serde(rename = "InjuredHTPLEmployees", default)]
    pub injured_htpl_employees: Vec<Person>,
    #[serde(rename = "InjuredContractWorkers", default)]
    pub injured_contract_workers: Vec<Person>,
    #[serde(rename = "InjuredVisitors", default)]
    pub injured_visitors: Vec<Person>,
    #[serde(rename = "UploadedFiles", default)]
    pub uploaded_files: Vec<AttachmentMeta>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

impl IncidentRecord {
    /// Decode a stored record column by column. Deployments disagree on
    /// column types (list columns as JSON text, numeric text columns),
    /// so one mistyped column degrades to its default instead of
    /// sinking the whole record.
    pub fn from_value(raw: &Value) -> Self {
        IncidentRecord {
            incident_id: raw
                .get("IncidentID")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            incident_date: text_column(raw, "IncidentDate"),
            incident_time: text_column(raw, "IncidentTime"),
            location: text_column(raw, "Location"),
            weather_condition: text_column(raw, "WeatherCondition"),
            htpl_shift_in_charge: text_column(raw, "HTPLShiftInCharge"),
            contractor_supervisor: text_column(raw, "ContractorSupervisor"),
            incident_reported_by: text_column(raw, "IncidentReportedBy"),
            report_prepared_by: text_column(raw, "ReportPreparedBy"),
            incident_title: text_column(raw, "IncidentTitle"),
            incident_summary: text_column(raw, "IncidentSummary"),
            type_injury: flag_column(raw, "TypeInjury"),
            count_injury: count_column(raw, "CountInjury"),
            type_property_damage: flag_column(raw, "TypePropertyDamage"),
            count_property_damage: count_column(raw, "CountPropertyDamage"),
            type_fire: flag_column(raw, "TypeFire"),
            count_fire: count_column(raw, "CountFire"),
            type_near_miss: flag_column(raw, "TypeNearMiss"),
            count_near_miss: count_column(raw, "CountNearMiss"),
            type_environment: flag_column(raw, "TypeEnvironment"),
            count_environment: count_column(raw, "CountEnvironment"),
            type_fatality: flag_column(raw, "TypeFatality"),
            count_fatality: count_column(raw, "CountFatality"),
            type_other: flag_column(raw, "TypeOther"),
            count_other: count_column(raw, "CountOther"),
            injured_htpl_employees: decode_nested(
                "InjuredHTPLEmployees",
                raw.get("InjuredHTPLEmployees"),
            ),
            injured_contract_workers: decode_nested(
                "InjuredContractWorkers",
                raw.get("InjuredContractWorkers"),
            ),
            injured_visitors: decode_nested("InjuredVisitors", raw.get("InjuredVisitors")),
            uploaded_files: decode_nested("UploadedFiles", raw.get("UploadedFiles")),
            status: raw
                .get("Status")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }
    }
}

fn text_column(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn flag_column(raw: &Value, key: &str) -> bool {
    raw.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn count_column(raw: &Value, key: &str) -> u32 {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0).min(u64::from(u32::MAX)) as u32,
        Some(Value::String(s)) => clamp_count(s),
        _ => 0,
    }
}

/// Parse a user-entered count field the way the forms do: integer prefix
/// of the input, floored, clamped to zero. Anything non-numeric is zero.
pub fn clamp_count(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let negative = trimmed.starts_with('-');
    let digits: String = trimmed
        .trim_start_matches(['-', '+'])
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Resize an injured-person list to `n` entries, preserving existing
/// entries by index and appending blank entries past the old length.
pub fn resize_person_list(list: &mut Vec<Person>, n: usize) {
    list.resize_with(n, Person::default);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

/// Priority bucket used by the approval table badge: more than one
/// casualty is the high tier, exactly one is medium.
pub fn priority_for_count(count: u32) -> PriorityTier {
    if count > 1 {
        PriorityTier::High
    } else if count == 1 {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    Elevated,
    Normal,
}

pub fn risk_for_flag(occurred: bool) -> RiskTier {
    if occurred {
        RiskTier::Elevated
    } else {
        RiskTier::Normal
    }
}
