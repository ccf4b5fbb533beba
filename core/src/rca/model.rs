//! Wire types for root-cause analysis reports.
//!
//! The RCA endpoint speaks camelCase, unlike the incident store's
//! PascalCase columns. The serde renames here are the contract.

use serde::{Deserialize, Serialize};

/// Document header constants printed on every RCA report.
pub const DOC_NO: &str = "HTPL/OHS/10";
pub const EFF_DATE: &str = "2023-10-03";
pub const REVISION_NO: &str = "00";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChronologyEntry {
    #[serde(rename = "dateTime", default)]
    pub date_time: String,
    #[serde(default)]
    pub activity: String,
}

/// One row of the five-why table. The label is fixed; only the
/// description is editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhyEntry {
    pub why: String,
    #[serde(default)]
    pub description: String,
}

pub fn blank_why_analysis() -> Vec<WhyEntry> {
    (1..=5)
        .map(|n| WhyEntry {
            why: format!("Why-{n:02}"),
            description: String::new(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionStatus {
    #[default]
    Open,
    Close,
}

/// Attachment metadata on an action row. Field names differ from the
/// incident-side shape; this endpoint grew separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RcaAttachment {
    #[serde(rename = "originalName", default)]
    pub original_name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mimetype: String,
}

impl RcaAttachment {
    pub fn is_empty(&self) -> bool {
        self.original_name.is_empty() && self.size == 0 && self.mimetype.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionItem {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub status: ActionStatus,
    #[serde(rename = "responsibleId", default)]
    pub responsible_id: String,
    #[serde(rename = "responsibleName", default)]
    pub responsible_name: String,
    #[serde(rename = "targetDate", default)]
    pub target_date: String,
    #[serde(rename = "docRef", default)]
    pub doc_ref: String,
    #[serde(rename = "attachmentsAssign", default)]
    pub attachments_assign: Vec<RcaAttachment>,
}

/// A user who can be made responsible for a corrective action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponsibleUser {
    #[serde(rename = "UserID")]
    pub user_id: u32,
    #[serde(rename = "UserName")]
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RcaPayload {
    pub id: String,
    #[serde(rename = "docNo")]
    pub doc_no: String,
    #[serde(rename = "effDate")]
    pub eff_date: String,
    #[serde(rename = "revisionNo")]
    pub revision_no: String,
    #[serde(rename = "cftMembers")]
    pub cft_members: String,
    #[serde(rename = "pastIncident")]
    pub past_incident: YesNo,
    #[serde(rename = "pastIncidentDetails")]
    pub past_incident_details: String,
    #[serde(rename = "incidentSummary")]
    pub incident_summary: String,
    pub chronology: Vec<ChronologyEntry>,
    pub facts: String,
    pub evidence: String,
    #[serde(rename = "driverStatement")]
    pub driver_statement: String,
    #[serde(rename = "supervisorStatement")]
    pub supervisor_statement: String,
    #[serde(rename = "manCauses")]
    pub man_causes: Vec<String>,
    #[serde(rename = "machineCauses")]
    pub machine_causes: Vec<String>,
    #[serde(rename = "methodCauses")]
    pub method_causes: Vec<String>,
    #[serde(rename = "motherNatureCauses")]
    pub mother_nature_causes: Vec<String>,
    #[serde(rename = "probableCause")]
    pub probable_cause: String,
    #[serde(rename = "whyAnalysis")]
    pub why_analysis: Vec<WhyEntry>,
    #[serde(rename = "actualRootCause")]
    pub actual_root_cause: String,
    #[serde(rename = "correctiveAction")]
    pub corrective_action: String,
    #[serde(rename = "preventiveAction")]
    pub preventive_action: String,
    pub actions: Vec<ActionItem>,
    #[serde(rename = "preparedBy")]
    pub prepared_by: String,
    #[serde(rename = "preparedByUserId")]
    pub prepared_by_user_id: String,
}
