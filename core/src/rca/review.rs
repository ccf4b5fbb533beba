//! Investigator readout for an assigned incident.
//!
//! The details endpoint joins the incident row with its RCA report and
//! corrective actions. Every list column may arrive as JSON text, so
//! everything nested runs through the defensive decode; one bad column
//! blanks that panel only.

use serde_json::Value;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::api::ApiGateway;
use crate::error::CoreResult;
use crate::incident::decode::decode_nested;
use crate::incident::model::{AttachmentMeta, Person};
use crate::rca::model::{ChronologyEntry, RcaAttachment, WhyEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    General,
    Types,
    Injured,
    Chronology,
    Files,
    Causes,
    Other,
    Why,
    Actions,
    Assignment,
    Updates,
    Communication,
}

impl Section {
    pub const ALL: [Section; 12] = [
        Section::General,
        Section::Types,
        Section::Injured,
        Section::Chronology,
        Section::Files,
        Section::Causes,
        Section::Other,
        Section::Why,
        Section::Actions,
        Section::Assignment,
        Section::Updates,
        Section::Communication,
    ];
}

/// A corrective action as stored on the joined record. Column names
/// here are the store's, `DocReff` spelling included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewAction {
    pub action: String,
    pub status: String,
    pub doc_ref: String,
    pub target_date: String,
    pub responsible_id: String,
    pub attachments: Vec<RcaAttachment>,
}

impl ReviewAction {
    fn from_value(value: &Value) -> Self {
        ReviewAction {
            action: text(value, "Action"),
            status: text(value, "Status"),
            doc_ref: text(value, "DocReff"),
            target_date: text(value, "TargetDate"),
            responsible_id: text(value, "ResponsibleId"),
            attachments: decode_nested("AttachmentsAssign", value.get("AttachmentsAssign")),
        }
    }
}

fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewRecord {
    pub incident_id: String,
    pub incident_date: String,
    pub incident_time: String,
    pub location: String,
    pub incident_title: String,
    pub incident_summary: String,
    pub status: String,
    pub injured_htpl_employees: Vec<Person>,
    pub injured_contract_workers: Vec<Person>,
    pub injured_visitors: Vec<Person>,
    pub uploaded_files: Vec<AttachmentMeta>,
    pub chronology: Vec<ChronologyEntry>,
    pub man_causes: Vec<String>,
    pub machine_causes: Vec<String>,
    pub method_causes: Vec<String>,
    pub mother_nature_causes: Vec<String>,
    pub why_analysis: Vec<WhyEntry>,
    pub actions: Vec<ReviewAction>,
}

impl ReviewRecord {
    pub fn from_value(raw: &Value) -> Self {
        let actions = match raw.get("Actions") {
            Some(Value::Array(items)) => items.iter().map(ReviewAction::from_value).collect(),
            _ => Vec::new(),
        };
        ReviewRecord {
            incident_id: text(raw, "IncidentID"),
            incident_date: text(raw, "IncidentDate"),
            incident_time: text(raw, "IncidentTime"),
            location: text(raw, "Location"),
            incident_title: text(raw, "IncidentTitle"),
            incident_summary: text(raw, "IncidentSummary"),
            status: text(raw, "Status"),
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
            chronology: decode_nested("Chronology", raw.get("Chronology")),
            man_causes: decode_nested("ManCauses", raw.get("ManCauses")),
            machine_causes: decode_nested("MachineCauses", raw.get("MachineCauses")),
            method_causes: decode_nested("MethodCauses", raw.get("MethodCauses")),
            mother_nature_causes: decode_nested(
                "MotherNatureCauses",
                raw.get("MotherNatureCauses"),
            ),
            why_analysis: decode_nested("WhyAnalysis", raw.get("WhyAnalysis")),
            actions,
        }
    }
}

/// Local investigation-progress note. Lives in the view only; the
/// collaborator has no endpoint for these yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityUpdate {
    pub id: u64,
    pub date: String,
    pub time: String,
    pub status: String,
    pub activity: String,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunicationEntry {
    pub id: u64,
    pub date: String,
    pub time: String,
    pub from: String,
    pub to: String,
    pub message: String,
    pub channel: String,
}

fn stamp(now: OffsetDateTime) -> (String, String) {
    let date_fmt = format_description!("[year]-[month]-[day]");
    let time_fmt = format_description!("[hour repr:12 padding:zero]:[minute] [period]");
    let date = now.format(&date_fmt).unwrap_or_default();
    let time = now.format(&time_fmt).unwrap_or_default();
    (date, time)
}

#[derive(Debug, Default)]
pub struct ReviewView {
    pub record: ReviewRecord,
    collapsed: Vec<Section>,
    updates: Vec<ActivityUpdate>,
    communication: Vec<CommunicationEntry>,
}

impl ReviewView {
    pub fn load<G: ApiGateway>(gateway: &G, incident_id: &str) -> CoreResult<Self> {
        let raw = gateway.get_assigned_incident_details(incident_id)?;
        Ok(ReviewView {
            record: ReviewRecord::from_value(&raw),
            ..ReviewView::default()
        })
    }

    /// Panels start open and remember only the ones the reader closed.
    pub fn is_open(&self, section: Section) -> bool {
        !self.collapsed.contains(&section)
    }

    pub fn toggle(&mut self, section: Section) {
        if let Some(pos) = self.collapsed.iter().position(|s| *s == section) {
            self.collapsed.remove(pos);
        } else {
            self.collapsed.push(section);
        }
    }

    pub fn updates(&self) -> &[ActivityUpdate] {
        &self.updates
    }

    pub fn communication(&self) -> &[CommunicationEntry] {
        &self.communication
    }

    /// Append a progress note. Blank activity text is rejected; the log
    /// is append-only with ids issued in sequence.
    pub fn add_update(
        &mut self,
        now: OffsetDateTime,
        activity: &str,
        comments: &str,
        status: &str,
    ) -> bool {
        if activity.trim().is_empty() {
            return false;
        }
        let (date, time) = stamp(now);
        self.updates.push(ActivityUpdate {
            id: self.updates.len() as u64 + 1,
            date,
            time,
            status: status.to_string(),
            activity: activity.to_string(),
            comments: comments.to_string(),
        });
        true
    }

    /// Append a communication entry. Both the recipient and the message
    /// must be non-blank.
    pub fn add_communication(
        &mut self,
        now: OffsetDateTime,
        from: &str,
        to: &str,
        message: &str,
        channel: &str,
    ) -> bool {
        if to.trim().is_empty() || message.trim().is_empty() {
            return false;
        }
        let (date, time) = stamp(now);
        self.communication.push(CommunicationEntry {
            id: self.communication.len() as u64 + 1,
            date,
            time,
            from: from.to_string(),
            to: to.to_string(),
            message: message.to_string(),
            channel: channel.to_string(),
        });
        true
    }
}
