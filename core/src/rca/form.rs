//! Root-cause analysis worksheet.

use tracing::{debug, warn};

use crate::api::ApiGateway;
use crate::error::CoreResult;
use crate::incident::decode::decode_nested;
use crate::incident::model::AttachmentMeta;
use crate::rca::catalog::CauseCategory;
use crate::rca::model::{
    blank_why_analysis, ActionItem, ChronologyEntry, RcaAttachment, RcaPayload, ResponsibleUser,
    WhyEntry, YesNo, DOC_NO, EFF_DATE, REVISION_NO,
};
use crate::session::{KeyValueStore, SessionStore};

/// Read-only incident context shown above the worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentContext {
    pub incident_id: String,
    pub occurred_at: String,
    pub summary: String,
    pub uploaded_files: Vec<AttachmentMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcaSubmit {
    Accepted,
    Failed,
}

#[derive(Debug, Default)]
pub struct RcaForm {
    pub context: IncidentContext,
    pub cft_members: String,
    past_incident: YesNo,
    pub past_incident_details: String,
    chronology: Vec<ChronologyEntry>,
    pub facts: String,
    pub evidence: String,
    pub driver_statement: String,
    pub supervisor_statement: String,
    man_causes: Vec<String>,
    machine_causes: Vec<String>,
    method_causes: Vec<String>,
    mother_nature_causes: Vec<String>,
    pub probable_cause: String,
    why_analysis: Vec<WhyEntry>,
    pub actual_root_cause: String,
    pub corrective_action: String,
    pub preventive_action: String,
    actions: Vec<ActionItem>,
    responsible_options: Vec<ResponsibleUser>,
    toast: Option<String>,
}

impl RcaForm {
    /// Pull the incident and the responsible-user roster, then seed the
    /// worksheet. A roster fetch failure degrades to an empty dropdown
    /// rather than blocking the form.
    pub fn load<G: ApiGateway>(gateway: &G, incident_id: &str) -> CoreResult<Self> {
        let raw = gateway.get_incident(incident_id)?;
        let responsible_options = match gateway.list_responsible_users() {
            Ok(users) => users,
            Err(err) => {
                warn!(%err, "responsible user roster unavailable");
                Vec::new()
            }
        };
        let date = raw
            .get("IncidentDate")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let time = raw
            .get("IncidentTime")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let context = IncidentContext {
            incident_id: incident_id.to_string(),
            occurred_at: format!("{date} {time}").trim().to_string(),
            summary: raw
                .get("IncidentSummary")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            uploaded_files: decode_nested("UploadedFiles", raw.get("UploadedFiles")),
        };
        Ok(RcaForm {
            chronology: vec![ChronologyEntry {
                date_time: context.occurred_at.clone(),
                activity: String::new(),
            }],
            why_analysis: blank_why_analysis(),
            actions: vec![ActionItem::default()],
            responsible_options,
            context,
            ..RcaForm::default()
        })
    }

    pub fn past_incident(&self) -> YesNo {
        self.past_incident
    }

    /// Switching to `No` disables the details box but keeps its text, so
    /// flipping back does not lose what was typed.
    pub fn set_past_incident(&mut self, value: YesNo) {
        self.past_incident = value;
    }

    pub fn details_enabled(&self) -> bool {
        self.past_incident == YesNo::Yes
    }

    pub fn selected_causes(&self, category: CauseCategory) -> &[String] {
        match category {
            CauseCategory::Man => &self.man_causes,
            CauseCategory::Machine => &self.machine_causes,
            CauseCategory::Method => &self.method_causes,
            CauseCategory::MotherNature => &self.mother_nature_causes,
        }
    }

    /// Check or uncheck one cause. Unchecking removes it in place;
    /// re-checking appends at the end, so selection order is submission
    /// order.
    pub fn toggle_cause(&mut self, category: CauseCategory, cause: &str) {
        let list = match category {
            CauseCategory::Man => &mut self.man_causes,
            CauseCategory::Machine => &mut self.machine_causes,
            CauseCategory::Method => &mut self.method_causes,
            CauseCategory::MotherNature => &mut self.mother_nature_causes,
        };
        if let Some(pos) = list.iter().position(|c| c == cause) {
            list.remove(pos);
        } else {
            list.push(cause.to_string());
        }
    }

    pub fn chronology(&self) -> &[ChronologyEntry] {
        &self.chronology
    }

    pub fn add_chronology_entry(&mut self) {
        self.chronology.push(ChronologyEntry::default());
    }

    /// Entry zero carries the incident timestamp and cannot be removed.
    pub fn remove_chronology_entry(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.chronology.len() {
            return false;
        }
        self.chronology.remove(index);
        true
    }

    pub fn set_chronology_activity(&mut self, index: usize, activity: &str) {
        if let Some(entry) = self.chronology.get_mut(index) {
            entry.activity = activity.to_string();
        }
    }

    /// The first entry's timestamp is read-only incident context.
    pub fn set_chronology_date_time(&mut self, index: usize, date_time: &str) -> bool {
        if index == 0 {
            return false;
        }
        match self.chronology.get_mut(index) {
            Some(entry) => {
                entry.date_time = date_time.to_string();
                true
            }
            None => false,
        }
    }

    pub fn why_analysis(&self) -> &[WhyEntry] {
        &self.why_analysis
    }

    /// Only the description column of the five-why table is writable.
    pub fn set_why(&mut self, index: usize, description: &str) {
        if let Some(row) = self.why_analysis.get_mut(index) {
            row.description = description.to_string();
        }
    }

    pub fn actions(&self) -> &[ActionItem] {
        &self.actions
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut ActionItem> {
        self.actions.get_mut(index)
    }

    pub fn add_action(&mut self) {
        self.actions.push(ActionItem::default());
    }

    pub fn remove_action(&mut self, index: usize) -> bool {
        if index >= self.actions.len() {
            return false;
        }
        self.actions.remove(index);
        true
    }

    pub fn responsible_options(&self) -> &[ResponsibleUser] {
        &self.responsible_options
    }

    /// Bind an action to a roster user. An id outside the roster still
    /// sticks but leaves the display name blank.
    pub fn set_responsible(&mut self, index: usize, user_id: u32) {
        let name = self
            .responsible_options
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| u.user_name.clone())
            .unwrap_or_default();
        if let Some(action) = self.actions.get_mut(index) {
            action.responsible_id = user_id.to_string();
            action.responsible_name = name;
        }
    }

    /// Merge newly picked attachments into an action. A new file with a
    /// name already on the row replaces the old entry.
    pub fn merge_action_attachments(&mut self, index: usize, incoming: Vec<RcaAttachment>) {
        if incoming.is_empty() {
            return;
        }
        let Some(action) = self.actions.get_mut(index) else {
            return;
        };
        action.attachments_assign.retain(|existing| {
            !incoming
                .iter()
                .any(|new| new.original_name == existing.original_name)
        });
        action.attachments_assign.extend(incoming);
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Assemble the payload as it stands right now. The prepared-by
    /// identity comes from the session at call time, never from a copy
    /// taken when the form opened.
    pub fn payload<S: KeyValueStore>(&self, session: &SessionStore<S>) -> RcaPayload {
        let identity = session.identity();
        let (prepared_by, prepared_by_user_id) = identity
            .map(|i| (i.username, i.user_id))
            .unwrap_or_default();
        RcaPayload {
            id: self.context.incident_id.clone(),
            doc_no: DOC_NO.to_string(),
            eff_date: EFF_DATE.to_string(),
            revision_no: REVISION_NO.to_string(),
            cft_members: self.cft_members.clone(),
            past_incident: self.past_incident,
            past_incident_details: self.past_incident_details.clone(),
            incident_summary: self.context.summary.clone(),
            chronology: self.chronology.clone(),
            facts: self.facts.clone(),
            evidence: self.evidence.clone(),
            driver_statement: self.driver_statement.clone(),
            supervisor_statement: self.supervisor_statement.clone(),
            man_causes: self.man_causes.clone(),
            machine_causes: self.machine_causes.clone(),
            method_causes: self.method_causes.clone(),
            mother_nature_causes: self.mother_nature_causes.clone(),
            probable_cause: self.probable_cause.clone(),
            why_analysis: self.why_analysis.clone(),
            actual_root_cause: self.actual_root_cause.clone(),
            corrective_action: self.corrective_action.clone(),
            preventive_action: self.preventive_action.clone(),
            actions: self
                .actions
                .iter()
                .map(|action| {
                    let mut action = action.clone();
                    action.attachments_assign.retain(|a| !a.is_empty());
                    action
                })
                .collect(),
            prepared_by,
            prepared_by_user_id,
        }
    }

    /// Submit the worksheet. The form keeps its contents either way; a
    /// transient toast is the only feedback, matching the paper-form
    /// workflow where the sheet stays on screen for reference.
    pub fn submit<G: ApiGateway, S: KeyValueStore>(
        &mut self,
        gateway: &G,
        session: &SessionStore<S>,
    ) -> RcaSubmit {
        let payload = self.payload(session);
        match gateway.create_rca(&payload) {
            Ok(()) => {
                debug!(incident_id = %payload.id, "rca report submitted");
                self.toast = Some("Report submitted successfully!".to_string());
                RcaSubmit::Accepted
            }
            Err(err) => {
                warn!(%err, "rca submission failed");
                self.toast = Some("Failed to submit report.".to_string());
                RcaSubmit::Failed
            }
        }
    }
}
