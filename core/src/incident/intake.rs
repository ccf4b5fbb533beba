//! First-report intake form.

use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::api::ApiGateway;
use crate::error::{CoreError, CoreResult};
use crate::incident::model::{
    clamp_count, resize_person_list, AttachmentMeta, Classification, IncidentKind, Person,
    WeatherCondition,
};
use crate::incident::preview::{PreviewHandle, PreviewRegistry};

/// Hard cap on a single staged attachment.
pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// How long the success banner stays up before the form re-arms.
pub const SUCCESS_HOLD: Duration = Duration::seconds(3);

const SUBMIT_FAILURE_FALLBACK: &str = "Failed to submit incident report. Please try again.";

/// Wire shape of a new incident submission. New reports always enter the
/// system with status `active`; approval decides what happens next.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IntakePayload {
    pub incident_date: String,
    pub incident_time: String,
    pub location: String,
    pub weather_condition: WeatherCondition,
    pub htpl_shift_in_charge: String,
    pub contractor_supervisor: String,
    pub incident_reported_by: String,
    pub report_prepared_by: String,
    pub incident_title: String,
    pub incident_summary: String,
    pub type_injury: bool,
    pub count_injury: u32,
    pub type_property_damage: bool,
    pub count_property_damage: u32,
    pub type_fire: bool,
    pub count_fire: u32,
    pub type_near_miss: bool,
    pub count_near_miss: u32,
    pub type_environment: bool,
    pub count_environment: u32,
    pub type_fatality: bool,
    pub count_fatality: u32,
    pub type_other: bool,
    pub count_other: u32,
    pub injured_htpl_employees: Vec<Person>,
    pub injured_contract_workers: Vec<Person>,
    pub injured_visitors: Vec<Person>,
    pub uploaded_files: Vec<AttachmentMeta>,
    pub status: &'static str,
}

#[derive(Debug)]
pub struct StagedFile {
    pub meta: AttachmentMeta,
    pub preview: Option<PreviewHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { expires_at: OffsetDateTime },
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Failed,
    /// A success banner is still up; the submission was not sent.
    Throttled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonGroup {
    HtplEmployees,
    ContractWorkers,
    Visitors,
}

#[derive(Debug, Default)]
pub struct IntakeForm {
    pub incident_date: String,
    pub incident_time: String,
    pub location: String,
    pub weather_condition: WeatherCondition,
    pub htpl_shift_in_charge: String,
    pub contractor_supervisor: String,
    pub incident_reported_by: String,
    pub report_prepared_by: String,
    pub incident_title: String,
    pub incident_summary: String,
    pub classification: Classification,
    pub injured_htpl_employees: Vec<Person>,
    pub injured_contract_workers: Vec<Person>,
    pub injured_visitors: Vec<Person>,
    files: Vec<StagedFile>,
    upload_errors: Vec<String>,
    notice: Option<Notice>,
    previews: PreviewRegistry,
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one category flag. The paired count keeps its value either
    /// way; the two fields are edited independently.
    pub fn toggle_type(&mut self, kind: IncidentKind) {
        let slot = self.classification.slot_mut(kind);
        slot.occurred = !slot.occurred;
    }

    /// Set a category count from raw keyboard input.
    pub fn set_count(&mut self, kind: IncidentKind, raw: &str) {
        self.classification.slot_mut(kind).count = clamp_count(raw);
    }

    pub fn resize_person_group(&mut self, group: PersonGroup, n: usize) {
        resize_person_list(self.person_group_mut(group), n);
    }

    pub fn person_group_mut(&mut self, group: PersonGroup) -> &mut Vec<Person> {
        match group {
            PersonGroup::HtplEmployees => &mut self.injured_htpl_employees,
            PersonGroup::ContractWorkers => &mut self.injured_contract_workers,
            PersonGroup::Visitors => &mut self.injured_visitors,
        }
    }

    /// Stage a batch of candidate files. Oversized files are skipped and
    /// reported; image files get a preview resource.
    pub fn attach_files(&mut self, candidates: Vec<AttachmentMeta>) {
        for meta in candidates {
            if meta.size > MAX_FILE_SIZE {
                self.upload_errors
                    .push(format!("File \"{}\" exceeds 4MB limit", meta.original_name));
                continue;
            }
            let preview = meta
                .mime_type
                .starts_with("image/")
                .then(|| self.previews.acquire());
            self.files.push(StagedFile { meta, preview });
        }
    }

    pub fn remove_file(&mut self, index: usize) {
        if index >= self.files.len() {
            return;
        }
        let staged = self.files.remove(index);
        if let Some(handle) = staged.preview {
            self.previews.release(handle);
        }
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn upload_errors(&self) -> &[String] {
        &self.upload_errors
    }

    pub fn clear_upload_errors(&mut self) {
        self.upload_errors.clear();
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    /// Required fields still blank, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let checks: [(&'static str, &str); 8] = [
            ("incident_date", &self.incident_date),
            ("incident_time", &self.incident_time),
            ("location", &self.location),
            ("htpl_shift_in_charge", &self.htpl_shift_in_charge),
            ("incident_reported_by", &self.incident_reported_by),
            ("report_prepared_by", &self.report_prepared_by),
            ("incident_title", &self.incident_title),
            ("incident_summary", &self.incident_summary),
        ];
        for (name, value) in checks {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if self.weather_condition == WeatherCondition::Unspecified {
            missing.push("weather_condition");
        }
        missing
    }

    pub fn can_submit(&self, now: OffsetDateTime) -> bool {
        !matches!(self.notice, Some(Notice::Success { expires_at }) if now < expires_at)
    }

    /// Drop the success banner once its hold expires.
    pub fn tick(&mut self, now: OffsetDateTime) {
        if let Some(Notice::Success { expires_at }) = self.notice {
            if now >= expires_at {
                self.notice = None;
            }
        }
    }

    pub fn payload(&self) -> IntakePayload {
        IntakePayload {
            incident_date: self.incident_date.clone(),
            incident_time: self.incident_time.clone(),
            location: self.location.clone(),
            weather_condition: self.weather_condition,
            htpl_shift_in_charge: self.htpl_shift_in_charge.clone(),
            contractor_supervisor: self.contractor_supervisor.clone(),
            incident_reported_by: self.incident_reported_by.clone(),
            report_prepared_by: self.report_prepared_by.clone(),
            incident_title: self.incident_title.clone(),
            incident_summary: self.incident_summary.clone(),
            type_injury: self.classification.injury.occurred,
            count_injury: self.classification.injury.count,
            type_property_damage: self.classification.property_damage.occurred,
            count_property_damage: self.classification.property_damage.count,
            type_fire: self.classification.fire.occurred,
            count_fire: self.classification.fire.count,
            type_near_miss: self.classification.near_miss.occurred,
            count_near_miss: self.classification.near_miss.count,
            type_environment: self.classification.environment.occurred,
            count_environment: self.classification.environment.count,
            type_fatality: self.classification.fatality.occurred,
            count_fatality: self.classification.fatality.count,
            type_other: self.classification.other.occurred,
            count_other: self.classification.other.count,
            injured_htpl_employees: self.injured_htpl_employees.clone(),
            injured_contract_workers: self.injured_contract_workers.clone(),
            injured_visitors: self.injured_visitors.clone(),
            uploaded_files: self.files.iter().map(|f| f.meta.clone()).collect(),
            status: "active",
        }
    }

    /// Submit the report. Validation problems come back as `Err`; a
    /// collaborator failure surfaces as a failure notice on the form so
    /// the operator's input survives for a retry.
    pub fn submit<G: ApiGateway>(
        &mut self,
        gateway: &G,
        now: OffsetDateTime,
    ) -> CoreResult<SubmitOutcome> {
        if !self.can_submit(now) {
            return Ok(SubmitOutcome::Throttled);
        }
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "required fields missing: {}",
                missing.join(", ")
            )));
        }
        match gateway.create_incident(&self.payload()) {
            Ok(_) => {
                debug!("incident report accepted");
                self.reset();
                self.notice = Some(Notice::Success {
                    expires_at: now + SUCCESS_HOLD,
                });
                Ok(SubmitOutcome::Accepted)
            }
            Err(err) => {
                self.notice = Some(Notice::Failure(err.display_message(SUBMIT_FAILURE_FALLBACK)));
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    fn reset(&mut self) {
        self.previews.release_all();
        self.incident_date.clear();
        self.incident_time.clear();
        self.location.clear();
        self.weather_condition = WeatherCondition::Unspecified;
        self.htpl_shift_in_charge.clear();
        self.contractor_supervisor.clear();
        self.incident_reported_by.clear();
        self.report_prepared_by.clear();
        self.incident_title.clear();
        self.incident_summary.clear();
        self.classification = Classification::default();
        self.injured_htpl_employees.clear();
        self.injured_contract_workers.clear();
        self.injured_visitors.clear();
        self.files.clear();
        self.upload_errors.clear();
        self.notice = None;
    }
}

impl Drop for IntakeForm {
    fn drop(&mut self) {
        self.previews.release_all();
    }
}
