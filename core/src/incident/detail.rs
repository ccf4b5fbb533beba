//! Single-incident detail screen with in-place editing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::ApiGateway;
use crate::error::CoreResult;
use crate::incident::model::{AttachmentMeta, IncidentRecord, Person};

/// Full-record replacement sent on save. The edit screen round-trips
/// every column it shows, weather included, as the free text the record
/// came with. Date and time are carried unchanged; the edit screen
/// shows them read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IncidentUpdate {
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Alert,
}

/// Styling of the RCA entry button. Only the assignment role gets the
/// inviting variant; the comparison is case-sensitive on purpose, the
/// stored role string is the contract.
pub fn rca_button_style(role: &str) -> ButtonStyle {
    if role == "Assign" {
        ButtonStyle::Primary
    } else {
        ButtonStyle::Alert
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed,
}

#[derive(Debug, Default)]
pub struct DetailView {
    pub incident_id: String,
    pub record: IncidentUpdate,
    pub editing: bool,
    pub save_error: Option<String>,
}

impl DetailView {
    pub fn load<G: ApiGateway>(gateway: &G, incident_id: &str) -> CoreResult<Self> {
        let raw = gateway.get_incident(incident_id)?;
        Ok(DetailView {
            incident_id: incident_id.to_string(),
            record: Self::decode(&raw),
            editing: false,
            save_error: None,
        })
    }

    /// Decode a stored record into the editable shape. Every column is
    /// read independently, so one mistyped column degrades to blank
    /// instead of blanking the whole form (and then overwriting the
    /// stored record with blanks on the next save).
    fn decode(raw: &Value) -> IncidentUpdate {
        let record = IncidentRecord::from_value(raw);
        IncidentUpdate {
            incident_date: record.incident_date,
            incident_time: record.incident_time,
            location: record.location,
            weather_condition: record.weather_condition,
            htpl_shift_in_charge: record.htpl_shift_in_charge,
            contractor_supervisor: record.contractor_supervisor,
            incident_reported_by: record.incident_reported_by,
            report_prepared_by: record.report_prepared_by,
            incident_title: record.incident_title,
            incident_summary: record.incident_summary,
            type_injury: record.type_injury,
            count_injury: record.count_injury,
            type_property_damage: record.type_property_damage,
            count_property_damage: record.count_property_damage,
            type_fire: record.type_fire,
            count_fire: record.count_fire,
            type_near_miss: record.type_near_miss,
            count_near_miss: record.count_near_miss,
            type_environment: record.type_environment,
            count_environment: record.count_environment,
            type_fatality: record.type_fatality,
            count_fatality: record.count_fatality,
            type_other: record.type_other,
            count_other: record.count_other,
            injured_htpl_employees: record.injured_htpl_employees,
            injured_contract_workers: record.injured_contract_workers,
            injured_visitors: record.injured_visitors,
            uploaded_files: record.uploaded_files,
        }
    }

    /// Push the edited record back. On failure the edits stay local and
    /// the error is held for display.
    pub fn save<G: ApiGateway>(&mut self, gateway: &G) -> SaveOutcome {
        match gateway.replace_incident(&self.incident_id, &self.record) {
            Ok(()) => {
                debug!(incident_id = %self.incident_id, "incident record replaced");
                self.editing = false;
                self.save_error = None;
                SaveOutcome::Saved
            }
            Err(err) => {
                self.save_error =
                    Some(err.display_message("Failed to save changes. Please try again."));
                SaveOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rca_button_style_is_case_sensitive() {
        assert_eq!(rca_button_style("Assign"), ButtonStyle::Primary);
        assert_eq!(rca_button_style("assign"), ButtonStyle::Alert);
        assert_eq!(rca_button_style("Admin"), ButtonStyle::Alert);
        assert_eq!(rca_button_style(""), ButtonStyle::Alert);
    }

    #[test]
    fn decode_handles_text_stored_lists() {
        let raw = json!({
            "IncidentDate": "2024-05-11",
            "IncidentTitle": "Crane hook slip",
            "InjuredHTPLEmployees": "[{\"name\":\"M. Sen\"}]",
            "UploadedFiles": [{"original_name": "a.jpg", "size": 12, "type": "image/jpeg"}],
        });
        let record = DetailView::decode(&raw);
        assert_eq!(record.incident_title, "Crane hook slip");
        assert_eq!(record.injured_htpl_employees.len(), 1);
        assert_eq!(record.injured_htpl_employees[0].name, "M. Sen");
        assert_eq!(record.uploaded_files[0].original_name, "a.jpg");
    }

    #[test]
    fn decode_tolerates_garbage_lists() {
        let raw = json!({
            "IncidentTitle": "Partial row",
            "InjuredVisitors": 42,
        });
        let record = DetailView::decode(&raw);
        assert_eq!(record.incident_title, "Partial row");
        assert!(record.injured_visitors.is_empty());
    }

    #[test]
    fn mistyped_scalar_column_blanks_only_itself() {
        let raw = json!({
            "IncidentTitle": "Numeric location column",
            "Location": 42,
            "IncidentSummary": "Still readable",
        });
        let record = DetailView::decode(&raw);
        assert_eq!(record.incident_title, "Numeric location column");
        assert_eq!(record.incident_summary, "Still readable");
        assert_eq!(record.location, "");
    }

    #[test]
    fn save_body_keeps_the_classification_grid() {
        let raw = json!({
            "IncidentID": "INC-9",
            "IncidentTitle": "Crane hook slip",
            "TypeInjury": true,
            "CountInjury": 2,
            "TypeNearMiss": true,
            "CountNearMiss": 1,
        });
        let record = DetailView::decode(&raw);
        assert!(record.type_injury);
        assert_eq!(record.count_injury, 2);

        let body = serde_json::to_value(&record).unwrap();
        assert_eq!(body["TypeInjury"], true);
        assert_eq!(body["CountInjury"], 2);
        assert_eq!(body["TypeNearMiss"], true);
        assert_eq!(body["CountNearMiss"], 1);
        assert_eq!(body["TypeFire"], false);
        assert_eq!(body["CountFire"], 0);
    }
}
