//! Worklist of incidents assigned to the signed-in responsible person.

use serde_json::Value;
use time::macros::format_description;
use time::Date;
use tracing::{debug, warn};

use crate::api::ApiGateway;
use crate::error::CoreResult;
use crate::incident::decode::decode_nested;
use crate::incident::model::Person;

/// Raw status values that count toward the "active" workload badge.
/// Matching is exact text; the badge is a tally, not a state machine.
const ACTIVE_STATUSES: [&str; 3] = ["Pending", "In Progress", "active"];

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub incident_id: String,
    pub incident_date: String,
    pub incident_title: String,
    pub status_raw: String,
    pub department: String,
    pub last_updated: String,
}

impl AssignmentRow {
    fn from_value(value: &Value) -> Option<Self> {
        let incident_id = value
            .get("IncidentID")
            .and_then(|v| v.as_str())
            .map(str::to_string)?;
        let employees: Vec<Person> =
            decode_nested("InjuredHTPLEmployees", value.get("InjuredHTPLEmployees"));
        let department = employees
            .first()
            .map(|p| p.department.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "N/A".to_string());
        Some(AssignmentRow {
            incident_id,
            incident_date: text_field(value, "IncidentDate"),
            incident_title: text_field(value, "IncidentTitle"),
            status_raw: text_field(value, "Status"),
            department,
            last_updated: text_field(value, "LastUpdated"),
        })
    }
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Default)]
pub struct AssignmentView {
    rows: Vec<AssignmentRow>,
    /// Exact-text status filter; `None` shows everything.
    pub status_filter: Option<String>,
    fetch_epoch: u64,
    loading: bool,
}

impl AssignmentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.fetch_epoch += 1;
        self.loading = true;
        self.fetch_epoch
    }

    pub fn finish_load(&mut self, epoch: u64, result: CoreResult<Vec<Value>>) {
        if epoch != self.fetch_epoch {
            debug!(epoch, current = self.fetch_epoch, "dropping stale assignment list");
            return;
        }
        self.loading = false;
        match result {
            Ok(values) => {
                self.rows = values.iter().filter_map(AssignmentRow::from_value).collect();
            }
            Err(err) => {
                warn!(%err, "assignment list refresh failed, keeping previous rows");
            }
        }
    }

    pub fn load<G: ApiGateway>(&mut self, gateway: &G, user_id: &str) {
        let epoch = self.begin_load();
        let result = gateway.list_assigned_incidents(user_id);
        self.finish_load(epoch, result);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    pub fn filtered(&self) -> Vec<&AssignmentRow> {
        self.rows
            .iter()
            .filter(|row| match &self.status_filter {
                Some(status) => row.status_raw == *status,
                None => true,
            })
            .collect()
    }

    /// Count of rows still demanding work.
    pub fn active_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| ACTIVE_STATUSES.contains(&row.status_raw.as_str()))
            .count()
    }

    /// Rows closed out today, by the store's `LastUpdated` stamp. An
    /// unparsable stamp simply does not count.
    pub fn completed_today(&self, today: Date) -> usize {
        self.rows
            .iter()
            .filter(|row| row.status_raw == "Completed")
            .filter(|row| date_prefix(&row.last_updated) == Some(today))
            .count()
    }
}

fn date_prefix(raw: &str) -> Option<Date> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(raw.get(..10)?, &fmt).ok()
}
