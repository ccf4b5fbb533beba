//! Review queue for the safety administrator.

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::ApiGateway;
use crate::error::CoreResult;
use crate::incident::model::{
    priority_for_count, IncidentRecord, IncidentStatus, PriorityTier,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRow {
    pub incident_id: String,
    pub incident_date: String,
    pub incident_title: String,
    pub location: String,
    pub status: IncidentStatus,
    pub priority: PriorityTier,
}

impl ApprovalRow {
    fn from_value(value: &Value) -> Option<Self> {
        let record = IncidentRecord::from_value(value);
        let Some(incident_id) = record.incident_id else {
            warn!("skipping incident row without an id");
            return None;
        };
        Some(ApprovalRow {
            incident_id,
            incident_date: record.incident_date,
            incident_title: record.incident_title,
            location: record.location,
            status: IncidentStatus::from_raw(record.status.as_deref()),
            priority: priority_for_count(record.count_injury),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Debug, Default)]
pub struct ApprovalView {
    rows: Vec<ApprovalRow>,
    pub filter: StatusFilter,
    fetch_epoch: u64,
    loading: bool,
}

impl ApprovalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh. The returned epoch must accompany the matching
    /// [`finish_load`](Self::finish_load); responses from an older epoch
    /// are dropped so a slow fetch cannot clobber a newer one.
    pub fn begin_load(&mut self) -> u64 {
        self.fetch_epoch += 1;
        self.loading = true;
        self.fetch_epoch
    }

    pub fn finish_load(&mut self, epoch: u64, result: CoreResult<Vec<Value>>) {
        if epoch != self.fetch_epoch {
            debug!(epoch, current = self.fetch_epoch, "dropping stale incident list");
            return;
        }
        self.loading = false;
        match result {
            Ok(values) => {
                self.rows = values.iter().filter_map(ApprovalRow::from_value).collect();
            }
            Err(err) => {
                warn!(%err, "incident list refresh failed, keeping previous rows");
            }
        }
    }

    pub fn load<G: ApiGateway>(&mut self, gateway: &G) {
        let epoch = self.begin_load();
        let result = gateway.list_incidents();
        self.finish_load(epoch, result);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rows(&self) -> &[ApprovalRow] {
        &self.rows
    }

    pub fn filtered(&self) -> Vec<&ApprovalRow> {
        self.rows
            .iter()
            .filter(|row| match self.filter {
                StatusFilter::All => true,
                StatusFilter::Pending => row.status == IncidentStatus::Pending,
                StatusFilter::Approved => row.status == IncidentStatus::Approved,
                StatusFilter::Rejected => row.status == IncidentStatus::Rejected,
            })
            .collect()
    }

    /// Header counters, always derived from the rows so they can never
    /// drift from the table.
    pub fn counters(&self) -> Counters {
        let mut counters = Counters {
            total: self.rows.len(),
            ..Counters::default()
        };
        for row in &self.rows {
            match row.status {
                IncidentStatus::Pending => counters.pending += 1,
                IncidentStatus::Approved => counters.approved += 1,
                IncidentStatus::Rejected => counters.rejected += 1,
                _ => {}
            }
        }
        counters
    }

    /// Decide a pending incident. Only `Pending` rows accept a decision
    /// and only `Approved`/`Rejected` are valid targets. The local row
    /// flips regardless of the PATCH outcome; the next refresh is the
    /// reconciliation point.
    pub fn set_status<G: ApiGateway>(
        &mut self,
        gateway: &G,
        incident_id: &str,
        decision: IncidentStatus,
    ) -> bool {
        if !matches!(decision, IncidentStatus::Approved | IncidentStatus::Rejected) {
            return false;
        }
        let Some(row) = self
            .rows
            .iter_mut()
            .find(|row| row.incident_id == incident_id)
        else {
            return false;
        };
        if row.status != IncidentStatus::Pending {
            return false;
        }
        if let Err(err) = gateway.patch_incident_status(incident_id, decision) {
            debug!(incident_id, %err, "status patch failed, applying locally anyway");
        }
        row.status = decision;
        true
    }

    pub fn approve<G: ApiGateway>(&mut self, gateway: &G, incident_id: &str) -> bool {
        self.set_status(gateway, incident_id, IncidentStatus::Approved)
    }

    pub fn reject<G: ApiGateway>(&mut self, gateway: &G, incident_id: &str) -> bool {
        self.set_status(gateway, incident_id, IncidentStatus::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_fixture() -> Vec<Value> {
        vec![
            json!({
                "IncidentID": "INC-1",
                "IncidentDate": "2024-03-01",
                "IncidentTitle": "Slip near berth",
                "Location": "Berth 2",
                "CountInjury": 2,
                "Status": "Pending",
            }),
            json!({
                "IncidentID": "INC-2",
                "IncidentTitle": "Cable damage",
                "CountInjury": 0,
                "Status": "Approved",
            }),
            json!({
                "IncidentID": "INC-3",
                "IncidentTitle": "No status yet",
                "CountInjury": 1,
            }),
        ]
    }

    fn loaded_view() -> ApprovalView {
        let mut view = ApprovalView::new();
        let epoch = view.begin_load();
        view.finish_load(epoch, Ok(rows_fixture()));
        view
    }

    #[test]
    fn missing_status_reads_as_pending() {
        let view = loaded_view();
        let row = view
            .rows()
            .iter()
            .find(|r| r.incident_id == "INC-3")
            .unwrap();
        assert_eq!(row.status, IncidentStatus::Pending);
    }

    #[test]
    fn priority_follows_injury_count() {
        let view = loaded_view();
        assert_eq!(view.rows()[0].priority, PriorityTier::High);
        assert_eq!(view.rows()[1].priority, PriorityTier::Low);
        assert_eq!(view.rows()[2].priority, PriorityTier::Medium);
    }

    #[test]
    fn counters_match_rows() {
        let view = loaded_view();
        let counters = view.counters();
        assert_eq!(counters.total, 3);
        assert_eq!(counters.pending, 2);
        assert_eq!(counters.approved, 1);
        assert_eq!(counters.rejected, 0);
    }

    #[test]
    fn stale_epoch_response_is_dropped() {
        let mut view = ApprovalView::new();
        let first = view.begin_load();
        let second = view.begin_load();
        view.finish_load(second, Ok(rows_fixture()));
        view.finish_load(first, Ok(vec![]));
        assert_eq!(view.rows().len(), 3);
    }

    #[test]
    fn filter_narrows_rows() {
        let mut view = loaded_view();
        view.filter = StatusFilter::Approved;
        let filtered = view.filtered();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].incident_id, "INC-2");
    }
}
