//! In-memory collaborator double shared by the integration tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde_json::{json, Value};

use hse_core::api::{ApiGateway, LoginRequest, LoginResponse, LoginUser};
use hse_core::error::{CoreError, CoreResult};
use hse_core::incident::detail::IncidentUpdate;
use hse_core::incident::intake::IntakePayload;
use hse_core::incident::model::IncidentStatus;
use hse_core::rca::model::{RcaPayload, ResponsibleUser};

#[derive(Default)]
pub struct RecordingGateway {
    pub calls: RefCell<Vec<String>>,
    pub incidents: RefCell<Vec<Value>>,
    pub assigned: RefCell<BTreeMap<String, Vec<Value>>>,
    pub details: RefCell<BTreeMap<String, Value>>,
    pub responsible_users: RefCell<Vec<ResponsibleUser>>,
    pub login_role: RefCell<String>,
    pub rca_payloads: RefCell<Vec<RcaPayload>>,
    pub intake_payloads: RefCell<Vec<Value>>,
    pub fail_create: Cell<bool>,
    pub fail_patch: Cell<bool>,
    pub fail_rca: Cell<bool>,
    pub fail_login: Cell<bool>,
    pub fail_roster: Cell<bool>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_incident(&self, value: Value) {
        if let Some(id) = value.get("IncidentID").and_then(|v| v.as_str()) {
            self.details.borrow_mut().insert(id.to_string(), value.clone());
        }
        self.incidents.borrow_mut().push(value);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl ApiGateway for RecordingGateway {
    fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        self.record(format!("POST /api/login {}", request.username));
        if self.fail_login.get() {
            return Err(CoreError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            });
        }
        Ok(LoginResponse {
            user: LoginUser {
                user_id: format!("uid-{}", request.username),
                username: request.username.clone(),
                role: self.login_role.borrow().clone(),
            },
            location: json!({"site": "Terminal 2"}),
        })
    }

    fn create_incident(&self, payload: &IntakePayload) -> CoreResult<Value> {
        self.record("POST /api/incidents");
        if self.fail_create.get() {
            return Err(CoreError::Transport("connection reset".to_string()));
        }
        let value = serde_json::to_value(payload)?;
        self.intake_payloads.borrow_mut().push(value.clone());
        Ok(json!({"IncidentID": "INC-NEW"}))
    }

    fn list_incidents(&self) -> CoreResult<Vec<Value>> {
        self.record("GET /api/incidents");
        Ok(self.incidents.borrow().clone())
    }

    fn get_incident(&self, incident_id: &str) -> CoreResult<Value> {
        self.record(format!("GET /api/incident/{incident_id}"));
        self.details
            .borrow()
            .get(incident_id)
            .cloned()
            .ok_or_else(|| CoreError::Api {
                status: 404,
                message: "incident not found".to_string(),
            })
    }

    fn patch_incident_status(
        &self,
        incident_id: &str,
        status: IncidentStatus,
    ) -> CoreResult<()> {
        self.record(format!("PATCH /api/incident/{incident_id} {status}"));
        if self.fail_patch.get() {
            return Err(CoreError::Transport("timeout".to_string()));
        }
        Ok(())
    }

    fn replace_incident(&self, incident_id: &str, update: &IncidentUpdate) -> CoreResult<()> {
        self.record(format!("PUT /api/incident/{incident_id}"));
        let value = serde_json::to_value(update)?;
        self.details.borrow_mut().insert(incident_id.to_string(), value);
        Ok(())
    }

    fn list_assigned_incidents(&self, user_id: &str) -> CoreResult<Vec<Value>> {
        self.record(format!("GET /api/incident/assign-user/{user_id}"));
        Ok(self
            .assigned
            .borrow()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_assigned_incident_details(&self, incident_id: &str) -> CoreResult<Value> {
        self.record(format!(
            "GET /api/incident/assign-user/details?incidentId={incident_id}"
        ));
        self.details
            .borrow()
            .get(incident_id)
            .cloned()
            .ok_or_else(|| CoreError::Api {
                status: 404,
                message: "incident not found".to_string(),
            })
    }

    fn list_responsible_users(&self) -> CoreResult<Vec<ResponsibleUser>> {
        self.record("GET /api/users/role3");
        if self.fail_roster.get() {
            return Err(CoreError::Transport("connection reset".to_string()));
        }
        Ok(self.responsible_users.borrow().clone())
    }

    fn create_rca(&self, payload: &RcaPayload) -> CoreResult<()> {
        self.record("POST /api/incident-actions");
        if self.fail_rca.get() {
            return Err(CoreError::Api {
                status: 500,
                message: "server error".to_string(),
            });
        }
        self.rca_payloads.borrow_mut().push(payload.clone());
        Ok(())
    }
}
