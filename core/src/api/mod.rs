//! Typed contract for the incident-portal REST collaborator.
//!
//! Transport lives outside this crate; callers hand in any
//! [`ApiGateway`] implementation and the views stay testable against
//! in-memory doubles.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreResult;
use crate::incident::detail::IncidentUpdate;
use crate::incident::intake::IntakePayload;
use crate::incident::model::IncidentStatus;
use crate::rca::model::{RcaPayload, ResponsibleUser};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoginUser {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub user: LoginUser,
    /// Site/terminal descriptor. Shape varies by deployment, so it is
    /// carried opaquely and persisted verbatim.
    #[serde(default)]
    pub location: Value,
}

/// The collaborator surface the views depend on.
///
/// List and detail reads return raw `Value`s on purpose: stored records
/// mix column shapes across deployments and the views own the defensive
/// decode at their boundary.
pub trait ApiGateway {
    fn login(&self, request: &LoginRequest) -> CoreResult<LoginResponse>;

    fn create_incident(&self, payload: &IntakePayload) -> CoreResult<Value>;

    fn list_incidents(&self) -> CoreResult<Vec<Value>>;

    fn get_incident(&self, incident_id: &str) -> CoreResult<Value>;

    fn patch_incident_status(&self, incident_id: &str, status: IncidentStatus) -> CoreResult<()>;

    fn replace_incident(&self, incident_id: &str, update: &IncidentUpdate) -> CoreResult<()>;

    fn list_assigned_incidents(&self, user_id: &str) -> CoreResult<Vec<Value>>;

    fn get_assigned_incident_details(&self, incident_id: &str) -> CoreResult<Value>;

    fn list_responsible_users(&self) -> CoreResult<Vec<ResponsibleUser>>;

    fn create_rca(&self, payload: &RcaPayload) -> CoreResult<()>;
}
