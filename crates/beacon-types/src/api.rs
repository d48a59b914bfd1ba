use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CommunityReport, DisasterType, EmergencyPlan, Resource, ResourceCategory, Role, SafetyCheck,
    SafetyStatus, User,
};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub token: String,
}

// -- Reports --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReportRequest {
    pub disaster_type: DisasterType,
    pub location: String,
    pub description: String,
}

// -- Resources --

/// Create when `id` is absent, update when present. Either way the
/// resource's `updated_at` is refreshed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertResourceRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub category: ResourceCategory,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

// -- Emergency plans --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePlanRequest {
    #[serde(default)]
    pub household_members: Option<u32>,
    #[serde(default)]
    pub meeting_point: Option<String>,
    #[serde(default)]
    pub evacuation_routes: Option<String>,
    #[serde(default)]
    pub supply_checklist: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// -- Safety check-ins --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafetyCheckRequest {
    pub status: SafetyStatus,
    #[serde(default)]
    pub note: Option<String>,
}

// -- Profile --

/// Unset or blank fields keep their existing values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// -- Listings --

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

// -- Dashboards --

#[derive(Debug, Serialize)]
pub struct HomeSummary {
    pub user: User,
    pub recent_reports: Vec<CommunityReport>,
    pub latest_safety: Option<SafetyCheck>,
    pub latest_plan: Option<EmergencyPlan>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub recent_reports: Vec<CommunityReport>,
    pub recent_users: Vec<User>,
    pub recent_safety_checks: Vec<SafetyCheck>,
    pub resources: Vec<Resource>,
}
