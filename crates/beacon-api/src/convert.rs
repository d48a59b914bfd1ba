//! Row-to-model conversions. Rows carry TEXT ids and timestamps straight
//! from SQLite; corruption is logged and defaulted rather than failing the
//! whole listing.

use beacon_db::models::{ArticleRow, PlanRow, ReportRow, ResourceRow, SafetyCheckRow, UserRow};
use beacon_types::models::{
    Article, CommunityReport, DisasterType, EmergencyPlan, ReportStatus, Resource,
    ResourceCategory, Role, SafetyCheck, SafetyStatus, User,
};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub(crate) fn parse_id(raw: &str, what: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", what, raw, e);
        Uuid::default()
    })
}

pub(crate) fn parse_instant(raw: &str, what: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} timestamp '{}': {}", what, raw, e);
            DateTime::default()
        })
}

/// Drop blank optional text fields.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn user_from_row(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user"),
        role: Role::from_str(&row.role).unwrap_or(Role::User),
        created_at: parse_instant(&row.created_at, "user"),
        email: row.email,
        full_name: row.full_name,
        phone: row.phone,
        address: row.address,
    }
}

pub(crate) fn article_from_row(row: ArticleRow) -> Article {
    Article {
        id: parse_id(&row.id, "article"),
        published_at: parse_instant(&row.published_at, "article"),
        title: row.title,
        category: row.category.unwrap_or_default(),
        content: row.content,
    }
}

pub(crate) fn report_from_row(row: ReportRow) -> CommunityReport {
    CommunityReport {
        id: parse_id(&row.id, "report"),
        user_id: parse_id(&row.user_id, "report owner"),
        disaster_type: DisasterType::from_str(&row.disaster_type).unwrap_or(DisasterType::Other),
        status: ReportStatus::from_str(&row.status).unwrap_or(ReportStatus::Pending),
        verified_by_admin_id: row
            .verified_by_admin_id
            .as_deref()
            .map(|id| parse_id(id, "verifier")),
        created_at: parse_instant(&row.created_at, "report"),
        location: row.location,
        description: row.description,
    }
}

pub(crate) fn resource_from_row(row: ResourceRow) -> Resource {
    Resource {
        id: parse_id(&row.id, "resource"),
        category: ResourceCategory::from_str(&row.category).unwrap_or(ResourceCategory::Other),
        updated_at: parse_instant(&row.updated_at, "resource"),
        name: row.name,
        address: row.address,
        contact: row.contact,
        latitude: row.latitude,
        longitude: row.longitude,
    }
}

pub(crate) fn plan_from_row(row: PlanRow) -> EmergencyPlan {
    EmergencyPlan {
        id: parse_id(&row.id, "plan"),
        user_id: parse_id(&row.user_id, "plan owner"),
        created_at: parse_instant(&row.created_at, "plan"),
        household_members: row.household_members,
        meeting_point: row.meeting_point,
        evacuation_routes: row.evacuation_routes,
        supply_checklist: row.supply_checklist,
        notes: row.notes,
    }
}

pub(crate) fn check_from_row(row: SafetyCheckRow) -> SafetyCheck {
    SafetyCheck {
        id: parse_id(&row.id, "safety check"),
        user_id: parse_id(&row.user_id, "safety check owner"),
        status: SafetyStatus::from_str(&row.status).unwrap_or(SafetyStatus::Safe),
        created_at: parse_instant(&row.created_at, "safety check"),
        note: row.note,
    }
}
