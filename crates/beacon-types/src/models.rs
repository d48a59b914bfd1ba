use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account roles. `User` is the default; nothing in the registration path
/// can produce an `Admin`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisasterType {
    Typhoon,
    Flood,
    Earthquake,
    Fire,
    Landslide,
    Other,
}

impl DisasterType {
    pub fn as_str(&self) -> &str {
        match self {
            DisasterType::Typhoon => "Typhoon",
            DisasterType::Flood => "Flood",
            DisasterType::Earthquake => "Earthquake",
            DisasterType::Fire => "Fire",
            DisasterType::Landslide => "Landslide",
            DisasterType::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Typhoon" => Some(DisasterType::Typhoon),
            "Flood" => Some(DisasterType::Flood),
            "Earthquake" => Some(DisasterType::Earthquake),
            "Fire" => Some(DisasterType::Fire),
            "Landslide" => Some(DisasterType::Landslide),
            "Other" => Some(DisasterType::Other),
            _ => None,
        }
    }
}

/// Report lifecycle: pending -> verified -> resolved, no reverse transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "verified")]
    Verified,
    #[serde(rename = "resolved")]
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Verified => "verified",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "verified" => Some(ReportStatus::Verified),
            "resolved" => Some(ReportStatus::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceCategory {
    Hospital,
    #[serde(rename = "Evacuation Center")]
    EvacuationCenter,
    Hotline,
    Police,
    #[serde(rename = "Fire Station")]
    FireStation,
    Other,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceCategory::Hospital => "Hospital",
            ResourceCategory::EvacuationCenter => "Evacuation Center",
            ResourceCategory::Hotline => "Hotline",
            ResourceCategory::Police => "Police",
            ResourceCategory::FireStation => "Fire Station",
            ResourceCategory::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Hospital" => Some(ResourceCategory::Hospital),
            "Evacuation Center" => Some(ResourceCategory::EvacuationCenter),
            "Hotline" => Some(ResourceCategory::Hotline),
            "Police" => Some(ResourceCategory::Police),
            "Fire Station" => Some(ResourceCategory::FireStation),
            "Other" => Some(ResourceCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SafetyStatus {
    Safe,
    #[serde(rename = "Needs Help")]
    NeedsHelp,
    Missing,
}

impl SafetyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SafetyStatus::Safe => "Safe",
            SafetyStatus::NeedsHelp => "Needs Help",
            SafetyStatus::Missing => "Missing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Safe" => Some(SafetyStatus::Safe),
            "Needs Help" => Some(SafetyStatus::NeedsHelp),
            "Missing" => Some(SafetyStatus::Missing),
            _ => None,
        }
    }
}

/// Outward-facing account model. The password hash never leaves the
/// storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub disaster_type: DisasterType,
    pub location: String,
    pub description: String,
    pub status: ReportStatus,
    pub verified_by_admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    pub category: ResourceCategory,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub household_members: u32,
    pub meeting_point: Option<String>,
    pub evacuation_routes: Option<String>,
    pub supply_checklist: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyCheck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: SafetyStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serialization() {
        let admin = Role::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let user: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(user, Role::User);
    }

    #[test]
    fn role_string_conversion() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::from_str("user"), Some(Role::User));
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn safety_status_uses_display_labels() {
        let json = serde_json::to_string(&SafetyStatus::NeedsHelp).unwrap();
        assert_eq!(json, r#""Needs Help""#);
        assert_eq!(SafetyStatus::from_str("Needs Help"), Some(SafetyStatus::NeedsHelp));
    }

    #[test]
    fn report_status_roundtrip() {
        for status in [ReportStatus::Pending, ReportStatus::Verified, ReportStatus::Resolved] {
            assert_eq!(ReportStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn resource_category_two_word_labels() {
        assert_eq!(ResourceCategory::EvacuationCenter.as_str(), "Evacuation Center");
        assert_eq!(
            ResourceCategory::from_str("Fire Station"),
            Some(ResourceCategory::FireStation)
        );
        assert_eq!(ResourceCategory::from_str("fire station"), None);
    }
}
