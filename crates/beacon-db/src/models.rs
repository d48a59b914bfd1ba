/// Database row types — these map directly to SQLite rows.
/// Distinct from the beacon-types API models to keep the storage layer
/// independent of serialization concerns.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: String,
}

pub struct ArticleRow {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub content: String,
    pub published_at: String,
}

#[derive(Debug)]
pub struct ReportRow {
    pub id: String,
    pub user_id: String,
    pub disaster_type: String,
    pub location: String,
    pub description: String,
    pub status: String,
    pub verified_by_admin_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug)]
pub struct ResourceRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: String,
}

pub struct PlanRow {
    pub id: String,
    pub user_id: String,
    pub household_members: u32,
    pub meeting_point: Option<String>,
    pub evacuation_routes: Option<String>,
    pub supply_checklist: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

pub struct SafetyCheckRow {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub note: Option<String>,
    pub created_at: String,
}
