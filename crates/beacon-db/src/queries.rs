use crate::Database;
use crate::error::StoreError;
use crate::models::{ArticleRow, PlanRow, ReportRow, ResourceRow, SafetyCheckRow, UserRow};
use beacon_types::models::{DisasterType, ReportStatus, ResourceCategory, Role, SafetyStatus};
use rusqlite::{Connection, OptionalExtension, params};

impl Database {
    // -- Users --

    /// Insert a new account. The caller is responsible for normalizing the
    /// email; uniqueness is enforced by the store.
    pub fn create_user(
        &self,
        id: &str,
        email: &str,
        full_name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        role: Role,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, full_name, phone, address, role, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, email, full_name, phone, address, role.as_str(), password_hash],
            )
            .map_err(map_user_insert_err)?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(&format!("{USER_COLUMNS} WHERE email = ?1"))?
                .query_row([email], map_user)
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(&format!("{USER_COLUMNS} WHERE id = ?1"))?
                .query_row([id], map_user)
                .optional()?;
            Ok(row)
        })
    }

    /// Update contact details; `None` keeps the stored value.
    pub fn update_profile(
        &self,
        id: &str,
        full_name: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET
                     full_name = COALESCE(?2, full_name),
                     phone     = COALESCE(?3, phone),
                     address   = COALESCE(?4, address)
                 WHERE id = ?1",
                params![id, full_name, phone, address],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            conn.prepare(&format!("{USER_COLUMNS} WHERE id = ?1"))?
                .query_row([id], map_user)
                .optional()?
                .ok_or(StoreError::NotFound)
        })
    }

    pub fn list_users(&self, limit: Option<u32>) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{USER_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))?
                .query_map([sql_limit(limit)], map_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Articles --

    pub fn list_articles(&self, limit: Option<u32>) -> Result<Vec<ArticleRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(
                    "SELECT id, title, category, content, published_at FROM articles
                     ORDER BY published_at DESC, id DESC LIMIT ?1",
                )?
                .query_map([sql_limit(limit)], map_article)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Community reports --

    pub fn insert_report(
        &self,
        id: &str,
        user_id: &str,
        disaster_type: DisasterType,
        location: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO community_reports (id, user_id, disaster_type, location, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, user_id, disaster_type.as_str(), location, description],
            )?;
            Ok(())
        })
    }

    pub fn get_report(&self, id: &str) -> Result<Option<ReportRow>, StoreError> {
        self.with_conn(|conn| query_report(conn, id))
    }

    pub fn list_reports_by_owner(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ReportRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{REPORT_COLUMNS} WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC LIMIT ?2"
                ))?
                .query_map(params![user_id, sql_limit(limit)], map_report)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_reports(&self, limit: Option<u32>) -> Result<Vec<ReportRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{REPORT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))?
                .query_map([sql_limit(limit)], map_report)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// pending -> verified, stamping the verifying admin. The conditional
    /// UPDATE keeps the transition a single atomic statement; the follow-up
    /// read only classifies a failure.
    pub fn verify_report(&self, id: &str, admin_id: &str) -> Result<ReportRow, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE community_reports
                 SET status = 'verified', verified_by_admin_id = ?2
                 WHERE id = ?1 AND status = 'pending'",
                params![id, admin_id],
            )?;
            if changed == 0 {
                let row = query_report(conn, id)?.ok_or(StoreError::NotFound)?;
                let from = ReportStatus::from_str(&row.status).unwrap_or(ReportStatus::Resolved);
                return Err(StoreError::InvalidTransition {
                    from,
                    action: "verify",
                });
            }
            query_report(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    /// verified -> resolved.
    pub fn resolve_report(&self, id: &str) -> Result<ReportRow, StoreError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE community_reports
                 SET status = 'resolved'
                 WHERE id = ?1 AND status = 'verified'",
                [id],
            )?;
            if changed == 0 {
                let row = query_report(conn, id)?.ok_or(StoreError::NotFound)?;
                let from = ReportStatus::from_str(&row.status).unwrap_or(ReportStatus::Resolved);
                return Err(StoreError::InvalidTransition {
                    from,
                    action: "resolve",
                });
            }
            query_report(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    // -- Resources --

    /// Insert when `id` is `None`, update otherwise. `updated_at` is
    /// refreshed on every write.
    pub fn upsert_resource(
        &self,
        id: Option<&str>,
        fresh_id: &str,
        name: &str,
        category: ResourceCategory,
        address: Option<&str>,
        contact: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<ResourceRow, StoreError> {
        self.with_conn(|conn| {
            let id = match id {
                Some(existing) => {
                    let changed = conn.execute(
                        "UPDATE resources SET
                             name = ?2, category = ?3, address = ?4, contact = ?5,
                             latitude = ?6, longitude = ?7, updated_at = datetime('now')
                         WHERE id = ?1",
                        params![existing, name, category.as_str(), address, contact, latitude, longitude],
                    )?;
                    if changed == 0 {
                        return Err(StoreError::NotFound);
                    }
                    existing
                }
                None => {
                    conn.execute(
                        "INSERT INTO resources (id, name, category, address, contact, latitude, longitude)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![fresh_id, name, category.as_str(), address, contact, latitude, longitude],
                    )?;
                    fresh_id
                }
            };
            conn.prepare(&format!("{RESOURCE_COLUMNS} WHERE id = ?1"))?
                .query_row([id], map_resource)
                .optional()?
                .ok_or(StoreError::NotFound)
        })
    }

    /// Public directory ordering: grouped by category, then by name.
    pub fn list_resources_by_category(&self) -> Result<Vec<ResourceRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!("{RESOURCE_COLUMNS} ORDER BY category ASC, name ASC"))?
                .query_map([], map_resource)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_resources(&self, limit: Option<u32>) -> Result<Vec<ResourceRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{RESOURCE_COLUMNS} ORDER BY updated_at DESC, id DESC LIMIT ?1"
                ))?
                .query_map([sql_limit(limit)], map_resource)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Emergency plans --

    pub fn insert_plan(
        &self,
        id: &str,
        user_id: &str,
        household_members: u32,
        meeting_point: Option<&str>,
        evacuation_routes: Option<&str>,
        supply_checklist: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO emergency_plans
                     (id, user_id, household_members, meeting_point, evacuation_routes, supply_checklist, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![id, user_id, household_members, meeting_point, evacuation_routes, supply_checklist, notes],
            )?;
            Ok(())
        })
    }

    pub fn list_plans_by_owner(&self, user_id: &str) -> Result<Vec<PlanRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{PLAN_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
                ))?
                .query_map([user_id], map_plan)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn latest_plan(&self, user_id: &str) -> Result<Option<PlanRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(&format!(
                    "{PLAN_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1"
                ))?
                .query_row([user_id], map_plan)
                .optional()?;
            Ok(row)
        })
    }

    // -- Safety checks --

    pub fn insert_safety_check(
        &self,
        id: &str,
        user_id: &str,
        status: SafetyStatus,
        note: Option<&str>,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO safety_checks (id, user_id, status, note) VALUES (?1, ?2, ?3, ?4)",
                params![id, user_id, status.as_str(), note],
            )?;
            Ok(())
        })
    }

    pub fn list_safety_by_owner(&self, user_id: &str) -> Result<Vec<SafetyCheckRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{CHECK_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
                ))?
                .query_map([user_id], map_check)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Append-only history: the newest entry is the current status.
    pub fn latest_safety_check(&self, user_id: &str) -> Result<Option<SafetyCheckRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(&format!(
                    "{CHECK_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1"
                ))?
                .query_row([user_id], map_check)
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_safety_checks(&self, limit: Option<u32>) -> Result<Vec<SafetyCheckRow>, StoreError> {
        self.with_conn(|conn| {
            let rows = conn
                .prepare(&format!(
                    "{CHECK_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?1"
                ))?
                .query_map([sql_limit(limit)], map_check)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const USER_COLUMNS: &str =
    "SELECT id, email, full_name, phone, address, role, password_hash, created_at FROM users";
const REPORT_COLUMNS: &str =
    "SELECT id, user_id, disaster_type, location, description, status, verified_by_admin_id, created_at
     FROM community_reports";
const RESOURCE_COLUMNS: &str =
    "SELECT id, name, category, address, contact, latitude, longitude, updated_at FROM resources";
const PLAN_COLUMNS: &str =
    "SELECT id, user_id, household_members, meeting_point, evacuation_routes, supply_checklist, notes, created_at
     FROM emergency_plans";
const CHECK_COLUMNS: &str = "SELECT id, user_id, status, note, created_at FROM safety_checks";

/// SQLite treats a negative LIMIT as "no limit".
fn sql_limit(limit: Option<u32>) -> i64 {
    limit.map(i64::from).unwrap_or(-1)
}

fn map_user_insert_err(e: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref err, Some(ref msg)) = e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("users.email") {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(e)
}

fn query_report(conn: &Connection, id: &str) -> Result<Option<ReportRow>, StoreError> {
    let row = conn
        .prepare(&format!("{REPORT_COLUMNS} WHERE id = ?1"))?
        .query_row([id], map_report)
        .optional()?;
    Ok(row)
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        role: row.get(5)?,
        password_hash: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok(ArticleRow {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        content: row.get(3)?,
        published_at: row.get(4)?,
    })
}

fn map_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        disaster_type: row.get(2)?,
        location: row.get(3)?,
        description: row.get(4)?,
        status: row.get(5)?,
        verified_by_admin_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_resource(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResourceRow> {
    Ok(ResourceRow {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        address: row.get(3)?,
        contact: row.get(4)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_plan(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanRow> {
    Ok(PlanRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        household_members: row.get(2)?,
        meeting_point: row.get(3)?,
        evacuation_routes: row.get(4)?,
        supply_checklist: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_check(row: &rusqlite::Row<'_>) -> rusqlite::Result<SafetyCheckRow> {
    Ok(SafetyCheckRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: row.get(2)?,
        note: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    fn create_test_db() -> (Database, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::open(temp_file.path()).unwrap();
        (db, temp_file)
    }

    fn add_user(db: &Database, email: &str, role: Role) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, email, "Test Person", None, None, role, "hash")
            .unwrap();
        id
    }

    fn backdate(db: &Database, table: &str, id: &str, offset: &str) {
        db.with_conn(|conn| {
            conn.execute(
                &format!("UPDATE {table} SET created_at = datetime('now', ?1) WHERE id = ?2"),
                params![offset, id],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn duplicate_email_rejected() {
        let (db, _tmp) = create_test_db();
        add_user(&db, "a@b.com", Role::User);

        let err = db
            .create_user(
                &Uuid::new_v4().to_string(),
                "a@b.com",
                "Other Person",
                None,
                None,
                Role::User,
                "hash2",
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[test]
    fn profile_update_keeps_unset_fields() {
        let (db, _tmp) = create_test_db();
        let id = add_user(&db, "a@b.com", Role::User);

        let updated = db
            .update_profile(&id, None, Some("555-0101"), None)
            .unwrap();
        assert_eq!(updated.full_name, "Test Person");
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));

        let err = db
            .update_profile(&Uuid::new_v4().to_string(), Some("Nobody"), None, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn report_lifecycle_enforced() {
        let (db, _tmp) = create_test_db();
        let owner = add_user(&db, "owner@b.com", Role::User);
        let admin = add_user(&db, "admin@b.com", Role::Admin);

        let report_id = Uuid::new_v4().to_string();
        db.insert_report(&report_id, &owner, DisasterType::Flood, "Main St", "Knee-deep water")
            .unwrap();

        let report = db.get_report(&report_id).unwrap().unwrap();
        assert_eq!(report.status, "pending");
        assert!(report.verified_by_admin_id.is_none());

        // resolve before verify is rejected
        let err = db.resolve_report(&report_id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition { from: ReportStatus::Pending, action: "resolve" }
        ));

        let verified = db.verify_report(&report_id, &admin).unwrap();
        assert_eq!(verified.status, "verified");
        assert_eq!(verified.verified_by_admin_id.as_deref(), Some(admin.as_str()));

        // re-verify is rejected
        let err = db.verify_report(&report_id, &admin).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition { from: ReportStatus::Verified, action: "verify" }
        ));

        let resolved = db.resolve_report(&report_id).unwrap();
        assert_eq!(resolved.status, "resolved");

        // resolved is terminal
        let err = db.verify_report(&report_id, &admin).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition { from: ReportStatus::Resolved, action: "verify" }
        ));
    }

    #[test]
    fn transition_on_missing_report_is_not_found() {
        let (db, _tmp) = create_test_db();
        let admin = add_user(&db, "admin@b.com", Role::Admin);

        let err = db
            .verify_report(&Uuid::new_v4().to_string(), &admin)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn plans_are_owner_scoped_and_newest_first() {
        let (db, _tmp) = create_test_db();
        let alice = add_user(&db, "alice@b.com", Role::User);
        let bob = add_user(&db, "bob@b.com", Role::User);

        let old_plan = Uuid::new_v4().to_string();
        let new_plan = Uuid::new_v4().to_string();
        db.insert_plan(&old_plan, &alice, 2, Some("Park gate"), None, None, None)
            .unwrap();
        db.insert_plan(&new_plan, &alice, 4, Some("School gym"), None, None, None)
            .unwrap();
        db.insert_plan(&Uuid::new_v4().to_string(), &bob, 1, None, None, None, None)
            .unwrap();
        backdate(&db, "emergency_plans", &old_plan, "-1 day");

        let plans = db.list_plans_by_owner(&alice).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].id, new_plan);
        assert_eq!(plans[1].id, old_plan);

        let latest = db.latest_plan(&alice).unwrap().unwrap();
        assert_eq!(latest.household_members, 4);

        let stranger = db.list_plans_by_owner(&Uuid::new_v4().to_string()).unwrap();
        assert!(stranger.is_empty());
    }

    #[test]
    fn latest_safety_check_wins() {
        let (db, _tmp) = create_test_db();
        let user = add_user(&db, "a@b.com", Role::User);

        let first = Uuid::new_v4().to_string();
        db.insert_safety_check(&first, &user, SafetyStatus::NeedsHelp, Some("trapped upstairs"))
            .unwrap();
        backdate(&db, "safety_checks", &first, "-1 hour");
        db.insert_safety_check(&Uuid::new_v4().to_string(), &user, SafetyStatus::Safe, None)
            .unwrap();

        let current = db.latest_safety_check(&user).unwrap().unwrap();
        assert_eq!(current.status, "Safe");

        let history = db.list_safety_by_owner(&user).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, "Safe");
        assert_eq!(history[1].status, "Needs Help");
    }

    #[test]
    fn resource_upsert_refreshes_updated_at() {
        let (db, _tmp) = create_test_db();

        let created = db
            .upsert_resource(
                None,
                &Uuid::new_v4().to_string(),
                "City General",
                ResourceCategory::Hospital,
                Some("12 Health Ave"),
                Some("555-0199"),
                Some(14.5995),
                Some(120.9842),
            )
            .unwrap();
        assert_eq!(created.category, "Hospital");

        db.with_conn(|conn| {
            conn.execute(
                "UPDATE resources SET updated_at = datetime('now', '-1 day') WHERE id = ?1",
                [&created.id],
            )?;
            Ok(())
        })
        .unwrap();
        let stale = db.list_resources(None).unwrap();

        let updated = db
            .upsert_resource(
                Some(&created.id),
                &Uuid::new_v4().to_string(),
                "City General Hospital",
                ResourceCategory::Hospital,
                Some("12 Health Ave"),
                Some("555-0199"),
                Some(14.5995),
                Some(120.9842),
            )
            .unwrap();
        assert_eq!(updated.name, "City General Hospital");
        assert!(updated.updated_at > stale[0].updated_at);

        let err = db
            .upsert_resource(
                Some(&Uuid::new_v4().to_string()),
                &Uuid::new_v4().to_string(),
                "Ghost",
                ResourceCategory::Other,
                None,
                None,
                None,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn directory_groups_by_category_then_name() {
        let (db, _tmp) = create_test_db();
        for (name, category) in [
            ("Station 2", ResourceCategory::FireStation),
            ("City General", ResourceCategory::Hospital),
            ("Station 1", ResourceCategory::FireStation),
        ] {
            db.upsert_resource(None, &Uuid::new_v4().to_string(), name, category, None, None, None, None)
                .unwrap();
        }

        let directory = db.list_resources_by_category().unwrap();
        let names: Vec<&str> = directory.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Station 1", "Station 2", "City General"]);
    }

    #[test]
    fn seeded_articles_survive_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let db = Database::open(temp_file.path()).unwrap();
            assert_eq!(db.list_articles(None).unwrap().len(), 3);
        }
        // reopening re-runs migrations; seeding must be idempotent
        let db = Database::open(temp_file.path()).unwrap();
        let articles = db.list_articles(None).unwrap();
        assert_eq!(articles.len(), 3);

        let limited = db.list_articles(Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }
}
