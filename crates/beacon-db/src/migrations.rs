use crate::error::StoreError;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            email           TEXT NOT NULL UNIQUE,
            full_name       TEXT NOT NULL,
            phone           TEXT,
            address         TEXT,
            role            TEXT NOT NULL DEFAULT 'user',
            password_hash   TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS articles (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            category        TEXT,
            content         TEXT NOT NULL,
            published_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS community_reports (
            id                      TEXT PRIMARY KEY,
            user_id                 TEXT NOT NULL REFERENCES users(id),
            disaster_type           TEXT NOT NULL,
            location                TEXT NOT NULL,
            description             TEXT NOT NULL,
            status                  TEXT NOT NULL DEFAULT 'pending',
            verified_by_admin_id    TEXT REFERENCES users(id),
            created_at              TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_reports_owner
            ON community_reports(user_id, created_at);

        CREATE TABLE IF NOT EXISTS resources (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            category    TEXT NOT NULL,
            address     TEXT,
            contact     TEXT,
            latitude    REAL,
            longitude   REAL,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS emergency_plans (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL REFERENCES users(id),
            household_members   INTEGER NOT NULL DEFAULT 1,
            meeting_point       TEXT,
            evacuation_routes   TEXT,
            supply_checklist    TEXT,
            notes               TEXT,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_plans_owner
            ON emergency_plans(user_id, created_at);

        CREATE TABLE IF NOT EXISTS safety_checks (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            status      TEXT NOT NULL,
            note        TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_checks_owner
            ON safety_checks(user_id, created_at);

        -- Seed the starter articles
        INSERT OR IGNORE INTO articles (id, title, category, content) VALUES
            ('00000000-0000-0000-0000-0000000000a1', 'Emergency Kit Guide', 'Emergency Kit Guide',
             'Pack water, food, first aid, flashlight, radio.'),
            ('00000000-0000-0000-0000-0000000000a2', 'Contingency Plan Basics', 'Contingency Plan',
             'Define roles, routes, contacts, and drills.'),
            ('00000000-0000-0000-0000-0000000000a3', 'Typhoon Safety Tips', 'Article',
             'Secure windows, monitor advisories, prepare evacuation.');
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
