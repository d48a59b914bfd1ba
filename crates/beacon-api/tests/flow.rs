//! End-to-end exercise of the registration, session, and report-moderation
//! flow against a throwaway database.

use beacon_api::auth::{authenticate_admin, authenticate_user, register_user};
use beacon_api::credentials;
use beacon_api::session::SessionGate;
use beacon_db::Database;
use beacon_types::api::RegisterRequest;
use beacon_types::models::{DisasterType, Role};
use tempfile::NamedTempFile;
use uuid::Uuid;

fn register_request(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        full_name: "Alice Santos".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: Some("555-0101".to_string()),
        address: None,
    }
}

fn seed_admin(db: &Database) -> Uuid {
    let admin_id = Uuid::new_v4();
    let hash = credentials::hash_password("Admin@123").unwrap();
    db.create_user(
        &admin_id.to_string(),
        "admin@beacon.local",
        "Beacon Admin",
        None,
        None,
        Role::Admin,
        &hash,
    )
    .unwrap();
    admin_id
}

#[test]
fn report_moderation_flow() {
    let tmp = NamedTempFile::new().unwrap();
    let db = Database::open(tmp.path()).unwrap();
    let gate = SessionGate::new("flow-test-secret".to_string());

    // Alice registers and logs in
    let alice = register_user(&db, &register_request("alice@example.com", "secret1")).unwrap();
    let (user_id, role) = authenticate_user(&db, "alice@example.com", "secret1").unwrap();
    assert_eq!(user_id, alice);
    assert_eq!(role, Role::User);

    let token = gate.establish(user_id, role).unwrap();
    assert_eq!(gate.resolve(&token), Some((alice, Role::User)));

    // She submits a flood report
    let report_id = Uuid::new_v4();
    db.insert_report(
        &report_id.to_string(),
        &alice.to_string(),
        DisasterType::Flood,
        "Main St",
        "Water rising past the curb",
    )
    .unwrap();

    let mine = db.list_reports_by_owner(&alice.to_string(), None).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, report_id.to_string());
    assert_eq!(mine[0].status, "pending");

    // The admin signs in and verifies it
    let admin_id = seed_admin(&db);
    let (resolved_admin, admin_role) =
        authenticate_admin(&db, "admin@beacon.local", "Admin@123").unwrap();
    assert_eq!(resolved_admin, admin_id);
    assert_eq!(admin_role, Role::Admin);

    let verified = db
        .verify_report(&report_id.to_string(), &admin_id.to_string())
        .unwrap();
    assert_eq!(verified.status, "verified");
    assert_eq!(
        verified.verified_by_admin_id.as_deref(),
        Some(admin_id.to_string().as_str())
    );

    // And later marks it resolved
    let resolved = db.resolve_report(&report_id.to_string()).unwrap();
    assert_eq!(resolved.status, "resolved");

    // Logging out ends Alice's session
    gate.terminate(&token);
    assert_eq!(gate.resolve(&token), None);
}
