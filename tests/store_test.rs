//! Integration tests for the lead and language stores.

mod common;

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use common::{sample_lead, test_db};
use induktr_bot::storage::leads::{self, generate_access_code, LeadStatus};
use induktr_bot::storage::{get_connection, languages};

#[test]
fn create_lead_assigns_code_and_defaults() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let lead = leads::create_lead(&conn, &sample_lead()).unwrap();
    assert_eq!(lead.status, LeadStatus::Pending);
    assert_eq!(lead.access_code.len(), 8);
    assert!(lead.telegram_chat_id.is_none());
    assert!(lead.materials_url.is_none());
    assert_eq!(lead.name, "Alice Example");
}

#[test]
fn access_codes_do_not_collide() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        assert!(seen.insert(generate_access_code()), "duplicate access code");
    }
}

#[test]
fn stored_codes_stay_unique_across_many_leads() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let mut seen = HashSet::new();
    for _ in 0..200 {
        let lead = leads::create_lead(&conn, &sample_lead()).unwrap();
        assert!(seen.insert(lead.access_code));
    }
}

#[test]
fn access_code_lookup_is_case_insensitive() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let lead = leads::create_lead(&conn, &sample_lead()).unwrap();
    let found = leads::get_lead_by_access_code(&conn, &lead.access_code.to_lowercase())
        .unwrap()
        .unwrap();
    assert_eq!(found.id, lead.id);

    assert!(leads::get_lead_by_access_code(&conn, "NOPE1234").unwrap().is_none());
}

#[test]
fn chat_linking_and_lookup() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let lead = leads::create_lead(&conn, &sample_lead()).unwrap();
    leads::set_lead_chat_id(&conn, lead.id, 555).unwrap();

    let linked = leads::find_lead_by_chat_id(&conn, 555).unwrap().unwrap();
    assert_eq!(linked.id, lead.id);
    assert_eq!(linked.telegram_chat_id, Some(555));

    assert!(leads::find_lead_by_chat_id(&conn, 556).unwrap().is_none());
}

#[test]
fn status_update_keeps_materials_url_unless_given() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let lead = leads::create_lead(&conn, &sample_lead()).unwrap();

    assert!(leads::update_lead_status(
        &conn,
        lead.id,
        LeadStatus::Completed,
        Some("https://induktr.com/dl/a.zip"),
    )
    .unwrap());
    let after = leads::get_lead(&conn, lead.id).unwrap().unwrap();
    assert_eq!(after.status, LeadStatus::Completed);
    assert_eq!(after.materials_url.as_deref(), Some("https://induktr.com/dl/a.zip"));

    assert!(leads::update_lead_status(&conn, lead.id, LeadStatus::InProgress, None).unwrap());
    let after = leads::get_lead(&conn, lead.id).unwrap().unwrap();
    assert_eq!(after.status, LeadStatus::InProgress);
    assert_eq!(after.materials_url.as_deref(), Some("https://induktr.com/dl/a.zip"));

    assert!(!leads::update_lead_status(&conn, 9999, LeadStatus::Completed, None).unwrap());
}

#[test]
fn all_leads_are_listed_newest_first() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    let first = leads::create_lead(&conn, &sample_lead()).unwrap();
    let second = leads::create_lead(&conn, &sample_lead()).unwrap();

    let all = leads::get_all_leads(&conn).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
    assert_eq!(leads::count_leads(&conn).unwrap(), 2);
}

#[test]
fn language_preference_round_trip() {
    let db = test_db();
    let conn = get_connection(&db.pool).unwrap();

    assert!(languages::get_user_language(&conn, 1).unwrap().is_none());

    languages::set_user_language(&conn, 1, "ru").unwrap();
    assert_eq!(languages::get_user_language(&conn, 1).unwrap().as_deref(), Some("ru"));

    languages::set_user_language(&conn, 1, "ua").unwrap();
    assert_eq!(languages::get_user_language(&conn, 1).unwrap().as_deref(), Some("ua"));

    languages::set_user_language(&conn, 2, "en").unwrap();
    assert_eq!(languages::get_all_chat_ids(&conn).unwrap(), vec![1, 2]);
}
