//! Lead (order) persistence and access codes.

use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, Result, ToSql};

use crate::core::config::access_code;
use crate::core::error::{AppError, AppResult};

/// Lifecycle status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    Pending,
    InProgress,
    Completed,
}

impl LeadStatus {
    /// Status value as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::InProgress => "in_progress",
            LeadStatus::Completed => "completed",
        }
    }

    /// Parse a stored status value. Unknown values fall back to `Pending`.
    pub fn parse(value: &str) -> Self {
        match value {
            "in_progress" => LeadStatus::InProgress,
            "completed" => LeadStatus::Completed,
            _ => LeadStatus::Pending,
        }
    }

    /// Status marker shown in chat messages.
    pub fn emoji(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "💤",
            LeadStatus::InProgress => "⏳",
            LeadStatus::Completed => "✅",
        }
    }
}

/// A stored lead.
#[derive(Debug, Clone)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub project_type: String,
    pub budget: String,
    pub deadline: Option<String>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub order_type: String,
    pub template_id: Option<String>,
    pub status: LeadStatus,
    pub telegram_chat_id: Option<i64>,
    pub access_code: String,
    pub materials_url: Option<String>,
    pub created_at: String,
}

/// Fields supplied when a lead is created.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub contact: String,
    pub project_type: String,
    pub budget: String,
    pub deadline: Option<String>,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub order_type: String,
    pub template_id: Option<String>,
}

const LEAD_COLUMNS: &str = "id, name, contact, project_type, budget, deadline, description, \
     payment_method, order_type, template_id, status, telegram_chat_id, access_code, \
     materials_url, created_at";

fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        project_type: row.get(3)?,
        budget: row.get(4)?,
        deadline: row.get(5)?,
        description: row.get(6)?,
        payment_method: row.get(7)?,
        order_type: row.get(8)?,
        template_id: row.get(9)?,
        status: LeadStatus::parse(&row.get::<_, String>(10)?),
        telegram_chat_id: row.get(11)?,
        access_code: row.get(12)?,
        materials_url: row.get(13)?,
        created_at: row.get(14)?,
    })
}

/// Generate an 8-character uppercase alphanumeric access code.
pub fn generate_access_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(access_code::LENGTH)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect()
}

/// Insert a new lead with a freshly generated access code.
///
/// On an access code collision the insert is retried with a new code, up to
/// `access_code::MAX_ATTEMPTS` times.
pub fn create_lead(conn: &Connection, new: &NewLead) -> AppResult<Lead> {
    for _ in 0..access_code::MAX_ATTEMPTS {
        let code = generate_access_code();
        let result = conn.execute(
            "INSERT INTO leads (name, contact, project_type, budget, deadline, description, \
             payment_method, order_type, template_id, access_code) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            &[
                &new.name as &dyn ToSql,
                &new.contact,
                &new.project_type,
                &new.budget,
                &new.deadline,
                &new.description,
                &new.payment_method,
                &new.order_type,
                &new.template_id,
                &code,
            ],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                return get_lead(conn, id)?.ok_or_else(|| {
                    AppError::Validation(format!("lead {} vanished after insert", id))
                });
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                log::warn!("Access code collision, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Validation(
        "could not generate a unique access code".to_string(),
    ))
}

/// Fetch a lead by id.
pub fn get_lead(conn: &Connection, id: i64) -> Result<Option<Lead>> {
    conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
        [id],
        lead_from_row,
    )
    .optional()
}

/// Fetch a lead by its access code (case-insensitive: codes are stored uppercase).
pub fn get_lead_by_access_code(conn: &Connection, code: &str) -> Result<Option<Lead>> {
    let code = code.trim().to_uppercase();
    conn.query_row(
        &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE access_code = ?1"),
        [&code],
        lead_from_row,
    )
    .optional()
}

/// All leads, newest first.
pub fn get_all_leads(conn: &Connection) -> Result<Vec<Lead>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY id DESC"))?;
    let rows = stmt.query_map([], lead_from_row)?;
    rows.collect()
}

/// Link a Telegram chat to a lead after a successful access code exchange.
pub fn set_lead_chat_id(conn: &Connection, id: i64, chat_id: i64) -> Result<()> {
    conn.execute(
        "UPDATE leads SET telegram_chat_id = ?1 WHERE id = ?2",
        &[&chat_id as &dyn ToSql, &id],
    )?;
    Ok(())
}

/// Update a lead status. When `materials_url` is given it is stored alongside,
/// otherwise the existing value is kept.
pub fn update_lead_status(
    conn: &Connection,
    id: i64,
    status: LeadStatus,
    materials_url: Option<&str>,
) -> Result<bool> {
    let changed = match materials_url {
        Some(url) => conn.execute(
            "UPDATE leads SET status = ?1, materials_url = ?2 WHERE id = ?3",
            &[&status.as_str() as &dyn ToSql, &url, &id],
        )?,
        None => conn.execute(
            "UPDATE leads SET status = ?1 WHERE id = ?2",
            &[&status.as_str() as &dyn ToSql, &id],
        )?,
    };
    Ok(changed > 0)
}

/// Find the most recently linked lead for a chat, if any.
pub fn find_lead_by_chat_id(conn: &Connection, chat_id: i64) -> Result<Option<Lead>> {
    conn.query_row(
        &format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE telegram_chat_id = ?1 ORDER BY id DESC LIMIT 1"
        ),
        [chat_id],
        lead_from_row,
    )
    .optional()
}

/// Total number of leads.
pub fn count_leads(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_code_format() {
        let code = generate_access_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [LeadStatus::Pending, LeadStatus::InProgress, LeadStatus::Completed] {
            assert_eq!(LeadStatus::parse(status.as_str()), status);
        }
        assert_eq!(LeadStatus::parse("bogus"), LeadStatus::Pending);
    }
}
