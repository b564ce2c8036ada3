//! Per-chat language preference storage.

use rusqlite::{Connection, OptionalExtension, Result, ToSql};

/// Stored language code for a chat, if the user ever picked one.
pub fn get_user_language(conn: &Connection, chat_id: i64) -> Result<Option<String>> {
    conn.query_row(
        "SELECT lang FROM chat_languages WHERE chat_id = ?1",
        [chat_id],
        |row| row.get(0),
    )
    .optional()
}

/// Save a language choice, replacing any previous one.
pub fn set_user_language(conn: &Connection, chat_id: i64, lang: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO chat_languages (chat_id, lang) VALUES (?1, ?2)
         ON CONFLICT(chat_id) DO UPDATE SET lang = excluded.lang, updated_at = CURRENT_TIMESTAMP",
        &[&chat_id as &dyn ToSql, &lang],
    )?;
    Ok(())
}

/// All chat ids that ever interacted with the language picker.
/// Used as the broadcast audience for the agent API.
pub fn get_all_chat_ids(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT chat_id FROM chat_languages ORDER BY chat_id")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}
