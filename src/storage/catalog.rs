//! Dynamic catalog rows layered on top of the embedded bundles.
//!
//! Each kind lives in its own table with the same shape: a unique slug and a
//! JSON document keyed by language code.

use rusqlite::{Connection, Result, ToSql};

/// The catalog kinds the bot serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Projects,
    Marketplace,
    Tools,
    Faq,
    Experience,
}

impl CatalogKind {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            CatalogKind::Projects => "projects",
            CatalogKind::Marketplace => "marketplace",
            CatalogKind::Tools => "tools",
            CatalogKind::Faq => "faq",
            CatalogKind::Experience => "experience",
        }
    }
}

/// One dynamic catalog row. `data` is a JSON object keyed by language code,
/// e.g. `{"en": {...}, "ru": {...}}`.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub id: i64,
    pub slug: String,
    pub data: String,
    pub category: Option<String>,
    pub published: bool,
}

fn row_from_row(row: &rusqlite::Row<'_>) -> Result<CatalogRow> {
    Ok(CatalogRow {
        id: row.get(0)?,
        slug: row.get(1)?,
        data: row.get(2)?,
        category: row.get(3)?,
        published: row.get::<_, i64>(4)? != 0,
    })
}

/// All published rows of a kind, in insertion order (experience is ordered by
/// its explicit sort_order first).
pub fn list_published(conn: &Connection, kind: CatalogKind) -> Result<Vec<CatalogRow>> {
    let order = match kind {
        CatalogKind::Experience => "ORDER BY sort_order IS NULL, sort_order, id",
        _ => "ORDER BY id",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT id, slug, data, category, published FROM {} WHERE published = 1 {}",
        kind.table(),
        order
    ))?;
    let rows = stmt.query_map([], row_from_row)?;
    rows.collect()
}

/// Insert or replace a row by slug. Returns the row id.
pub fn upsert_row(
    conn: &Connection,
    kind: CatalogKind,
    slug: &str,
    data: &str,
    category: Option<&str>,
    published: bool,
) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {} (slug, data, category, published) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slug) DO UPDATE SET data = excluded.data,
                 category = excluded.category, published = excluded.published",
            kind.table()
        ),
        &[
            &slug as &dyn ToSql,
            &data,
            &category,
            &(published as i64),
        ],
    )?;
    conn.query_row(
        &format!("SELECT id FROM {} WHERE slug = ?1", kind.table()),
        [slug],
        |row| row.get(0),
    )
}
