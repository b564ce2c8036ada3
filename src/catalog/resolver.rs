//! Merge of the embedded catalog with dynamic database rows.
//!
//! Static entries seed the result in bundle order. Published dynamic rows
//! override a static entry with the same slug in place, and new slugs are
//! appended in row order. A row that fails to parse is skipped and logged,
//! and a storage failure degrades to the static bundle alone.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use super::bundle::bundle_for;
use super::types::{ExperienceEntry, FaqItem, Project, Template, Tool};
use crate::storage::catalog::{list_published, CatalogKind, CatalogRow};
use crate::storage::db::{get_connection, DbPool};

/// A catalog entry after the static/dynamic merge.
#[derive(Debug, Clone)]
pub struct Merged<T> {
    pub slug: String,
    pub item: T,
    pub is_from_db: bool,
    pub db_id: Option<i64>,
}

/// Pick the localized payload out of a dynamic row's JSON document.
///
/// The document is an object keyed by language code. Resolution order is the
/// requested language, then "en", then the first available language.
fn localized_value(doc: &serde_json::Value, lang: &str) -> Option<serde_json::Value> {
    let obj = doc.as_object()?;
    obj.get(lang)
        .or_else(|| obj.get("en"))
        .or_else(|| obj.values().next())
        .cloned()
}

/// Merge static entries with dynamic rows by slug.
pub fn merge_localized<T: DeserializeOwned>(
    statics: Vec<(String, T)>,
    rows: &[CatalogRow],
    lang: &str,
) -> Vec<Merged<T>> {
    let mut merged: Vec<Merged<T>> = Vec::with_capacity(statics.len() + rows.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for (slug, item) in statics {
        index.insert(slug.clone(), merged.len());
        merged.push(Merged { slug, item, is_from_db: false, db_id: None });
    }

    for row in rows {
        if !row.published {
            continue;
        }
        let doc: serde_json::Value = match serde_json::from_str(&row.data) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Skipping catalog row {} ({}): {}", row.id, row.slug, e);
                continue;
            }
        };
        let Some(value) = localized_value(&doc, lang) else {
            log::warn!("Catalog row {} ({}) has no language payloads", row.id, row.slug);
            continue;
        };
        let item: T = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(e) => {
                log::warn!("Skipping catalog row {} ({}): {}", row.id, row.slug, e);
                continue;
            }
        };

        let entry = Merged {
            slug: row.slug.clone(),
            item,
            is_from_db: true,
            db_id: Some(row.id),
        };
        match index.get(&row.slug) {
            Some(&pos) => merged[pos] = entry,
            None => {
                index.insert(row.slug.clone(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

fn fetch_rows(pool: &DbPool, kind: CatalogKind) -> Vec<CatalogRow> {
    let conn = match get_connection(pool) {
        Ok(conn) => conn,
        Err(e) => {
            log::warn!("Catalog fetch degraded to static data: {}", e);
            return Vec::new();
        }
    };
    match list_published(&conn, kind) {
        Ok(rows) => rows,
        Err(e) => {
            log::warn!("Catalog fetch degraded to static data: {}", e);
            Vec::new()
        }
    }
}

/// Merged marketplace templates for a language.
pub fn resolve_templates(pool: &DbPool, lang: &str) -> Vec<Merged<Template>> {
    let statics = bundle_for(lang)
        .marketplace_templates
        .iter()
        .map(|t| (t.id.clone(), t.clone()))
        .collect();
    merge_localized(statics, &fetch_rows(pool, CatalogKind::Marketplace), lang)
}

/// Merged portfolio projects for a language.
pub fn resolve_projects(pool: &DbPool, lang: &str) -> Vec<Merged<Project>> {
    let statics = bundle_for(lang)
        .projects_data
        .iter()
        .map(|(slug, p)| (slug.clone(), p.clone()))
        .collect();
    merge_localized(statics, &fetch_rows(pool, CatalogKind::Projects), lang)
}

/// Merged tools for a language.
pub fn resolve_tools(pool: &DbPool, lang: &str) -> Vec<Merged<Tool>> {
    let statics = bundle_for(lang)
        .tools_data
        .iter()
        .map(|(slug, t)| (slug.clone(), t.clone()))
        .collect();
    merge_localized(statics, &fetch_rows(pool, CatalogKind::Tools), lang)
}

/// Merged FAQ entries for a language. Static items get positional slugs
/// within their category; dynamic rows use their own slug.
pub fn resolve_faq(pool: &DbPool, lang: &str) -> Vec<Merged<FaqItem>> {
    let statics = bundle_for(lang)
        .faq_data
        .iter()
        .flat_map(|(category, items)| {
            items
                .iter()
                .enumerate()
                .map(move |(i, item)| (format!("{}-{}", category, i + 1), item.clone()))
        })
        .collect();
    merge_localized(statics, &fetch_rows(pool, CatalogKind::Faq), lang)
}

/// Merged experience timeline for a language.
pub fn resolve_experience(pool: &DbPool, lang: &str) -> Vec<Merged<ExperienceEntry>> {
    let statics = bundle_for(lang)
        .experience_data
        .iter()
        .map(|(slug, e)| (slug.clone(), e.clone()))
        .collect();
    merge_localized(statics, &fetch_rows(pool, CatalogKind::Experience), lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, slug: &str, data: &str) -> CatalogRow {
        CatalogRow {
            id,
            slug: slug.to_string(),
            data: data.to_string(),
            category: None,
            published: true,
        }
    }

    #[test]
    fn static_only_entries_are_not_from_db() {
        let statics = vec![("a".to_string(), 1u32), ("b".to_string(), 2u32)];
        let merged = merge_localized(statics, &[], "en");
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|m| !m.is_from_db && m.db_id.is_none()));
    }

    #[test]
    fn dynamic_row_overrides_static_in_place() {
        let statics = vec![("a".to_string(), 1u32), ("b".to_string(), 2u32)];
        let rows = [row(7, "a", r#"{"en": 10}"#)];
        let merged = merge_localized(statics, &rows, "en");
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].slug, "a");
        assert_eq!(merged[0].item, 10);
        assert!(merged[0].is_from_db);
        assert_eq!(merged[0].db_id, Some(7));
    }

    #[test]
    fn unknown_slug_is_appended_in_row_order() {
        let statics = vec![("a".to_string(), 1u32)];
        let rows = [row(1, "b", r#"{"en": 2}"#), row(2, "c", r#"{"en": 3}"#)];
        let merged = merge_localized(statics, &rows, "en");
        let slugs: Vec<&str> = merged.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b", "c"]);
    }

    #[test]
    fn invalid_json_row_is_skipped() {
        let statics = vec![("a".to_string(), 1u32)];
        let rows = [row(1, "b", "not json"), row(2, "c", r#"{"en": "string"}"#)];
        let merged = merge_localized(statics, &rows, "en");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].slug, "a");
    }

    #[test]
    fn language_falls_back_to_english_then_first() {
        let rows = [row(1, "a", r#"{"en": 1, "ru": 2}"#), row(2, "b", r#"{"ru": 3}"#)];
        let merged: Vec<Merged<u32>> = merge_localized(Vec::new(), &rows, "ua");
        assert_eq!(merged[0].item, 1);
        assert_eq!(merged[1].item, 3);
    }

    #[test]
    fn unpublished_rows_are_ignored() {
        let mut r = row(1, "a", r#"{"en": 1}"#);
        r.published = false;
        let merged: Vec<Merged<u32>> = merge_localized(Vec::new(), &[r], "en");
        assert!(merged.is_empty());
    }
}
