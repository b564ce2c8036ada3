//! Localization via Fluent, with per-chat language stored in SQLite.

use std::collections::HashMap;
use std::sync::Arc;

use fluent_templates::{
    fluent_bundle::{FluentArgs, FluentValue},
    static_loader, Loader,
};
use once_cell::sync::Lazy;
use unic_langid::LanguageIdentifier;

use crate::storage::db;
use crate::storage::languages;

static_loader! {
    static LOCALES = {
        locales: "./locales",
        fallback_language: "en",
        customise: |bundle| bundle.set_use_isolating(false),
    };
}

/// Supported languages (code, human-readable name).
pub static SUPPORTED_LANGS: &[(&str, &str)] = &[
    ("en", "English"),
    ("ru", "Русский"),
    ("ua", "Українська"),
];

/// Default language identifier used as a fallback.
static DEFAULT_LANG: Lazy<LanguageIdentifier> = Lazy::new(|| "en".parse().unwrap());

/// Normalizes a language code into a LanguageIdentifier (falls back to default).
pub fn lang_from_code(code: &str) -> LanguageIdentifier {
    let normalized = match code.to_lowercase().as_str() {
        "en" | "en-us" | "en-gb" => "en",
        "ru" | "ru-ru" => "ru",
        "ua" | "uk" | "uk-ua" => "ua",
        other => return other.parse().unwrap_or_else(|_| DEFAULT_LANG.clone()),
    };

    normalized.parse().unwrap_or_else(|_| DEFAULT_LANG.clone())
}

/// Resolves the language code for a chat using an existing connection.
pub fn user_lang_code(conn: &db::DbConnection, chat_id: i64) -> String {
    match languages::get_user_language(conn, chat_id) {
        Ok(Some(code)) => code,
        _ => "en".to_string(),
    }
}

/// Resolves the language code for a chat using a connection pool.
pub fn user_lang_code_from_pool(db_pool: &Arc<db::DbPool>, chat_id: i64) -> String {
    if let Ok(conn) = db::get_connection(db_pool) {
        return user_lang_code(&conn, chat_id);
    }
    "en".to_string()
}

/// Returns a localized string for the given key.
/// Converts literal `\n` sequences to actual newlines for proper Telegram formatting.
pub fn t(lang: &LanguageIdentifier, key: &str) -> String {
    let text = LOCALES
        .lookup(lang, key)
        .unwrap_or_else(|| LOCALES.lookup(&DEFAULT_LANG, key).unwrap_or_else(|| key.to_string()));
    text.replace("\\n", "\n")
}

/// Returns a localized string with arguments for interpolation.
/// Converts literal `\n` sequences to actual newlines for proper Telegram formatting.
pub fn t_args(lang: &LanguageIdentifier, key: &str, args: &FluentArgs) -> String {
    let args_map: HashMap<String, FluentValue> =
        args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();

    let text = LOCALES.lookup_with_args(lang, key, &args_map).unwrap_or_else(|| {
        LOCALES
            .lookup_with_args(&DEFAULT_LANG, key, &args_map)
            .unwrap_or_else(|| key.to_string())
    });
    text.replace("\\n", "\n")
}

/// Finds a human-friendly name for a language code.
pub fn language_name(code: &str) -> &str {
    SUPPORTED_LANGS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// Checks if a language code is supported by the bot.
/// Returns the normalized language code if supported, None otherwise.
pub fn is_language_supported(code: &str) -> Option<&'static str> {
    let normalized = code.split('-').next().unwrap_or(code).to_lowercase();
    let normalized = if normalized == "uk" { "ua".to_string() } else { normalized };

    SUPPORTED_LANGS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(&normalized))
        .map(|(c, _)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_known_translation() {
        let en = lang_from_code("en");
        let ru = lang_from_code("ru");

        assert_eq!(t(&en, "lang-updated"), "✅ Language updated");
        assert_eq!(t(&ru, "lang-updated"), "✅ Язык обновлён");
    }

    #[test]
    fn converts_newlines() {
        let en = lang_from_code("en");
        let text = t(&en, "welcome");

        // Should contain actual newlines, not literal \n
        assert!(text.contains('\n'));
        assert!(!text.contains("\\n"));
    }

    #[test]
    fn missing_key_echoes_key() {
        let ru = lang_from_code("ru");
        assert_eq!(t(&ru, "no-such-key"), "no-such-key");
    }

    #[test]
    fn interpolates_arguments() {
        use fluent_templates::fluent_bundle::FluentArgs;

        let en = lang_from_code("en");
        let mut args = FluentArgs::new();
        args.set("id", 42);
        let text = t_args(&en, "admin-order-ready", &args);
        assert!(text.contains("42"));
    }

    #[test]
    fn test_is_language_supported() {
        assert_eq!(is_language_supported("en"), Some("en"));
        assert_eq!(is_language_supported("ru"), Some("ru"));
        assert_eq!(is_language_supported("ua"), Some("ua"));
        assert_eq!(is_language_supported("uk"), Some("ua"));

        assert_eq!(is_language_supported("en-US"), Some("en"));
        assert_eq!(is_language_supported("ru-RU"), Some("ru"));
        assert_eq!(is_language_supported("RU"), Some("ru"));

        assert_eq!(is_language_supported("es"), None);
        assert_eq!(is_language_supported("unknown"), None);
    }
}
