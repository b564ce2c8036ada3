//! Embedded localized catalog bundles.
//!
//! One JSON bundle per supported language is compiled into the binary. The
//! bundles are the static half of the catalog; dynamic rows from the database
//! are layered on top by the resolver.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

use super::types::{ExperienceEntry, FaqItem, Project, Template, TemplateResources, Tool};

/// A parsed catalog bundle for one language.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub marketplace_templates: Vec<Template>,
    #[serde(default)]
    pub projects_data: BTreeMap<String, Project>,
    #[serde(default)]
    pub marketplace_data: BTreeMap<String, TemplateResources>,
    #[serde(default)]
    pub tools_data: BTreeMap<String, Tool>,
    #[serde(default)]
    pub faq_data: BTreeMap<String, Vec<FaqItem>>,
    #[serde(default)]
    pub experience_data: BTreeMap<String, ExperienceEntry>,
}

impl Bundle {
    /// Resources for a template, if the bundle carries any.
    pub fn resources(&self, template_id: &str) -> Option<&TemplateResources> {
        self.marketplace_data.get(template_id)
    }
}

fn parse_bundle(raw: &str) -> Bundle {
    // Bundles are compiled in; a parse failure is a build defect.
    serde_json::from_str(raw).expect("embedded catalog bundle must be valid JSON")
}

static EN_BUNDLE: Lazy<Bundle> =
    Lazy::new(|| parse_bundle(include_str!("../../assets/catalog/en.json")));
static RU_BUNDLE: Lazy<Bundle> =
    Lazy::new(|| parse_bundle(include_str!("../../assets/catalog/ru.json")));
static UA_BUNDLE: Lazy<Bundle> =
    Lazy::new(|| parse_bundle(include_str!("../../assets/catalog/ua.json")));

/// Bundle for a language code, falling back to English.
pub fn bundle_for(lang: &str) -> &'static Bundle {
    match lang {
        "ru" => &RU_BUNDLE,
        "ua" => &UA_BUNDLE,
        _ => &EN_BUNDLE,
    }
}
