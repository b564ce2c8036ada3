//! Localized catalog: embedded bundles merged with dynamic database rows.

pub mod bundle;
pub mod resolver;
pub mod types;

pub use bundle::bundle_for;
pub use resolver::{
    merge_localized, resolve_experience, resolve_faq, resolve_projects, resolve_templates,
    resolve_tools, Merged,
};
