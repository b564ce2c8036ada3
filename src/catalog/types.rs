//! Catalog item shapes shared by the embedded bundles and dynamic rows.

use serde::Deserialize;

/// A marketplace template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    pub price: String,
    pub description: String,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A portfolio project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

/// One page of template documentation.
#[derive(Debug, Clone, Deserialize)]
pub struct DocPage {
    pub id: String,
    pub title: String,
    pub content: String,
}

/// A roadmap task inside a stage.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapTask {
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

/// One roadmap stage of a template.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapStage {
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub tasks: Vec<RoadmapTask>,
}

/// A linked video resource.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoResource {
    pub title: String,
    pub duration: String,
    pub url: String,
}

/// Extra resources attached to a marketplace template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateResources {
    #[serde(default)]
    pub docs: Vec<DocPage>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapStage>,
    #[serde(default)]
    pub videos: Vec<VideoResource>,
}

/// A tool from the tools page.
#[derive(Debug, Clone, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
}

/// A question/answer pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// One entry of the experience timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub period: String,
    pub summary: String,
}
