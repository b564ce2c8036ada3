//! Message and keyboard construction for everything the bot sends.

use fluent_templates::fluent_bundle::FluentArgs;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use unic_langid::LanguageIdentifier;

use crate::catalog::types::{DocPage, Project, RoadmapStage, Template, VideoResource};
use crate::catalog::Merged;
use crate::i18n::{t, t_args};
use crate::storage::leads::{Lead, LeadStatus};

use super::markdown::to_telegram_html;

fn btn(text: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), data.into())
}

/// Inline keyboard offered by /lang.
pub fn language_keyboard() -> InlineKeyboardMarkup {
    let flags = [("en", "🇺🇸"), ("ru", "🇷🇺"), ("ua", "🇺🇦")];
    let row: Vec<InlineKeyboardButton> = flags
        .iter()
        .map(|(code, flag)| {
            btn(
                format!("{} {}", flag, crate::i18n::language_name(code)),
                format!("set_lang:{code}"),
            )
        })
        .collect();
    InlineKeyboardMarkup::new(vec![row])
}

/// Marketplace listing: one button per merged template.
pub fn marketplace(
    lang: &LanguageIdentifier,
    templates: &[Merged<Template>],
) -> (String, InlineKeyboardMarkup) {
    let rows: Vec<Vec<InlineKeyboardButton>> = templates
        .iter()
        .map(|m| {
            vec![btn(
                format!("🛒 {} - ${}", m.item.title, m.item.price),
                format!("view_template:{}", m.slug),
            )]
        })
        .collect();
    (t(lang, "marketplace-title"), InlineKeyboardMarkup::new(rows))
}

/// Portfolio listing: one button per merged project.
pub fn portfolio(
    lang: &LanguageIdentifier,
    projects: &[Merged<Project>],
) -> (String, InlineKeyboardMarkup) {
    let rows: Vec<Vec<InlineKeyboardButton>> = projects
        .iter()
        .map(|m| {
            vec![btn(
                format!("🚀 {} ({})", m.item.title, m.item.status),
                format!("view_project:{}", m.slug),
            )]
        })
        .collect();
    (t(lang, "portfolio-title"), InlineKeyboardMarkup::new(rows))
}

/// Full template card with navigation to roadmap, docs, videos and purchase.
pub fn template_detail(
    lang: &LanguageIdentifier,
    merged: &Merged<Template>,
) -> (String, InlineKeyboardMarkup) {
    let temp = &merged.item;
    let features = temp
        .features
        .iter()
        .map(|f| format!("• {}", to_telegram_html(f)))
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "🛍️ <b>{}</b>\n\n💰 <b>{}:</b> ${}\n\n📝 <b>{}:</b> {}\n\n🛠️ <b>{}:</b> {}\n\n✨ <b>{}:</b>\n{}",
        temp.title,
        t(lang, "label-price"),
        temp.price,
        t(lang, "label-description"),
        to_telegram_html(&temp.description),
        t(lang, "label-stack"),
        temp.stack.join(", "),
        t(lang, "label-features"),
        features,
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            btn(format!("🗺️ {}", t(lang, "roadmap-btn")), format!("show_roadmap:{}", merged.slug)),
            btn(format!("📚 {}", t(lang, "docs-btn")), format!("show_docs:{}", merged.slug)),
        ],
        vec![
            btn(format!("🎬 {}", t(lang, "videos-btn")), format!("show_videos:{}", merged.slug)),
            btn(format!("💳 {}", t(lang, "buy-btn")), format!("buy_template:{}", merged.slug)),
        ],
        vec![btn(format!("⬅️ {}", t(lang, "back-to-shop")), "goto_marketplace")],
    ]);

    (message, keyboard)
}

/// Roadmap view for a template.
pub fn roadmap(
    lang: &LanguageIdentifier,
    template_id: &str,
    stages: &[RoadmapStage],
) -> (String, InlineKeyboardMarkup) {
    let mut args = FluentArgs::new();
    args.set("id", template_id.to_uppercase());
    let mut message = t_args(lang, "roadmap-title", &args) + "\n\n";

    for stage in stages {
        let status_icon = match stage.status.as_str() {
            "completed" => "✅",
            "in-progress" => "⏳",
            _ => "💤",
        };
        message.push_str(&format!("{} <b>{}</b>\n", status_icon, stage.title));
        for task in &stage.tasks {
            let marker = if task.completed { "🔹" } else { "▫️" };
            message.push_str(&format!("  {} {}\n", marker, task.label));
        }
        message.push('\n');
    }

    let keyboard = InlineKeyboardMarkup::new(vec![vec![btn(
        format!("⬅️ {}", t(lang, "back-to-template")),
        format!("view_template:{}", template_id),
    )]]);

    (message, keyboard)
}

/// Documentation index for a template.
pub fn docs_index(
    lang: &LanguageIdentifier,
    template_id: &str,
    docs: &[DocPage],
) -> (String, InlineKeyboardMarkup) {
    let mut args = FluentArgs::new();
    args.set("id", template_id.to_uppercase());
    let message = t_args(lang, "knowledge-base", &args);

    let mut rows: Vec<Vec<InlineKeyboardButton>> = docs
        .iter()
        .map(|page| {
            vec![btn(
                format!("📄 {}", page.title),
                format!("show_doc_page:{}:{}", template_id, page.id),
            )]
        })
        .collect();
    rows.push(vec![btn(
        format!("⬅️ {}", t(lang, "back-to-template")),
        format!("view_template:{}", template_id),
    )]);

    (message, InlineKeyboardMarkup::new(rows))
}

/// A single documentation page.
pub fn doc_page(
    lang: &LanguageIdentifier,
    template_id: &str,
    page: &DocPage,
) -> (String, InlineKeyboardMarkup) {
    let message = format!("📄 <b>{}</b>\n\n{}", page.title, to_telegram_html(&page.content));
    let keyboard = InlineKeyboardMarkup::new(vec![vec![btn(
        format!("⬅️ {}", t(lang, "back-to-docs")),
        format!("show_docs:{}", template_id),
    )]]);
    (message, keyboard)
}

/// Video material list for a template.
pub fn videos(
    lang: &LanguageIdentifier,
    template_id: &str,
    videos: &[VideoResource],
) -> (String, InlineKeyboardMarkup) {
    let mut args = FluentArgs::new();
    args.set("id", template_id.to_uppercase());
    let mut message = t_args(lang, "video-materials", &args) + "\n\n";

    let duration_label = t(lang, "label-duration");
    let watch_text = t(lang, "watch-in-browser");
    for video in videos {
        message.push_str(&format!("🎬 <b>{}</b>\n", video.title));
        message.push_str(&format!("⏱ {}: {}\n", duration_label, video.duration));
        message.push_str(&format!("🔗 <a href=\"{}\">{}</a>\n\n", video.url, watch_text));
    }

    let keyboard = InlineKeyboardMarkup::new(vec![vec![btn(
        format!("⬅️ {}", t(lang, "back-to-template")),
        format!("view_template:{}", template_id),
    )]]);

    (message, keyboard)
}

/// Full project card.
pub fn project_detail(
    lang: &LanguageIdentifier,
    merged: &Merged<Project>,
) -> (String, InlineKeyboardMarkup) {
    let proj = &merged.item;
    let message = format!(
        "🚀 <b>{}</b>\n\n📍 <b>{}:</b> {}\n🏷️ <b>{}:</b> {}\n\n📝 <b>{}:</b> {}\n\n🛠️ <b>{}:</b> {}",
        proj.title,
        t(lang, "label-status"),
        proj.status,
        t(lang, "label-categories"),
        proj.categories.join(", "),
        t(lang, "label-about"),
        to_telegram_html(&proj.description),
        t(lang, "label-stack"),
        proj.tech_stack.join(", "),
    );

    let keyboard = InlineKeyboardMarkup::new(vec![vec![btn(
        format!("⬅️ {}", t(lang, "back-to-portfolio")),
        "goto_portfolio",
    )]]);

    (message, keyboard)
}

/// Purchase instructions for a template.
pub fn purchase(
    lang: &LanguageIdentifier,
    merged: &Merged<Template>,
) -> (String, InlineKeyboardMarkup) {
    let mut args = FluentArgs::new();
    args.set("title", merged.item.title.clone());
    args.set("price", merged.item.price.clone());
    let message = t_args(lang, "buy-purchase-title", &args);

    let keyboard = InlineKeyboardMarkup::new(vec![vec![btn(
        format!("⬅️ {}", t(lang, "back-to-marketplace")),
        "goto_marketplace",
    )]]);

    (message, keyboard)
}

/// Admin /leads listing.
pub fn leads_list(lang: &LanguageIdentifier, leads: &[Lead]) -> String {
    let mut response = t(lang, "orders-list") + "\n\n";
    let connected_label = t(lang, "label-connected");
    let status_label = t(lang, "label-status");
    let code_label = t(lang, "label-code");

    for lead in leads {
        let type_emoji = if lead.order_type == "template" { "🛍️" } else { "🚀" };
        let status_key = match lead.status {
            LeadStatus::Completed => "status-completed",
            LeadStatus::InProgress => "status-in-progress",
            LeadStatus::Pending => "status-new",
        };
        let status_val = t(lang, status_key);

        response.push_str(&format!("{} #<b>{}</b> | {}\n", type_emoji, lead.id, lead.name));
        response.push_str(&format!(
            "   <b>{}:</b> {} {}\n",
            status_label,
            lead.status.emoji(),
            status_val
        ));
        response.push_str(&format!("   <b>{}:</b> <code>{}</code>\n", code_label, lead.access_code));
        if lead.telegram_chat_id.is_some() {
            response.push_str(&format!("   TG: {} ✅\n", connected_label));
        }
        response.push_str("-------------------\n");
    }

    response
}

/// Admin notification block for a freshly created lead.
pub fn new_lead_admin(lead: &Lead) -> String {
    format!(
        "🔔 <b>New Lead Received!</b>\n\n👤 <b>Name:</b> {}\n📞 <b>Contact:</b> {}\n📂 <b>Type:</b> {}\n💰 <b>Budget:</b> {}\n🕒 <b>Deadline:</b> {}\n\n💬 <b>Description:</b>\n{}\n\n🔑 <b>Access Code:</b> <code>{}</code>",
        lead.name,
        lead.contact,
        lead.project_type,
        lead.budget,
        lead.deadline.as_deref().unwrap_or("Not specified"),
        lead.description.as_deref().unwrap_or(""),
        lead.access_code,
    )
}

/// Status action buttons attached to the new-lead notification.
pub fn lead_action_keyboard(lead_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        btn("⏳ In progress", format!("process_{lead_id}")),
        btn("✅ Approve", format!("approve_{lead_id}")),
    ]])
}
