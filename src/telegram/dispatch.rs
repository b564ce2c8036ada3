//! The command/callback dispatcher.
//!
//! The dispatcher owns the database pool and the admin chat id, and turns an
//! incoming message or callback query into a list of [`Action`]s. It never
//! talks to Telegram itself; the runner in [`super::schema`] performs the
//! actions. This keeps every conversation flow testable against a plain
//! SQLite file.

use std::sync::Arc;

use fluent_templates::fluent_bundle::FluentArgs;
use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::types::InlineKeyboardMarkup;
use unic_langid::LanguageIdentifier;

use crate::catalog::{bundle_for, resolve_projects, resolve_templates};
use crate::core::config;
use crate::i18n;
use crate::storage::db::{get_connection, DbConnection, DbPool};
use crate::storage::languages;
use crate::storage::leads::{self, LeadStatus};

use super::callbacks::CallbackCommand;
use super::markdown::to_telegram_html;
use super::views;

static START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/start(?:\s+(\S+))?$").unwrap());
static READY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/ready\s+(\d+)\s+(\S+)(?:\s+(.+))?$").unwrap());
static MSG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/msg\s+(.+)$").unwrap());
static ADMIN_MSG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s+(.+)$").unwrap());

/// Telegram appends `@botname` to commands sent in group chats.
fn strip_bot_mention(text: &str) -> String {
    if !text.starts_with('/') {
        return text.to_string();
    }
    match text.split_once(char::is_whitespace) {
        Some((cmd, rest)) => {
            let cmd = cmd.split('@').next().unwrap_or(cmd);
            format!("{cmd} {rest}")
        }
        None => text.split('@').next().unwrap_or(text).to_string(),
    }
}

/// An incoming text message, reduced to what the dispatcher needs.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub text: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// An incoming callback query, reduced to what the dispatcher needs.
#[derive(Debug, Clone)]
pub struct IncomingCallback {
    pub chat_id: i64,
    pub message_id: i32,
    pub message_text: Option<String>,
    pub data: String,
}

/// One outbound effect decided by the dispatcher.
#[derive(Debug, Clone)]
pub enum Action {
    /// Send an HTML message, optionally with an inline keyboard.
    Send {
        chat_id: i64,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    /// Answer the callback query that triggered this dispatch.
    AnswerCallback { text: Option<String> },
    /// Edit an existing message in place.
    EditText {
        chat_id: i64,
        message_id: i32,
        text: String,
    },
}

fn send(chat_id: i64, text: String) -> Action {
    Action::Send { chat_id, text, keyboard: None }
}

fn send_kb(chat_id: i64, text: String, keyboard: InlineKeyboardMarkup) -> Action {
    Action::Send { chat_id, text, keyboard: Some(keyboard) }
}

fn ack(text: Option<String>) -> Action {
    Action::AnswerCallback { text }
}

/// Routes commands and callbacks to conversation flows.
pub struct Dispatcher {
    db_pool: Arc<DbPool>,
    admin_chat_id: Option<i64>,
}

impl Dispatcher {
    pub fn new(db_pool: Arc<DbPool>, admin_chat_id: Option<i64>) -> Self {
        Self { db_pool, admin_chat_id }
    }

    fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_id == Some(chat_id)
    }

    fn conn(&self) -> Option<DbConnection> {
        match get_connection(&self.db_pool) {
            Ok(conn) => Some(conn),
            Err(e) => {
                log::error!("Database unavailable: {}", e);
                None
            }
        }
    }

    fn lang_of(&self, chat_id: i64) -> (String, LanguageIdentifier) {
        let code = i18n::user_lang_code_from_pool(&self.db_pool, chat_id);
        let lang = i18n::lang_from_code(&code);
        (code, lang)
    }

    /// Handle an incoming text message.
    pub fn handle_message(&self, msg: &IncomingMessage) -> Vec<Action> {
        let text = strip_bot_mention(msg.text.trim());
        let text = text.as_str();
        let (lang_code, lang) = self.lang_of(msg.chat_id);

        if let Some(caps) = START_RE.captures(text) {
            return self.handle_start(msg, &lang, caps.get(1).map(|m| m.as_str()));
        }
        if let Some(caps) = READY_RE.captures(text) {
            let order_id: i64 = caps[1].parse().unwrap_or(0);
            let url = caps[2].to_string();
            let custom = caps.get(3).map(|m| m.as_str().to_string());
            return self.handle_ready(msg.chat_id, &lang, order_id, &url, custom.as_deref());
        }
        if let Some(caps) = MSG_RE.captures(text) {
            let full = caps[1].trim().to_string();
            return self.handle_msg(msg, &lang, &full);
        }

        match text.split_whitespace().next().unwrap_or_default() {
            "/lang" => vec![send_kb(msg.chat_id, i18n::t(&lang, "lang-title"), views::language_keyboard())],
            "/marketplace" => self.marketplace_listing(msg.chat_id, &lang_code, &lang),
            "/portfolio" => self.portfolio_listing(msg.chat_id, &lang_code, &lang),
            "/about" => {
                let keyboard = InlineKeyboardMarkup::new(vec![vec![
                    teloxide::types::InlineKeyboardButton::callback(
                        i18n::t(&lang, "philosophy-btn"),
                        "philosophy_detail".to_string(),
                    ),
                ]]);
                vec![send_kb(msg.chat_id, i18n::t(&lang, "about-title"), keyboard)]
            }
            "/faq" => {
                let rows = ["general", "tech", "payments"]
                    .iter()
                    .map(|section| {
                        vec![teloxide::types::InlineKeyboardButton::callback(
                            i18n::t(&lang, &format!("btn-faq-{section}")),
                            format!("faq_{section}"),
                        )]
                    })
                    .collect::<Vec<_>>();
                vec![send_kb(msg.chat_id, i18n::t(&lang, "faq-title"), InlineKeyboardMarkup::new(rows))]
            }
            "/payment" => vec![send(msg.chat_id, i18n::t(&lang, "payment-title"))],
            "/leads" => self.handle_leads(msg.chat_id, &lang),
            cmd if cmd.starts_with('/') => Vec::new(),
            _ if self.is_admin(msg.chat_id) => Vec::new(),
            _ => self.forward_to_admin(msg, &lang, text),
        }
    }

    fn marketplace_listing(
        &self,
        chat_id: i64,
        lang_code: &str,
        lang: &LanguageIdentifier,
    ) -> Vec<Action> {
        let templates = resolve_templates(&self.db_pool, lang_code);
        let (text, keyboard) = views::marketplace(lang, &templates);
        vec![send_kb(chat_id, text, keyboard)]
    }

    fn portfolio_listing(
        &self,
        chat_id: i64,
        lang_code: &str,
        lang: &LanguageIdentifier,
    ) -> Vec<Action> {
        let projects = resolve_projects(&self.db_pool, lang_code);
        let (text, keyboard) = views::portfolio(lang, &projects);
        vec![send_kb(chat_id, text, keyboard)]
    }

    fn handle_start(
        &self,
        msg: &IncomingMessage,
        lang: &LanguageIdentifier,
        access_code: Option<&str>,
    ) -> Vec<Action> {
        let Some(code) = access_code else {
            return vec![send(msg.chat_id, to_telegram_html(&i18n::t(lang, "welcome")))];
        };

        let Some(conn) = self.conn() else { return Vec::new() };
        let lead = match leads::get_lead_by_access_code(&conn, code) {
            Ok(Some(lead)) => lead,
            Ok(None) => return vec![send(msg.chat_id, i18n::t(lang, "invalid-code"))],
            Err(e) => {
                log::error!("Access code lookup failed: {}", e);
                return Vec::new();
            }
        };

        if let Err(e) = leads::set_lead_chat_id(&conn, lead.id, msg.chat_id) {
            log::error!("Failed to link lead {} to chat {}: {}", lead.id, msg.chat_id, e);
        }

        let mut args = FluentArgs::new();
        args.set("id", lead.id);
        args.set("type", lead.project_type.clone());
        args.set("deadline", lead.deadline.clone().unwrap_or_else(|| "???".to_string()));
        let mut actions = vec![send(msg.chat_id, i18n::t_args(lang, "order-linked", &args))];

        if let Some(admin) = self.admin_chat_id {
            let admin_lang = i18n::lang_from_code(&i18n::user_lang_code(&conn, admin));
            let user_name = msg
                .username
                .clone()
                .or_else(|| msg.first_name.clone())
                .unwrap_or_else(|| "User".to_string());
            let mut args = FluentArgs::new();
            args.set("id", lead.id);
            args.set("name", lead.name.clone());
            args.set("user", user_name);
            args.set("chatId", msg.chat_id.to_string());
            actions.push(send(admin, i18n::t_args(&admin_lang, "lead-connected", &args)));
        }

        actions
    }

    fn handle_leads(&self, chat_id: i64, lang: &LanguageIdentifier) -> Vec<Action> {
        if !self.is_admin(chat_id) {
            return Vec::new();
        }
        let Some(conn) = self.conn() else { return Vec::new() };
        let leads = match leads::get_all_leads(&conn) {
            Ok(leads) => leads,
            Err(e) => {
                log::error!("Failed to list leads: {}", e);
                return Vec::new();
            }
        };
        if leads.is_empty() {
            return vec![send(chat_id, i18n::t(lang, "orders-empty"))];
        }
        vec![send(chat_id, views::leads_list(lang, &leads))]
    }

    fn handle_ready(
        &self,
        chat_id: i64,
        lang: &LanguageIdentifier,
        order_id: i64,
        url: &str,
        custom: Option<&str>,
    ) -> Vec<Action> {
        if !self.is_admin(chat_id) {
            return Vec::new();
        }
        let Some(conn) = self.conn() else { return Vec::new() };

        let lead = match leads::get_lead(&conn, order_id) {
            Ok(Some(lead)) => lead,
            Ok(None) => {
                let mut args = FluentArgs::new();
                args.set("id", order_id);
                return vec![send(chat_id, i18n::t_args(lang, "admin-order-not-found", &args))];
            }
            Err(e) => {
                log::error!("Failed to load lead {}: {}", order_id, e);
                return Vec::new();
            }
        };

        if let Err(e) = leads::update_lead_status(&conn, order_id, LeadStatus::Completed, Some(url)) {
            log::error!("Failed to complete lead {}: {}", order_id, e);
            return Vec::new();
        }

        let mut args = FluentArgs::new();
        args.set("id", order_id);
        let mut actions = vec![send(chat_id, i18n::t_args(lang, "admin-order-ready", &args))];

        if let Some(client_chat) = lead.telegram_chat_id {
            let client_lang = i18n::lang_from_code(&i18n::user_lang_code(&conn, client_chat));
            let comment = custom
                .map(|c| {
                    format!(
                        "\n\n💬 <b>{}:</b>\n<i>{}</i>",
                        i18n::t(&client_lang, "comment-label"),
                        c
                    )
                })
                .unwrap_or_default();
            let mut args = FluentArgs::new();
            args.set("url", url.to_string());
            args.set("custom", comment);
            actions.push(send(client_chat, i18n::t_args(&client_lang, "order-ready-client", &args)));
        }

        actions
    }

    fn handle_msg(
        &self,
        msg: &IncomingMessage,
        lang: &LanguageIdentifier,
        full: &str,
    ) -> Vec<Action> {
        if self.is_admin(msg.chat_id) {
            let Some(caps) = ADMIN_MSG_RE.captures(full) else {
                return vec![send(msg.chat_id, i18n::t(lang, "admin-format"))];
            };
            let order_id: i64 = caps[1].parse().unwrap_or(0);
            let text_to_client = caps[2].to_string();

            let Some(conn) = self.conn() else { return Vec::new() };
            let lead = match leads::get_lead(&conn, order_id) {
                Ok(lead) => lead,
                Err(e) => {
                    log::error!("Failed to load lead {}: {}", order_id, e);
                    return Vec::new();
                }
            };
            let Some(client_chat) = lead.and_then(|l| l.telegram_chat_id) else {
                let mut args = FluentArgs::new();
                args.set("id", order_id);
                return vec![send(msg.chat_id, i18n::t_args(lang, "admin-msg-unlinked", &args))];
            };

            let client_lang = i18n::lang_from_code(&i18n::user_lang_code(&conn, client_chat));
            let mut args = FluentArgs::new();
            args.set("id", order_id);
            args.set("text", text_to_client);
            let mut actions = vec![send(
                client_chat,
                i18n::t_args(&client_lang, "dev-msg-client", &args),
            )];
            let mut args = FluentArgs::new();
            args.set("id", order_id);
            actions.push(send(msg.chat_id, i18n::t_args(lang, "admin-sent-success", &args)));
            return actions;
        }

        self.forward_to_admin(msg, lang, full)
    }

    /// Relay a client message to the admin chat, with lead correlation when
    /// the chat is linked to an order.
    fn forward_to_admin(
        &self,
        msg: &IncomingMessage,
        lang: &LanguageIdentifier,
        text: &str,
    ) -> Vec<Action> {
        let Some(admin) = self.admin_chat_id else { return Vec::new() };
        let Some(conn) = self.conn() else { return Vec::new() };

        let user_name = msg
            .username
            .clone()
            .map(|u| format!("@{u}"))
            .or_else(|| msg.first_name.clone())
            .unwrap_or_else(|| "User".to_string());

        let linked = leads::find_lead_by_chat_id(&conn, msg.chat_id).unwrap_or_else(|e| {
            log::error!("Lead lookup for chat {} failed: {}", msg.chat_id, e);
            None
        });

        let admin_lang = i18n::lang_from_code(&i18n::user_lang_code(&conn, admin));
        let order_info = linked
            .as_ref()
            .map(|l| {
                format!(
                    "📦 <b>{}:</b> #{} [{}]",
                    i18n::t(&admin_lang, "label-order"),
                    l.id,
                    l.project_type
                )
            })
            .unwrap_or_default();

        let mut args = FluentArgs::new();
        args.set("user", user_name);
        args.set("chatId", msg.chat_id.to_string());
        args.set("orderInfo", order_info);
        args.set("text", text.to_string());
        args.set(
            "orderId",
            linked.map(|l| l.id.to_string()).unwrap_or_else(|| "[ID]".to_string()),
        );

        vec![
            send(admin, i18n::t_args(&admin_lang, "new-msg-admin", &args)),
            send(msg.chat_id, i18n::t(lang, "msg-sent")),
        ]
    }

    /// Handle an incoming callback query.
    pub fn handle_callback(&self, cb: &IncomingCallback) -> Vec<Action> {
        let (lang_code, lang) = self.lang_of(cb.chat_id);

        match CallbackCommand::parse(&cb.data) {
            CallbackCommand::SetLang(code) => self.set_language(cb.chat_id, &code),
            CallbackCommand::ViewTemplate(id) => {
                let templates = resolve_templates(&self.db_pool, &lang_code);
                match templates.iter().find(|m| m.slug == id) {
                    Some(merged) => {
                        let (text, keyboard) = views::template_detail(&lang, merged);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "not-found")))],
                }
            }
            CallbackCommand::ViewProject(slug) => {
                let projects = resolve_projects(&self.db_pool, &lang_code);
                match projects.iter().find(|m| m.slug == slug) {
                    Some(merged) => {
                        let (text, keyboard) = views::project_detail(&lang, merged);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "not-found")))],
                }
            }
            CallbackCommand::ShowRoadmap(id) => {
                match bundle_for(&lang_code).resources(&id).filter(|r| !r.roadmap.is_empty()) {
                    Some(resources) => {
                        let (text, keyboard) = views::roadmap(&lang, &id, &resources.roadmap);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "roadmap-coming-soon")))],
                }
            }
            CallbackCommand::ShowDocs(id) => {
                match bundle_for(&lang_code).resources(&id).filter(|r| !r.docs.is_empty()) {
                    Some(resources) => {
                        let (text, keyboard) = views::docs_index(&lang, &id, &resources.docs);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "docs-coming-soon")))],
                }
            }
            CallbackCommand::ShowDocPage { template, page } => {
                let page = bundle_for(&lang_code)
                    .resources(&template)
                    .and_then(|r| r.docs.iter().find(|p| p.id == page));
                match page {
                    Some(page) => {
                        let (text, keyboard) = views::doc_page(&lang, &template, page);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "not-found")))],
                }
            }
            CallbackCommand::ShowVideos(id) => {
                match bundle_for(&lang_code).resources(&id).filter(|r| !r.videos.is_empty()) {
                    Some(resources) => {
                        let (text, keyboard) = views::videos(&lang, &id, &resources.videos);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "videos-coming-soon")))],
                }
            }
            CallbackCommand::BuyTemplate(id) => {
                let templates = resolve_templates(&self.db_pool, &lang_code);
                match templates.iter().find(|m| m.slug == id) {
                    Some(merged) => {
                        let (text, keyboard) = views::purchase(&lang, merged);
                        vec![send_kb(cb.chat_id, text, keyboard), ack(None)]
                    }
                    None => vec![ack(Some(i18n::t(&lang, "not-found")))],
                }
            }
            CallbackCommand::GotoMarketplace => {
                let mut actions = vec![ack(None)];
                actions.extend(self.marketplace_listing(cb.chat_id, &lang_code, &lang));
                actions
            }
            CallbackCommand::GotoPortfolio => {
                let mut actions = vec![ack(None)];
                actions.extend(self.portfolio_listing(cb.chat_id, &lang_code, &lang));
                actions
            }
            CallbackCommand::FaqSection(section) => vec![
                send(cb.chat_id, i18n::t(&lang, &format!("faq-{section}-title"))),
                ack(None),
            ],
            CallbackCommand::PhilosophyDetail => vec![
                send(cb.chat_id, i18n::t(&lang, "philosophy-text")),
                ack(None),
            ],
            CallbackCommand::Approve(order_id) => {
                self.update_status(cb, &lang, order_id, LeadStatus::Completed)
            }
            CallbackCommand::Process(order_id) => {
                self.update_status(cb, &lang, order_id, LeadStatus::InProgress)
            }
            CallbackCommand::Unknown => vec![ack(None)],
        }
    }

    fn set_language(&self, chat_id: i64, code: &str) -> Vec<Action> {
        let Some(code) = i18n::is_language_supported(code) else {
            return vec![ack(None)];
        };
        if let Some(conn) = self.conn() {
            if let Err(e) = languages::set_user_language(&conn, chat_id, code) {
                log::error!("Failed to store language for chat {}: {}", chat_id, e);
            }
        }
        let new_lang = i18n::lang_from_code(code);
        vec![
            ack(Some(i18n::t(&new_lang, "lang-updated"))),
            send(chat_id, to_telegram_html(&i18n::t(&new_lang, "welcome"))),
        ]
    }

    /// Approve/process buttons on the new-lead notification. Telegram may
    /// redeliver these, so a replay updates the status again and re-notifies
    /// the client; the operations are idempotent at the store level.
    fn update_status(
        &self,
        cb: &IncomingCallback,
        lang: &LanguageIdentifier,
        order_id: i64,
        status: LeadStatus,
    ) -> Vec<Action> {
        if !self.is_admin(cb.chat_id) {
            return vec![ack(None)];
        }
        let Some(conn) = self.conn() else { return vec![ack(None)] };

        let lead = match leads::get_lead(&conn, order_id) {
            Ok(Some(lead)) => lead,
            Ok(None) => return vec![ack(Some(i18n::t(lang, "error-order-not-found")))],
            Err(e) => {
                log::error!("Failed to load lead {}: {}", order_id, e);
                return vec![ack(None)];
            }
        };

        if let Err(e) = leads::update_lead_status(&conn, order_id, status, None) {
            log::error!("Failed to update lead {} status: {}", order_id, e);
            return vec![ack(None)];
        }

        let mut actions = Vec::new();
        if let Some(client_chat) = lead.telegram_chat_id {
            let client_lang = i18n::lang_from_code(&i18n::user_lang_code(&conn, client_chat));
            let text = match status {
                LeadStatus::Completed => {
                    let mut args = FluentArgs::new();
                    args.set(
                        "url",
                        lead.materials_url
                            .clone()
                            .unwrap_or_else(|| config::MATERIALS_FALLBACK_URL.to_string()),
                    );
                    i18n::t_args(&client_lang, "payment-approved", &args)
                }
                _ => i18n::t(&client_lang, "request-in-progress"),
            };
            actions.push(send(client_chat, text));
        }

        let status_key = match status {
            LeadStatus::Completed => "status-completed",
            LeadStatus::InProgress => "status-in-progress",
            LeadStatus::Pending => "status-new",
        };
        let status_val = i18n::t(lang, status_key);

        let mut args = FluentArgs::new();
        args.set("id", order_id);
        args.set("status", status_val.clone());
        actions.push(ack(Some(i18n::t_args(lang, "order-status-updated", &args))));

        if let Some(base) = &cb.message_text {
            actions.push(Action::EditText {
                chat_id: cb.chat_id,
                message_id: cb.message_id,
                text: format!(
                    "{}\n\n✅ <b>{}: {}</b> ({})",
                    base,
                    i18n::t(lang, "label-status"),
                    status_val,
                    chrono::Local::now().format("%H:%M:%S")
                ),
            });
        }

        actions
    }
}
