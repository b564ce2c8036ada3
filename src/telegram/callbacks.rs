//! Parsing of inline keyboard callback data.

/// Every callback the bot emits, parsed from the raw `callback_data` string.
///
/// Navigation callbacks use a `verb:argument` form. The admin status
/// callbacks keep their legacy `approve_<id>` / `process_<id>` form because
/// they are embedded in notification messages that may be months old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackCommand {
    SetLang(String),
    ViewTemplate(String),
    ViewProject(String),
    ShowRoadmap(String),
    ShowDocs(String),
    ShowDocPage { template: String, page: String },
    ShowVideos(String),
    BuyTemplate(String),
    GotoMarketplace,
    GotoPortfolio,
    FaqSection(String),
    PhilosophyDetail,
    Approve(i64),
    Process(i64),
    Unknown,
}

impl CallbackCommand {
    /// Parse raw callback data. Anything unrecognized maps to `Unknown`.
    pub fn parse(data: &str) -> Self {
        if let Some(id) = data.strip_prefix("approve_") {
            return match id.parse() {
                Ok(id) => CallbackCommand::Approve(id),
                Err(_) => CallbackCommand::Unknown,
            };
        }
        if let Some(id) = data.strip_prefix("process_") {
            return match id.parse() {
                Ok(id) => CallbackCommand::Process(id),
                Err(_) => CallbackCommand::Unknown,
            };
        }

        match data {
            "goto_marketplace" => return CallbackCommand::GotoMarketplace,
            "goto_portfolio" => return CallbackCommand::GotoPortfolio,
            "philosophy_detail" => return CallbackCommand::PhilosophyDetail,
            "faq_general" | "faq_tech" | "faq_payments" => {
                return CallbackCommand::FaqSection(
                    data.trim_start_matches("faq_").to_string(),
                )
            }
            _ => {}
        }

        let mut parts = data.splitn(3, ':');
        let verb = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (verb, arg) {
            ("set_lang", Some(code)) => CallbackCommand::SetLang(code.to_string()),
            ("view_template", Some(id)) => CallbackCommand::ViewTemplate(id.to_string()),
            ("view_project", Some(slug)) => CallbackCommand::ViewProject(slug.to_string()),
            ("show_roadmap", Some(id)) => CallbackCommand::ShowRoadmap(id.to_string()),
            ("show_docs", Some(id)) => CallbackCommand::ShowDocs(id.to_string()),
            ("show_doc_page", Some(id)) => match parts.next() {
                Some(page) => CallbackCommand::ShowDocPage {
                    template: id.to_string(),
                    page: page.to_string(),
                },
                None => CallbackCommand::Unknown,
            },
            ("show_videos", Some(id)) => CallbackCommand::ShowVideos(id.to_string()),
            ("buy_template", Some(id)) => CallbackCommand::BuyTemplate(id.to_string()),
            _ => CallbackCommand::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_commands() {
        assert_eq!(
            CallbackCommand::parse("set_lang:ru"),
            CallbackCommand::SetLang("ru".to_string())
        );
        assert_eq!(
            CallbackCommand::parse("view_template:shop-starter"),
            CallbackCommand::ViewTemplate("shop-starter".to_string())
        );
        assert_eq!(
            CallbackCommand::parse("show_doc_page:shop-starter:setup"),
            CallbackCommand::ShowDocPage {
                template: "shop-starter".to_string(),
                page: "setup".to_string(),
            }
        );
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!(CallbackCommand::parse("goto_marketplace"), CallbackCommand::GotoMarketplace);
        assert_eq!(CallbackCommand::parse("goto_portfolio"), CallbackCommand::GotoPortfolio);
        assert_eq!(CallbackCommand::parse("philosophy_detail"), CallbackCommand::PhilosophyDetail);
        assert_eq!(
            CallbackCommand::parse("faq_tech"),
            CallbackCommand::FaqSection("tech".to_string())
        );
    }

    #[test]
    fn parses_legacy_status_commands() {
        assert_eq!(CallbackCommand::parse("approve_12"), CallbackCommand::Approve(12));
        assert_eq!(CallbackCommand::parse("process_3"), CallbackCommand::Process(3));
        assert_eq!(CallbackCommand::parse("approve_abc"), CallbackCommand::Unknown);
    }

    #[test]
    fn unknown_data_maps_to_unknown() {
        assert_eq!(CallbackCommand::parse(""), CallbackCommand::Unknown);
        assert_eq!(CallbackCommand::parse("view_template"), CallbackCommand::Unknown);
        assert_eq!(CallbackCommand::parse("show_doc_page:only-template"), CallbackCommand::Unknown);
        assert_eq!(CallbackCommand::parse("nonsense:arg"), CallbackCommand::Unknown);
    }
}
