use askama::Template;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::news::EnrichedArticle;
use crate::models::sentiment::MarketTag;
use crate::services::presenter::{article_heading, no_results_message, NoticeLevel, Presenter};

#[derive(Template)]
#[template(path = "page_head.html")]
pub struct PageHead<'a> {
    pub symbol: &'a str,
}

#[derive(Template)]
#[template(path = "page_tail.html")]
pub struct PageTail;

#[derive(Template)]
#[template(path = "partials/notice.html")]
struct NoticeFragment<'a> {
    level: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "partials/section.html")]
struct SectionFragment<'a> {
    title: &'a str,
}

#[derive(Template)]
#[template(path = "partials/article.html")]
struct ArticleFragment<'a> {
    heading: &'a str,
    title: &'a str,
    description: &'a str,
    content: &'a str,
    published_at: &'a str,
    source: &'a str,
    url: &'a str,
    sentiment: &'a str,
    tag: &'a str,
    tag_class: &'a str,
}

/// Renders a template, logging and dropping it on failure.
pub fn render_fragment<T: Template>(template: &T) -> String {
    match template.render() {
        Ok(html) => html,
        Err(e) => {
            log::error!("template render error: {}", e);
            String::new()
        }
    }
}

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

fn tag_class(tag: MarketTag) -> &'static str {
    match tag {
        MarketTag::Bullish => "tag-bullish",
        MarketTag::Bearish => "tag-bearish",
        MarketTag::Neutral => "tag-neutral",
    }
}

/// Only plain web links are turned into anchors.
fn safe_link(url: Option<&str>) -> &str {
    match url {
        Some(u) if u.starts_with("https://") || u.starts_with("http://") => u,
        _ => "",
    }
}

pub fn render_article(number: usize, symbol: &str, article: &EnrichedArticle) -> String {
    let heading = article_heading(symbol, number);
    let source = if article.raw.source_name.is_empty() {
        "Unknown"
    } else {
        article.raw.source_name.as_str()
    };
    render_fragment(&ArticleFragment {
        heading: &heading,
        title: &article.translated_title,
        description: &article.translated_description,
        content: &article.translated_content,
        published_at: &article.raw.published_at,
        source,
        url: safe_link(article.raw.url.as_deref()),
        sentiment: article.sentiment.as_str(),
        tag: article.tag.as_str(),
        tag_class: tag_class(article.tag),
    })
}

/// Streams each presenter event to the browser as an HTML fragment.
pub struct HtmlPresenter {
    tx: UnboundedSender<String>,
    disconnected: bool,
}

impl HtmlPresenter {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }

    fn push(&mut self, html: String) {
        if self.tx.send(html).is_err() && !self.disconnected {
            // the run still completes; output is just discarded
            log::debug!("browser went away, dropping remaining output");
            self.disconnected = true;
        }
    }

    /// Starts the page with the form prefilled with `symbol`.
    pub fn open(&mut self, symbol: &str) {
        self.push(render_fragment(&PageHead { symbol }));
    }

    /// Closes the page. Dropping the presenter ends the response stream.
    pub fn finish(mut self) {
        self.push(render_fragment(&PageTail));
    }
}

impl Presenter for HtmlPresenter {
    fn notice(&mut self, level: NoticeLevel, message: &str) {
        let html = render_fragment(&NoticeFragment {
            level: level_class(level),
            message,
        });
        self.push(html);
    }

    fn section(&mut self, title: &str) {
        let html = render_fragment(&SectionFragment { title });
        self.push(html);
    }

    fn article(&mut self, number: usize, symbol: &str, article: EnrichedArticle) {
        let html = render_article(number, symbol, &article);
        self.push(html);
    }

    fn no_results(&mut self, symbol: &str, window_days: u32) {
        let message = no_results_message(symbol, window_days);
        self.notice(NoticeLevel::Info, &message);
    }
}
