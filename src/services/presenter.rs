use serde::Serialize;

use crate::models::news::EnrichedArticle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Sink for everything a pipeline run shows to the user, in order.
pub trait Presenter: Send {
    fn notice(&mut self, level: NoticeLevel, message: &str);

    fn section(&mut self, title: &str);

    /// `number` is 1-based in render order. The article is handed over for good.
    fn article(&mut self, number: usize, symbol: &str, article: EnrichedArticle);

    fn no_results(&mut self, symbol: &str, window_days: u32);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedArticle {
    pub number: usize,
    pub heading: String,
    #[serde(flatten)]
    pub article: EnrichedArticle,
}

/// Everything one run presented, for the JSON endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub notices: Vec<Notice>,
    pub sections: Vec<String>,
    pub articles: Vec<NumberedArticle>,
    pub no_results: bool,
}

/// Buffers presenter output instead of rendering it.
#[derive(Debug, Default)]
pub struct CollectingPresenter {
    report: AnalysisReport,
}

impl CollectingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_report(self) -> AnalysisReport {
        self.report
    }
}

pub fn article_heading(symbol: &str, number: usize) -> String {
    format!("{} News-{}", symbol, number)
}

pub fn no_results_message(symbol: &str, window_days: u32) -> String {
    if window_days == 7 {
        format!("No news found for {} in the past week.", symbol)
    } else {
        format!("No news found for {} in the past {} days.", symbol, window_days)
    }
}

impl Presenter for CollectingPresenter {
    fn notice(&mut self, level: NoticeLevel, message: &str) {
        self.report.notices.push(Notice {
            level,
            message: message.to_string(),
        });
    }

    fn section(&mut self, title: &str) {
        self.report.sections.push(title.to_string());
    }

    fn article(&mut self, number: usize, symbol: &str, article: EnrichedArticle) {
        self.report.articles.push(NumberedArticle {
            number,
            heading: article_heading(symbol, number),
            article,
        });
    }

    fn no_results(&mut self, symbol: &str, window_days: u32) {
        self.report.no_results = true;
        self.report.notices.push(Notice {
            level: NoticeLevel::Info,
            message: no_results_message(symbol, window_days),
        });
    }
}
