use crate::models::news::RawArticle;

/// Keeps articles whose title or description mentions the symbol.
pub struct RelevanceFilter;

impl RelevanceFilter {
    /// Case-insensitive substring match on title or description.
    /// Missing fields count as empty text.
    pub fn matches(article: &RawArticle, symbol: &str) -> bool {
        let needle = symbol.to_lowercase();
        article.title_text().to_lowercase().contains(&needle)
            || article.description_text().to_lowercase().contains(&needle)
    }

    /// Order-preserving. An empty result is a normal outcome.
    pub fn filter(articles: Vec<RawArticle>, symbol: &str) -> Vec<RawArticle> {
        articles
            .into_iter()
            .filter(|article| Self::matches(article, symbol))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: Option<&str>, description: Option<&str>, content: Option<&str>) -> RawArticle {
        RawArticle {
            title: title.map(|s| s.to_string()),
            description: description.map(|s| s.to_string()),
            content: content.map(|s| s.to_string()),
            published_at: "2024-03-04T08:00:00Z".to_string(),
            source_name: "Mint".to_string(),
            url: None,
        }
    }

    #[test]
    fn test_matches_title_or_description_ignoring_case() {
        assert!(RelevanceFilter::matches(&article(Some("Tatamotors rallies"), None, None), "TATAMOTORS"));
        assert!(RelevanceFilter::matches(&article(Some("Autos"), Some("shares of TATAMOTORS fell"), None), "tatamotors"));
        assert!(!RelevanceFilter::matches(&article(Some("Autos"), Some("sector update"), None), "TATAMOTORS"));
    }

    #[test]
    fn test_content_is_not_consulted() {
        let a = article(Some("Autos"), Some("sector update"), Some("TATAMOTORS mentioned here only"));
        assert!(!RelevanceFilter::matches(&a, "TATAMOTORS"));
    }

    #[test]
    fn test_articles_without_title_and_description_are_dropped() {
        let a = article(None, None, Some("TATAMOTORS"));
        assert!(RelevanceFilter::filter(vec![a], "TATAMOTORS").is_empty());
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        let articles = vec![
            article(Some("INFY first"), None, None),
            article(Some("TCS"), Some("nothing"), None),
            article(None, Some("infy second"), None),
            article(Some("INFY third"), Some("also infy"), None),
        ];

        let once = RelevanceFilter::filter(articles, "INFY");
        let titles: Vec<&str> = once.iter().map(|a| a.title_text()).collect();
        assert_eq!(titles, vec!["INFY first", "", "INFY third"]);
        assert!(once.iter().all(|a| RelevanceFilter::matches(a, "INFY")));

        let twice = RelevanceFilter::filter(once.clone(), "INFY");
        assert_eq!(twice, once);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let articles = vec![article(Some("TCS"), Some("IT services"), None)];
        assert!(RelevanceFilter::filter(articles, "WIPRO").is_empty());
    }
}
