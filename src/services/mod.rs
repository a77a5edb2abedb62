pub mod news_service;
pub mod pipeline;
pub mod presenter;
pub mod relevance_filter;
pub mod sentiment_service;
pub mod translation_service;
