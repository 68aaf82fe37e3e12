pub mod news_article;
pub mod sentiment_result;
