pub mod filter;
pub mod tfidf;
