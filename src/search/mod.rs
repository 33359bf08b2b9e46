pub mod provider;
pub mod query;
