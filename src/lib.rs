//! # school-advisor
//!
//! A school-management service: teachers manage classes, students, subjects,
//! marks and syllabi; students see their marks together with study material
//! recommended for the subjects they are weak in.
//!
//! ## Recommendation pipeline
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │  Student marks       │
//!                 └──────────┬───────────┘
//!                            │ mark < 40
//!                            ▼
//!                 ┌──────────────────────┐
//!                 │  Weak subjects       │
//!                 └──────────┬───────────┘
//!                            │ one branch per subject
//!             ┌──────────────┴──────────────┐
//!             ▼                             ▼
//!   ┌───────────────────┐         ┌───────────────────┐
//!   │ Query from        │         │ Resource catalog  │
//!   │ syllabus keywords │         │ for the subject   │
//!   └─────────┬─────────┘         └─────────┬─────────┘
//!             ▼                             │
//!   ┌───────────────────┐                   │
//!   │ Web search        │                   │
//!   │ (10 results)      │                   │
//!   └─────────┬─────────┘                   │
//!             ▼                             ▼
//!   ┌─────────────────────────────────────────────────┐
//!   │ TF-IDF cosine ranking against the syllabus text │
//!   └─────────┬───────────────────────────┬───────────┘
//!             ▼                           │
//!   ┌───────────────────┐                 │
//!   │ Denylist filter   │                 │
//!   └─────────┬─────────┘                 │
//!             ▼                           ▼
//!   ┌─────────────────────────────────────────────────┐
//!   │ Top 5 per subject                               │
//!   └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, search provider and policy
//! - [`models`] - Stored documents, pipeline types, request/response bodies
//! - [`auth`] - Caller identity and role, extracted from proxy headers
//! - [`store`] - JSON-persisted document store for all school data
//! - [`syllabus`] - Splits free-text syllabi into `Unit N:` units
//! - [`search::query`] - Builds the web-search query from a subject's syllabus
//! - [`search::provider`] - `SearchProvider` trait and the SerpApi client
//! - [`rank::tfidf`] - TF-IDF vectorization and cosine ranking
//! - [`rank::filter`] - Denylist filter for search results
//! - [`recommend`] - Weak-subject detection and per-subject orchestration
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod rank;
pub mod recommend;
pub mod search;
pub mod state;
pub mod store;
pub mod syllabus;
