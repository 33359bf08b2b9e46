use uuid::Uuid;

use crate::store::SchoolStore;

/// Tokens appended to every recommendation query.
pub const QUERY_SUFFIX: &str = "syllabus notes tutorial pdf";

/// Build the web-search query for a subject from its stored syllabus.
pub fn build_query(store: &SchoolStore, subject: &str, class_id: Uuid) -> String {
    query_from_syllabus(subject, &store.syllabus_text(class_id, subject))
}

/// `<subject> <syllabus keywords> syllabus notes tutorial pdf`.
///
/// Commas and periods become spaces; no further tokenization is done; the
/// ranker sorts out relevance afterwards.
pub fn query_from_syllabus(subject: &str, syllabus_text: &str) -> String {
    let keywords = syllabus_text.replace([',', '.'], " ");
    let keywords = keywords.trim();

    if keywords.is_empty() {
        format!("{subject} {QUERY_SUFFIX}")
    } else {
        format!("{subject} {keywords} {QUERY_SUFFIX}")
    }
}
