use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A class owned by a teacher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolClass {
    pub id: Uuid,
    pub name: String,
    pub teacher_email: String,
    pub created_at: DateTime<Utc>,
}

/// A student's class assignment. A student belongs to at most one class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub email: String,
    pub name: Option<String>,
    pub class_id: Uuid,
}

/// A subject taught in a class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassSubject {
    pub class_id: Uuid,
    pub subject: String,
}

/// One mark per (student, class, subject).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkRecord {
    pub student_email: String,
    pub class_id: Uuid,
    pub subject: String,
    pub marks: i64,
}

/// A labeled span of syllabus text produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyllabusUnit {
    pub unit: String,
    /// Header-line text, kept only when the unit also has body lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// A stored syllabus unit, keyed by (class_id, subject, unit).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyllabusEntry {
    pub class_id: Uuid,
    pub subject: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// A static learning resource from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub subject: String,
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A normalized web-search result. `score` is set by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCandidate {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub score: Option<f32>,
}

/// A catalog resource with its relevance score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceHit {
    #[serde(flatten)]
    pub resource: Resource,
    pub score: Option<f32>,
}

/// Recommendations for one weak subject.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectRecommendations<T> {
    pub results: Vec<T>,
    /// Set when the subject's results are partial because a stage failed.
    pub error: Option<String>,
}

impl<T> Default for SubjectRecommendations<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            error: None,
        }
    }
}

/// Weak subject -> recommendations. Subjects that are not weak are absent.
pub type RecommendationSet<T> = BTreeMap<String, SubjectRecommendations<T>>;

// ─── Requests ────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddStudentRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSubjectRequest {
    pub subject: String,
}

/// Mark upsert. `class_id` defaults to the student's current class.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertMarkRequest {
    pub student_email: String,
    pub class_id: Option<Uuid>,
    pub subject: String,
    pub marks: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSyllabusRequest {
    pub subject: String,
    pub syllabus_text: String,
}

// ─── Responses ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ClassDetails {
    pub class: SchoolClass,
    pub students: Vec<Student>,
    pub subjects: Vec<String>,
    pub subject_averages: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub student: Student,
    pub marks: Vec<MarkRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectMark {
    pub subject: String,
    pub marks: i64,
}

/// Student landing page: raw marks always render, recommendations are best-effort.
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub class_id: Option<Uuid>,
    pub marks: Vec<SubjectMark>,
    pub weak_subjects: Vec<String>,
    pub recommendations: RecommendationSet<SearchCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceRecommendations {
    pub class_id: Option<Uuid>,
    pub weak_subjects: Vec<String>,
    pub recommendations: RecommendationSet<ResourceHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyllabusUploadResponse {
    pub class_id: Uuid,
    pub subject: String,
    pub units: Vec<SyllabusUnit>,
}
