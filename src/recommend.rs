//! Study recommendations for weak subjects.
//!
//! ```text
//! marks ──► weak subjects ──► per subject (concurrently):
//!              syllabus text ──► query ──► SearchProvider ──► TF-IDF rank
//!                                                              ──► denylist ──► top K
//! ```
//!
//! The catalog variant ranks stored resources for the subject instead of
//! live search results and skips the query and denylist stages.
//!
//! A failing subject never fails the whole set: its entry carries an empty
//! result list and an error message.

use futures_util::future::join_all;
use uuid::Uuid;

use crate::config::RecommendConfig;
use crate::models::{RecommendationSet, ResourceHit, SearchCandidate, SubjectRecommendations};
use crate::rank::filter::Denylist;
use crate::rank::tfidf::rank;
use crate::search::provider::SearchProvider;
use crate::search::query::build_query;
use crate::store::SchoolStore;

/// Subjects where the student's mark is strictly below `threshold`, in
/// storage order. A student without marks has no weak subjects.
pub fn weak_subjects(
    store: &SchoolStore,
    student_email: &str,
    class_id: Uuid,
    threshold: i64,
) -> Vec<String> {
    store
        .marks_for(student_email, class_id)
        .into_iter()
        .filter(|m| m.marks < threshold)
        .map(|m| m.subject)
        .collect()
}

fn dedup_in_order(subjects: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(subjects.len());
    for s in subjects {
        if !unique.contains(&s) {
            unique.push(s);
        }
    }
    unique
}

/// Web-search recommendation pipeline over one store and provider.
pub struct Recommender<'a> {
    store: &'a SchoolStore,
    provider: &'a dyn SearchProvider,
    settings: &'a RecommendConfig,
    denylist: Denylist,
}

impl<'a> Recommender<'a> {
    pub fn new(
        store: &'a SchoolStore,
        provider: &'a dyn SearchProvider,
        settings: &'a RecommendConfig,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
            denylist: Denylist::new(&settings.denylist),
        }
    }

    /// Top search results for each weak subject of the student.
    pub async fn recommend_for_student(
        &self,
        student_email: &str,
        class_id: Uuid,
    ) -> RecommendationSet<SearchCandidate> {
        let subjects = dedup_in_order(weak_subjects(
            self.store,
            student_email,
            class_id,
            self.settings.weak_threshold,
        ));

        let per_subject = join_all(
            subjects
                .iter()
                .map(|subject| self.recommend_subject(subject, class_id)),
        )
        .await;

        subjects.into_iter().zip(per_subject).collect()
    }

    async fn recommend_subject(
        &self,
        subject: &str,
        class_id: Uuid,
    ) -> SubjectRecommendations<SearchCandidate> {
        let syllabus_text = self.store.syllabus_text(class_id, subject);
        if syllabus_text.trim().is_empty() {
            // Nothing to rank against.
            tracing::debug!("No syllabus for weak subject '{subject}', skipping search");
            return SubjectRecommendations::default();
        }

        let query = build_query(self.store, subject, class_id);
        let candidates = match self.provider.search(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Search for weak subject '{subject}' failed: {e}");
                return SubjectRecommendations {
                    results: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        let total = candidates.len();
        let mut results = self.denylist.filter(rank(&syllabus_text, candidates));
        results.truncate(self.settings.max_results);
        tracing::info!(
            "Recommendations for '{subject}': {} of {total} search results kept",
            results.len()
        );

        SubjectRecommendations {
            results,
            error: None,
        }
    }
}

/// Catalog resources for each weak subject, ranked against its syllabus.
pub fn recommend_resources(
    store: &SchoolStore,
    student_email: &str,
    class_id: Uuid,
    settings: &RecommendConfig,
) -> RecommendationSet<ResourceHit> {
    dedup_in_order(weak_subjects(
        store,
        student_email,
        class_id,
        settings.weak_threshold,
    ))
    .into_iter()
    .map(|subject| {
        let syllabus_text = store.syllabus_text(class_id, &subject);
        let hits: Vec<ResourceHit> = store
            .resources_for(&subject)
            .into_iter()
            .map(|resource| ResourceHit {
                resource,
                score: None,
            })
            .collect();

        let mut results = rank(&syllabus_text, hits);
        results.truncate(settings.max_results);
        (
            subject,
            SubjectRecommendations {
                results,
                error: None,
            },
        )
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, SyllabusUnit};
    use crate::search::provider::SearchError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    fn open_temp() -> (tempfile::TempDir, SchoolStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SchoolStore::open_or_create(&dir.path().join("school.json")).unwrap();
        (dir, store)
    }

    fn syllabus(store: &SchoolStore, class_id: Uuid, subject: &str, content: &str) {
        store
            .replace_syllabus(
                class_id,
                subject,
                &[SyllabusUnit {
                    unit: "Unit 1".to_string(),
                    title: None,
                    content: content.to_string(),
                }],
            )
            .unwrap();
    }

    fn candidate(title: &str, snippet: &str) -> SearchCandidate {
        SearchCandidate {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: format!("https://example.com/{title}"),
            score: None,
        }
    }

    /// Returns canned results and records every query it receives.
    struct FakeProvider {
        results: Vec<SearchCandidate>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
            self.queries.lock().push(query.to_string());
            Ok(self.results.clone())
        }
    }

    #[test]
    fn test_weak_subjects_threshold_is_strict() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store.upsert_mark("s@mail.com", class_id, "Math", 35).unwrap();
        store.upsert_mark("s@mail.com", class_id, "Science", 55).unwrap();
        store.upsert_mark("s@mail.com", class_id, "Art", 39).unwrap();
        store.upsert_mark("s@mail.com", class_id, "History", 40).unwrap();

        assert_eq!(
            weak_subjects(&store, "s@mail.com", class_id, 40),
            vec!["Math".to_string(), "Art".to_string()]
        );
    }

    #[test]
    fn test_weak_subjects_scoped_to_student_and_class() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store.upsert_mark("other@mail.com", class_id, "Math", 5).unwrap();
        store.upsert_mark("s@mail.com", Uuid::new_v4(), "Math", 5).unwrap();

        assert!(weak_subjects(&store, "s@mail.com", class_id, 40).is_empty());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store.upsert_mark("s@mail.com", class_id, "Math", 55).unwrap();

        assert_eq!(weak_subjects(&store, "s@mail.com", class_id, 60), vec!["Math"]);
    }

    #[tokio::test]
    async fn test_pipeline_ranks_filters_and_truncates() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store.upsert_mark("s@mail.com", class_id, "OS", 20).unwrap();
        store.upsert_mark("s@mail.com", class_id, "Math", 90).unwrap();
        syllabus(&store, class_id, "OS", "process scheduling, round robin.");

        let provider = FakeProvider {
            results: vec![
                candidate("Unrelated", "cooking recipes"),
                candidate("OSDev", "process scheduling in your kernel"),
                candidate("Round robin", "round robin process scheduling explained"),
                candidate("Scheduling", "scheduling basics"),
            ],
            queries: Mutex::new(Vec::new()),
        };
        let settings = RecommendConfig {
            max_results: 2,
            ..RecommendConfig::default()
        };

        let set = Recommender::new(&store, &provider, &settings)
            .recommend_for_student("s@mail.com", class_id)
            .await;

        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["OS"]);
        let os = &set["OS"];
        assert!(os.error.is_none());
        let titles: Vec<&str> = os.results.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Round robin", "Scheduling"]);
        assert!(os.results.iter().all(|c| c.score.is_some()));

        assert_eq!(
            *provider.queries.lock(),
            vec!["OS process scheduling  round robin syllabus notes tutorial pdf".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_syllabus_skips_search() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store.upsert_mark("s@mail.com", class_id, "Art", 10).unwrap();

        let provider = FakeProvider {
            results: vec![candidate("Art", "drawing")],
            queries: Mutex::new(Vec::new()),
        };
        let settings = RecommendConfig::default();

        let set = Recommender::new(&store, &provider, &settings)
            .recommend_for_student("s@mail.com", class_id)
            .await;

        assert_eq!(set["Art"], SubjectRecommendations::default());
        assert!(provider.queries.lock().is_empty());
    }

    #[test]
    fn test_resource_variant_ranks_catalog() {
        let (_dir, store) = open_temp();
        let class_id = Uuid::new_v4();
        store
            .upsert_mark("s@mail.com", class_id, "Operating Systems", 20)
            .unwrap();
        syllabus(
            &store,
            class_id,
            "Operating Systems",
            "process scheduling round robin",
        );
        store
            .replace_resources(vec![
                Resource {
                    subject: "Operating Systems".to_string(),
                    title: "Gate Smashers OS Playlist".to_string(),
                    description: "operating systems, deadlocks, memory management".to_string(),
                    link: "https://www.youtube.com/".to_string(),
                    kind: "video".to_string(),
                },
                Resource {
                    subject: "Operating Systems".to_string(),
                    title: "CPU Scheduling Notes".to_string(),
                    description: "process scheduling, round robin, priority scheduling"
                        .to_string(),
                    link: "https://www.geeksforgeeks.org/cpu-scheduling/".to_string(),
                    kind: "text".to_string(),
                },
            ])
            .unwrap();

        let set = recommend_resources(&store, "s@mail.com", class_id, &RecommendConfig::default());
        let results = &set["Operating Systems"].results;
        assert_eq!(results[0].resource.title, "CPU Scheduling Notes");
        assert!(results[0].score.unwrap() > results[1].score.unwrap());
    }
}
