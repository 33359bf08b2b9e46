use crate::models::SearchCandidate;

/// Drops search results whose title or snippet mentions a denylisted phrase.
#[derive(Debug, Clone)]
pub struct Denylist {
    phrases: Vec<String>,
}

impl Denylist {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against `title + " " + snippet`.
    pub fn is_blocked(&self, candidate: &SearchCandidate) -> bool {
        let text = format!("{} {}", candidate.title, candidate.snippet).to_lowercase();
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }

    /// Keep allowed candidates, in order.
    pub fn filter(&self, candidates: Vec<SearchCandidate>) -> Vec<SearchCandidate> {
        candidates
            .into_iter()
            .filter(|c| !self.is_blocked(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommendConfig;

    fn candidate(title: &str, snippet: &str) -> SearchCandidate {
        SearchCandidate {
            title: title.to_string(),
            snippet: snippet.to_string(),
            link: format!("https://example.com/{}", title.len()),
            score: None,
        }
    }

    fn default_denylist() -> Denylist {
        Denylist::new(&RecommendConfig::default().denylist)
    }

    #[test]
    fn test_snippet_match_excluded() {
        let kept = default_denylist().filter(vec![
            candidate("Scheduling", "see the osdev wiki"),
            candidate("Round robin", "lecture notes"),
        ]);
        assert_eq!(kept, vec![candidate("Round robin", "lecture notes")]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let denylist = default_denylist();
        assert!(denylist.is_blocked(&candidate("OSDev Wiki", "")));
        assert!(denylist.is_blocked(&candidate("", "Build Your Own kernel")));
        assert!(!denylist.is_blocked(&candidate("Operating systems", "deadlocks")));
    }

    #[test]
    fn test_phrase_can_span_title_and_snippet() {
        let denylist = Denylist::new(["notes pdf"]);
        assert!(denylist.is_blocked(&candidate("Free notes", "pdf download")));
    }

    #[test]
    fn test_order_preserved_and_blank_phrases_ignored() {
        let denylist = Denylist::new(["", "  ", "Make an OS"]);
        let input = vec![
            candidate("a", "one"),
            candidate("b", "how to make an os"),
            candidate("c", "three"),
        ];
        let kept: Vec<String> = denylist
            .filter(input)
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(kept, vec!["a".to_string(), "c".to_string()]);
    }
}
