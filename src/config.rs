use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the document store is kept
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// External web-search provider configuration
    pub search: SearchConfig,
    /// Recommendation policy knobs
    pub recommend: RecommendConfig,
}

/// Configuration for the SerpApi-compatible search provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the provider (the client appends `/search`).
    pub base_url: String,
    /// Search engine requested from the provider.
    pub engine: String,
    /// Provider credential. If None, searches are rejected without a network call.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Result-count hint sent with every query.
    pub num_results: usize,
    /// Request timeout in seconds (capped at 30).
    pub timeout_secs: u64,
}

// Hand-written so the credential never lands in a log line.
impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("base_url", &self.base_url)
            .field("engine", &self.engine)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("num_results", &self.num_results)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://serpapi.com".to_string(),
            engine: "google".to_string(),
            api_key: None,
            num_results: 10,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// A mark strictly below this is a weak subject.
    pub weak_threshold: i64,
    /// Recommendations kept per subject.
    pub max_results: usize,
    /// Case-insensitive phrases that exclude a search result.
    pub denylist: Vec<String>,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            weak_threshold: 40,
            max_results: 5,
            denylist: ["from scratch", "build your own", "make an os", "osdev"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            search: SearchConfig::default(),
            recommend: RecommendConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, falling back to defaults for unset or
    /// unparseable values.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("SCHOOL_ADVISOR_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup("SCHOOL_ADVISOR_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // Search provider
        if let Some(url) = lookup("SEARCH_BASE_URL") {
            config.search.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(engine) = lookup("SEARCH_ENGINE") {
            config.search.engine = engine;
        }
        if let Some(key) = lookup("SERPAPI_KEY") {
            if !key.trim().is_empty() {
                config.search.api_key = Some(key.trim().to_string());
            }
        }
        if let Some(val) = lookup("SEARCH_NUM_RESULTS") {
            if let Ok(v) = val.parse() {
                config.search.num_results = v;
            }
        }
        if let Some(val) = lookup("SEARCH_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.search.timeout_secs = v.min(30);
            }
        }

        // Recommendation policy
        if let Some(val) = lookup("RECOMMEND_WEAK_THRESHOLD") {
            if let Ok(v) = val.parse() {
                config.recommend.weak_threshold = v;
            }
        }
        if let Some(val) = lookup("RECOMMEND_MAX_RESULTS") {
            if let Ok(v) = val.parse() {
                config.recommend.max_results = v;
            }
        }
        if let Some(val) = lookup("RECOMMEND_DENYLIST") {
            config.recommend.denylist = parse_denylist(&val);
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("school.json")
    }
}

/// Split a comma separated phrase list, dropping blanks.
fn parse_denylist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_policy_constants() {
        let config = Config::default();
        assert_eq!(config.recommend.weak_threshold, 40);
        assert_eq!(config.recommend.max_results, 5);
        assert_eq!(config.search.num_results, 10);
        assert!(config.recommend.denylist.contains(&"osdev".to_string()));
        assert_eq!(config.db_path(), PathBuf::from("./data/school.json"));
    }

    #[test]
    fn test_parse_denylist_trims_and_lowercases() {
        let list = parse_denylist(" OSDev , ,from scratch,");
        assert_eq!(list, vec!["osdev".to_string(), "from scratch".to_string()]);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let search = SearchConfig {
            api_key: Some("super-secret-token".to_string()),
            ..SearchConfig::default()
        };
        let printed = format!("{search:?}");
        assert!(!printed.contains("super-secret-token"));
        assert!(printed.contains("<redacted>"));
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("SCHOOL_ADVISOR_DATA_DIR", "/var/lib/school"),
            ("SEARCH_BASE_URL", "http://localhost:8080/"),
            ("SERPAPI_KEY", "  key-123  "),
            ("SEARCH_NUM_RESULTS", "20"),
            ("SEARCH_TIMEOUT_SECS", "5"),
            ("RECOMMEND_WEAK_THRESHOLD", "50"),
            ("RECOMMEND_MAX_RESULTS", "3"),
            ("RECOMMEND_DENYLIST", "Tutorial Hell, clickbait"),
        ]));

        assert_eq!(config.db_path(), PathBuf::from("/var/lib/school/school.json"));
        assert_eq!(config.search.base_url, "http://localhost:8080");
        assert_eq!(config.search.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.search.num_results, 20);
        assert_eq!(config.search.timeout_secs, 5);
        assert_eq!(config.recommend.weak_threshold, 50);
        assert_eq!(config.recommend.max_results, 3);
        assert_eq!(config.recommend.denylist, vec!["tutorial hell", "clickbait"]);
    }

    #[test]
    fn test_timeout_is_capped() {
        let config = Config::from_lookup(lookup_from(&[("SEARCH_TIMEOUT_SECS", "600")]));
        assert_eq!(config.search.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SEARCH_TIMEOUT_SECS", "soon"),
            ("SEARCH_NUM_RESULTS", "-1"),
            ("RECOMMEND_WEAK_THRESHOLD", "forty"),
            ("RECOMMEND_MAX_RESULTS", ""),
            ("SERPAPI_KEY", "   "),
        ]));
        let defaults = Config::default();

        assert_eq!(config.search.timeout_secs, defaults.search.timeout_secs);
        assert_eq!(config.search.num_results, defaults.search.num_results);
        assert_eq!(
            config.recommend.weak_threshold,
            defaults.recommend.weak_threshold
        );
        assert_eq!(config.recommend.max_results, defaults.recommend.max_results);
        assert!(config.search.api_key.is_none());
    }
}
