use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to a search result URL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Shopping,
    Information,
}

impl Category {
    pub fn is_shopping(&self) -> bool {
        matches!(self, Category::Shopping)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Shopping => "Shopping",
            Category::Information => "Information",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust state of a search result.
///
/// Serialized as `"Yes"`, `"No"`, `""` and `"Unknown"` so that logs written
/// by older versions of the tool (which used an empty string for
/// non-shopping rows) still load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Trusted {
    Yes,
    No,
    /// Trust is only evaluated for shopping URLs.
    #[serde(rename = "")]
    NotApplicable,
    /// The reputation lookup failed for this URL.
    Unknown,
}

impl Trusted {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trusted::Yes => "Yes",
            Trusted::No => "No",
            Trusted::NotApplicable => "",
            Trusted::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Trusted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified URL within one query's result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRecord {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Category")]
    pub category: Category,

    #[serde(rename = "Trusted")]
    pub trusted: Trusted,
}

impl SearchRecord {
    /// Record for a non-shopping URL (trust not evaluated)
    pub fn information(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            category: Category::Information,
            trusted: Trusted::NotApplicable,
        }
    }

    /// Record for a shopping URL with its trust outcome.
    ///
    /// `NotApplicable` is not a valid outcome for a shopping URL and is
    /// coerced to `Unknown`.
    pub fn shopping(url: impl Into<String>, trusted: Trusted) -> Self {
        let trusted = match trusted {
            Trusted::NotApplicable => Trusted::Unknown,
            other => other,
        };
        Self {
            url: url.into(),
            category: Category::Shopping,
            trusted,
        }
    }

    /// `trusted == NotApplicable` exactly when `category == Information`
    pub fn is_consistent(&self) -> bool {
        (self.trusted == Trusted::NotApplicable) == (self.category == Category::Information)
    }
}

/// The persisted record of one search invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryLog {
    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searched_at: Option<DateTime<Local>>,

    #[serde(default)]
    pub results: Vec<SearchRecord>,
}

impl QueryLog {
    pub fn new(query: impl Into<String>, results: Vec<SearchRecord>) -> Self {
        Self {
            query: query.into(),
            searched_at: Some(Local::now()),
            results,
        }
    }

    pub fn shopping_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.category.is_shopping())
            .count()
    }

    pub fn untrusted_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.trusted == Trusted::No)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_with_legacy_keys() {
        let record = SearchRecord::shopping("https://shop.test", Trusted::Yes);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({ "URL": "https://shop.test", "Category": "Shopping", "Trusted": "Yes" })
        );
    }

    #[test]
    fn test_information_record_has_empty_trust() {
        let record = SearchRecord::information("https://wiki.test");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Trusted"], json!(""));
        assert!(record.is_consistent());
    }

    #[test]
    fn test_shopping_never_not_applicable() {
        let record = SearchRecord::shopping("https://shop.test", Trusted::NotApplicable);
        assert_eq!(record.trusted, Trusted::Unknown);
        assert!(record.is_consistent());
    }

    #[test]
    fn test_inconsistent_record_detected() {
        let record = SearchRecord {
            url: "https://wiki.test".to_string(),
            category: Category::Information,
            trusted: Trusted::Yes,
        };
        assert!(!record.is_consistent());
    }

    #[test]
    fn test_query_log_without_timestamp_loads() {
        let log: QueryLog = serde_json::from_value(json!({
            "query": "shoes",
            "results": [
                { "URL": "https://a.test", "Category": "Information", "Trusted": "" }
            ]
        }))
        .unwrap();
        assert_eq!(log.searched_at, None);
        assert_eq!(log.results.len(), 1);

        let value = serde_json::to_value(&log).unwrap();
        assert!(value.get("searched_at").is_none());
    }

    #[test]
    fn test_counts() {
        let log = QueryLog::new(
            "q",
            vec![
                SearchRecord::shopping("a", Trusted::Yes),
                SearchRecord::shopping("b", Trusted::No),
                SearchRecord::information("c"),
            ],
        );
        assert_eq!(log.shopping_count(), 2);
        assert_eq!(log.untrusted_count(), 1);
    }
}
