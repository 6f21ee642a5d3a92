//! Listing filter/search engine.
//!
//! Pure functions over an already-fetched listing collection, shared by the
//! case, processed-case, and project listing endpoints. The engine knows
//! nothing about the topic vocabulary; it only sees the transient selection.

use serde::Deserialize;
use uuid::Uuid;

use caseflow_types::api::{CaseResponse, ProcessedCaseResponse, ProjectResponse};

/// The searchable fields of a listing item. Missing fields behave as empty
/// strings so a half-populated item never breaks a search.
pub trait Listing {
    fn title(&self) -> Option<&str>;
    fn theme(&self) -> Option<&str>;
    fn description(&self) -> Option<&str>;
    fn status(&self) -> Option<&str>;
    fn owner_email(&self) -> Option<&str>;
    fn executor_email(&self) -> Option<&str>;
}

/// Keep the items matching all active rules, preserving input order.
///
/// Search is a case-insensitive substring test against any searchable field;
/// an empty term matches everything. Topics are an exact, case-sensitive
/// match on the theme; an empty selection matches everything. The status
/// rule, when given, is a plain equality guard so accepted cases never leak
/// into an "open cases" view.
pub fn filter<T: Listing>(
    items: Vec<T>,
    search_term: &str,
    selected_topics: &[String],
    required_status: Option<&str>,
) -> Vec<T> {
    let needle = search_term.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            matches_search(item, &needle)
                && matches_topics(item, selected_topics)
                && required_status.map_or(true, |s| item.status() == Some(s))
        })
        .collect()
}

fn matches_search<T: Listing>(item: &T, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        item.title(),
        item.theme(),
        item.description(),
        item.status(),
        item.owner_email(),
        item.executor_email(),
    ]
    .into_iter()
    .any(|field| field.unwrap_or("").to_lowercase().contains(needle))
}

fn matches_topics<T: Listing>(item: &T, selected: &[String]) -> bool {
    selected.is_empty()
        || item
            .theme()
            .map(|theme| selected.iter().any(|topic| topic == theme))
            .unwrap_or(false)
}

/// Toggle a topic in a selection: added if absent, removed if present.
pub fn toggle_topic(mut selected: Vec<String>, topic: &str) -> Vec<String> {
    if let Some(pos) = selected.iter().position(|t| t == topic) {
        selected.remove(pos);
    } else {
        selected.push(topic.to_string());
    }
    selected
}

/// Common query parameters of the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated topic labels.
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub executor_email: Option<String>,
}

impl ListingQuery {
    pub fn selected_topics(&self) -> Vec<String> {
        self.topics
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

impl Listing for CaseResponse {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }
    fn theme(&self) -> Option<&str> {
        Some(&self.theme)
    }
    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }
    fn executor_email(&self) -> Option<&str> {
        None
    }
}

impl Listing for ProcessedCaseResponse {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }
    fn theme(&self) -> Option<&str> {
        Some(&self.theme)
    }
    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }
    fn executor_email(&self) -> Option<&str> {
        Some(&self.executor_email)
    }
}

impl Listing for ProjectResponse {
    fn title(&self) -> Option<&str> {
        Some(&self.title)
    }
    fn theme(&self) -> Option<&str> {
        Some(&self.theme)
    }
    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }
    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
    fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }
    fn executor_email(&self) -> Option<&str> {
        Some(&self.executor_email)
    }
}
