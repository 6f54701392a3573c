//! Location search box with a result dropdown.

use aoimapper_core::{LatLon, ViewportOrigin};
use aoimapper_geocoding::{Geocoder, GeocodingResult, SearchDebouncer};
use aoimapper_store::MapStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const PLACEHOLDER: &str = "Search location...";

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultRow {
    pub title: String,
    pub subtitle: String,
}

/// Search-as-you-type state.
pub struct SearchBar {
    geocoder: Arc<dyn Geocoder>,
    debouncer: SearchDebouncer,
    min_query_length: usize,
    query: String,
    results: Vec<GeocodingResult>,
    open: bool,
}

impl SearchBar {
    pub fn new(geocoder: Arc<dyn Geocoder>, debounce: Duration, min_query_length: usize) -> Self {
        Self {
            geocoder,
            debouncer: SearchDebouncer::new(debounce),
            min_query_length,
            query: String::new(),
            results: Vec::new(),
            open: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[GeocodingResult] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The dropdown is painted only while open with something in it.
    pub fn dropdown_visible(&self) -> bool {
        self.open && !self.results.is_empty()
    }

    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn focus(&mut self) {
        self.open = true;
    }

    /// The text box changed.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();
        self.open = true;
        self.debouncer.push(self.query.clone(), now);
    }

    /// Run the debounced search if it is due. Returns whether the results
    /// were replaced.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => {
                self.run(&query);
                true
            }
            None => false,
        }
    }

    /// Run any pending search now.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(query) => {
                self.run(&query);
                true
            }
            None => false,
        }
    }

    fn run(&mut self, query: &str) {
        if query.trim().chars().count() < self.min_query_length {
            self.results.clear();
            return;
        }
        self.results = self.geocoder.search(query);
        tracing::debug!("{} results for '{}'", self.results.len(), query);
    }

    pub fn rows(&self) -> Vec<SearchResultRow> {
        self.results
            .iter()
            .map(|r| SearchResultRow {
                title: r.title().to_string(),
                subtitle: r.display_name.clone(),
            })
            .collect()
    }

    /// Centre the map on result `index` and reset the box. Out-of-range
    /// indices are ignored.
    pub fn select(&mut self, store: &mut MapStore, index: usize) -> Option<LatLon> {
        let position = self.results.get(index)?.position();
        tracing::info!("Search selected {}", position);
        store.set_center_from(position, ViewportOrigin::Search);
        self.query.clear();
        self.results.clear();
        self.open = false;
        self.debouncer.cancel();
        Some(position)
    }
}

impl std::fmt::Debug for SearchBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBar")
            .field("query", &self.query)
            .field("results", &self.results.len())
            .field("open", &self.open)
            .finish()
    }
}
