//! Location search component
//!
//! Turns free-text input into a ranked candidate list and resolves one user
//! choice into the persisted selected location.
//!
//! - Input is debounced (300 ms by default) before a search is issued
//! - Every issued search carries a sequence number; only the response to
//!   the latest one is applied, so a slow reply to an old query can never
//!   overwrite newer results
//! - Arrow keys move a wrapping highlight through the list
//! - Enter, submit or a click commits a candidate, persists it, and signals
//!   navigation to the next view

pub mod debounce;
pub mod selection;

use crate::config::Config;
use crate::error::Result;
use crate::geo::{Candidate, GeoBackend};
use crate::store::{LocationStore, SelectedLocation};
use debounce::Debouncer;
use selection::Selection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Keys the search field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
}

/// Input to the search component
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// The text field changed
    Input(String),
    /// A key was pressed while the field had focus
    Key(NavKey),
    /// A rendered candidate was clicked
    Click(usize),
    /// The form was submitted
    Submit,
}

/// Output for whoever renders the component
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// The candidate list was replaced (empty means hide the list)
    Candidates(Vec<Candidate>),
    /// Scroll this candidate into view and highlight it
    Highlight(usize),
    /// A location was committed and persisted
    Committed(SelectedLocation),
}

/// Receives the "go to next view" signal
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str, location: &SelectedLocation);
}

/// A search the component wants issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Synchronous search state
///
/// Holds no I/O; [`LocationSearch`] drives it from events and responses.
#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    latest_seq: u64,
    selection: Selection,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settled query text
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Start a search for a settled query
    ///
    /// Any response still in flight becomes stale. A blank query clears the
    /// list and needs no request.
    pub fn begin_query(&mut self, query: &str) -> Option<SearchRequest> {
        self.query = query.to_string();
        self.latest_seq += 1;

        if query.trim().is_empty() {
            self.selection.clear();
            return None;
        }

        Some(SearchRequest {
            seq: self.latest_seq,
            query: query.to_string(),
        })
    }

    /// Apply a search response; returns false if it was stale and dropped
    pub fn apply_results(&mut self, seq: u64, candidates: Vec<Candidate>) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        self.selection.replace(candidates);
        true
    }

    /// Move the highlight; returns the index to scroll into view
    pub fn navigate(&mut self, key: NavKey) -> Option<usize> {
        match key {
            NavKey::Down => self.selection.move_down(),
            NavKey::Up => self.selection.move_up(),
            NavKey::Enter => None,
        }
    }

    /// Resolve a commit into a location record
    ///
    /// `index` is an explicit click; None uses the highlight or the top
    /// result. An empty list (or an out-of-range click) commits nothing.
    /// On success the list is cleared, the query shows the chosen label and
    /// in-flight responses become stale.
    pub fn commit(&mut self, index: Option<usize>) -> Result<Option<SelectedLocation>> {
        let Some((_, candidate)) = self.selection.resolve(index) else {
            return Ok(None);
        };
        let location = SelectedLocation::from_candidate(candidate)?;

        self.query = location.label.clone();
        self.latest_seq += 1;
        self.selection.clear();

        Ok(Some(location))
    }
}

/// Async location search component
pub struct LocationSearch<G> {
    geocoder: Arc<G>,
    store: LocationStore,
    navigator: Arc<dyn Navigator>,
    route: String,
    quiet: Duration,
    state: SearchState,
    updates: Option<mpsc::UnboundedSender<SearchUpdate>>,
}

impl<G: GeoBackend + 'static> LocationSearch<G> {
    /// Create a component using the `[search]` and `[navigation]` settings
    pub fn new(
        geocoder: Arc<G>,
        store: LocationStore,
        navigator: Arc<dyn Navigator>,
        config: &Config,
    ) -> Self {
        Self {
            geocoder,
            store,
            navigator,
            route: config.navigation.next_route.clone(),
            quiet: config.search.debounce(),
            state: SearchState::new(),
            updates: None,
        }
    }

    /// Send render updates to `tx`
    pub fn with_updates(mut self, tx: mpsc::UnboundedSender<SearchUpdate>) -> Self {
        self.updates = Some(tx);
        self
    }

    fn emit(&self, update: SearchUpdate) {
        if let Some(tx) = &self.updates {
            let _ = tx.send(update);
        }
    }

    /// Process events until a location is committed or `events` closes
    ///
    /// Returns the committed location, or None if the input ended first.
    pub async fn run(mut self, mut events: mpsc::Receiver<SearchEvent>) -> Result<Option<SelectedLocation>> {
        let (mut debouncer, mut settled) = Debouncer::new(self.quiet);
        debug!(quiet_ms = debouncer.quiet().as_millis() as u64, "Search input loop started");
        let (result_tx, mut results) = mpsc::unbounded_channel::<(u64, Result<Vec<Candidate>>)>();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Search input closed without a selection");
                        return Ok(None);
                    };

                    let commit = match event {
                        SearchEvent::Input(text) => {
                            debouncer.push(text);
                            None
                        }
                        SearchEvent::Key(NavKey::Enter) | SearchEvent::Submit => Some(None),
                        SearchEvent::Click(index) => Some(Some(index)),
                        SearchEvent::Key(key) => {
                            if let Some(index) = self.state.navigate(key) {
                                self.emit(SearchUpdate::Highlight(index));
                            }
                            None
                        }
                    };

                    if let Some(index) = commit {
                        if let Some(location) = self.commit(index)? {
                            debouncer.cancel();
                            return Ok(Some(location));
                        }
                    }
                }

                Some(query) = settled.recv() => {
                    match self.state.begin_query(&query) {
                        Some(request) => {
                            debug!(seq = request.seq, query = %request.query, "Issuing search");
                            let geocoder = Arc::clone(&self.geocoder);
                            let tx = result_tx.clone();
                            tokio::spawn(async move {
                                let outcome = geocoder.search(&request.query).await;
                                let _ = tx.send((request.seq, outcome));
                            });
                        }
                        None => self.emit(SearchUpdate::Candidates(Vec::new())),
                    }
                }

                Some((seq, outcome)) = results.recv() => {
                    match outcome {
                        Ok(candidates) => {
                            let snapshot = candidates.clone();
                            if self.state.apply_results(seq, candidates) {
                                self.emit(SearchUpdate::Candidates(snapshot));
                            } else {
                                debug!(seq, "Discarding stale search response");
                            }
                        }
                        Err(e) => warn!(seq, error = %e, "Search failed"),
                    }
                }
            }
        }
    }

    /// Commit, persist and navigate; None if there was nothing to commit
    fn commit(&mut self, index: Option<usize>) -> Result<Option<SelectedLocation>> {
        let location = match self.state.commit(index) {
            Ok(Some(location)) => location,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "Ignoring candidate with unusable coordinates");
                return Ok(None);
            }
        };

        self.store.save(&location)?;
        info!(route = %self.route, label = %location.label, "Location committed");
        self.navigator.navigate(&self.route, &location);
        self.emit(SearchUpdate::Committed(location.clone()));

        Ok(Some(location))
    }
}
