//! Shared storefront state with reactive update mechanisms.
//!
//! This module provides the central `StoreState` container holding the
//! category filter, search query, and sort option shared across the
//! storefront UI, each as an independently observable cell.

use std::sync::Arc;

use {
    async_channel::{Receiver, Sender, unbounded},
    parking_lot::RwLock,
    tracing::debug,
};

use crate::state::cell::{ObservableCell, Subscription};

/// Sort option applied when no explicit ordering has been chosen.
pub const DEFAULT_SORT_OPTION: &str = "default";

/// Storefront state change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Selected category changed.
    CategoryChanged(String),
    /// Search query text changed.
    SearchQueryChanged(String),
    /// Sort option changed.
    SortOptionChanged(String),
}

/// Central storefront state container with thread-safe access.
///
/// Holds the three shared cells and provides a combined event stream for
/// async consumers. Construct one registry per application (or per test)
/// and pass it by reference to the components that need it; cloning yields
/// another handle to the same underlying cells.
#[derive(Debug, Clone)]
pub struct StoreState {
    /// Currently selected category. Empty means no category filter.
    pub selected_category: ObservableCell<String>,
    /// Current search query text. Empty means no query.
    pub search_query: ObservableCell<String>,
    /// Current sort option. Opaque text; no closed set is enforced here.
    pub sort_option: ObservableCell<String>,
    /// Active event-stream subscribers for manual broadcast fan-out.
    event_senders: Arc<RwLock<Vec<Sender<StoreEvent>>>>,
}

impl StoreState {
    /// Creates a registry with all cells at their defaults: empty category,
    /// empty query, and [`DEFAULT_SORT_OPTION`].
    #[must_use]
    pub fn new() -> Self {
        let state = Self {
            selected_category: ObservableCell::new(String::new()),
            search_query: ObservableCell::new(String::new()),
            sort_option: ObservableCell::new(DEFAULT_SORT_OPTION.to_string()),
            event_senders: Arc::new(RwLock::new(Vec::new())),
        };

        bridge(
            &state.selected_category,
            &state.event_senders,
            StoreEvent::CategoryChanged,
        );
        bridge(
            &state.search_query,
            &state.event_senders,
            StoreEvent::SearchQueryChanged,
        );
        bridge(
            &state.sort_option,
            &state.event_senders,
            StoreEvent::SortOptionChanged,
        );

        state
    }

    /// Subscribes to changes across all three cells.
    ///
    /// The receiver observes one [`StoreEvent`] per accepted change from
    /// subscription onward; current values are not replayed. Dropped
    /// receivers are pruned on the next broadcast.
    ///
    /// # Returns
    ///
    /// A receiver for storefront state change events.
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        debug!("StoreState: new event subscription created");

        let (tx, rx) = unbounded();
        self.event_senders.write().push(tx);

        rx
    }

    /// Gets the currently selected category.
    #[must_use]
    pub fn get_selected_category(&self) -> String {
        self.selected_category.get()
    }

    /// Sets the selected category and notifies subscribers.
    ///
    /// # Arguments
    ///
    /// * `category` - New category; empty clears the filter.
    pub fn set_selected_category(&self, category: String) {
        self.selected_category.set(category);
    }

    /// Gets the current search query text.
    #[must_use]
    pub fn get_search_query(&self) -> String {
        self.search_query.get()
    }

    /// Sets the search query text and notifies subscribers.
    ///
    /// # Arguments
    ///
    /// * `query` - New query text; empty clears the query.
    pub fn set_search_query(&self, query: String) {
        self.search_query.set(query);
    }

    /// Gets the current sort option.
    #[must_use]
    pub fn get_sort_option(&self) -> String {
        self.sort_option.get()
    }

    /// Sets the sort option and notifies subscribers.
    ///
    /// Any text is accepted; validating against the orderings the catalog
    /// actually supports is the consumer's concern.
    ///
    /// # Arguments
    ///
    /// * `option` - New sort option identifier.
    pub fn set_sort_option(&self, option: String) {
        self.sort_option.set(option);
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards accepted changes on one cell into the shared event stream.
///
/// The returned subscription handle is discarded on purpose: the bridge
/// lives for the cell's lifetime. The immediate delivery at registration
/// time reaches an empty sender list and is dropped.
fn bridge(
    cell: &ObservableCell<String>,
    senders: &Arc<RwLock<Vec<Sender<StoreEvent>>>>,
    make_event: fn(String) -> StoreEvent,
) {
    let senders = Arc::clone(senders);
    let _: Subscription = cell.subscribe(move |value: &String| {
        broadcast(&senders, make_event(value.clone()));
    });
}

/// Broadcasts an event to all event-stream subscribers.
/// Cleans up closed channels.
fn broadcast(senders: &RwLock<Vec<Sender<StoreEvent>>>, event: StoreEvent) -> usize {
    let mut senders = senders.write();
    let mut active = Vec::with_capacity(senders.len());
    let mut count = 0;

    for tx in senders.iter() {
        if tx.try_send(event.clone()).is_ok() {
            active.push(tx.clone());
            count += 1;
        }
    }

    *senders = active;
    count
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::state::store_state::{
        DEFAULT_SORT_OPTION, StoreEvent,
        StoreEvent::{CategoryChanged, SortOptionChanged},
        StoreState,
    };

    #[test]
    fn test_store_state_defaults() {
        let state = StoreState::new();

        assert_eq!(state.get_selected_category(), "");
        assert_eq!(state.get_search_query(), "");
        assert_eq!(state.get_sort_option(), DEFAULT_SORT_OPTION);
    }

    #[test]
    fn test_accessors_delegate_to_cells() {
        let state = StoreState::new();

        state.set_selected_category("vinyl".to_string());
        state.set_search_query("turntable".to_string());
        state.set_sort_option("price-asc".to_string());

        assert_eq!(state.selected_category.get(), "vinyl");
        assert_eq!(state.search_query.get(), "turntable");
        assert_eq!(state.sort_option.get(), "price-asc");
    }

    #[test]
    fn test_cells_are_independent() {
        let state = StoreState::new();
        let query_changes = Arc::new(Mutex::new(0_usize));

        let counter = Arc::clone(&query_changes);
        let _sub = state.search_query.subscribe(move |_: &String| {
            *counter.lock() += 1;
        });

        state.set_selected_category("books".to_string());
        state.set_sort_option("newest".to_string());

        // Only the immediate delivery at registration time.
        assert_eq!(*query_changes.lock(), 1);
    }

    #[test]
    fn test_sort_option_flow() {
        let state = StoreState::new();
        assert_eq!(state.get_sort_option(), "default");

        state.set_sort_option("price-asc".to_string());
        assert_eq!(state.get_sort_option(), "price-asc");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = state.sort_option.subscribe(move |value: &String| {
            sink.lock().push(value.clone());
        });
        assert_eq!(*seen.lock(), vec!["price-asc".to_string()]);

        state.set_sort_option("price-desc".to_string());
        assert_eq!(
            *seen.lock(),
            vec!["price-asc".to_string(), "price-desc".to_string()]
        );
    }

    #[tokio::test]
    async fn test_event_stream_observes_changes() {
        let state = StoreState::new();
        let events = state.subscribe();

        state.set_selected_category("shoes".to_string());
        state.set_sort_option("price-asc".to_string());

        assert_eq!(
            events.recv().await.unwrap(),
            CategoryChanged("shoes".to_string())
        );
        assert_eq!(
            events.recv().await.unwrap(),
            SortOptionChanged("price-asc".to_string())
        );
    }

    #[tokio::test]
    async fn test_event_stream_skips_deduplicated_sets() {
        let state = StoreState::new();
        let events = state.subscribe();

        state.set_sort_option(DEFAULT_SORT_OPTION.to_string());
        state.set_sort_option("newest".to_string());

        assert_eq!(
            events.recv().await.unwrap(),
            SortOptionChanged("newest".to_string())
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned() {
        let state = StoreState::new();

        let stale = state.subscribe();
        drop(stale);

        let live: async_channel::Receiver<StoreEvent> = state.subscribe();
        state.set_search_query("headphones".to_string());

        assert_eq!(
            live.recv().await.unwrap(),
            StoreEvent::SearchQueryChanged("headphones".to_string())
        );
    }
}
