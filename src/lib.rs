//! Storefront State - Shared Observable UI State
//!
//! Shared, observable application state for a client-side storefront UI:
//! the selected category, the search query text, and the sort option. Each
//! lives in an independent observable cell supporting synchronous reads,
//! unconditional writes, derived updates, and insertion-ordered subscriber
//! notification. The cells are owned by an explicit [`StoreState`] registry
//! that is constructed once and passed by reference to the components that
//! need it.

pub mod state;

// Re-export key types for convenience
pub use state::{DEFAULT_SORT_OPTION, ObservableCell, StoreEvent, StoreState, Subscription};
