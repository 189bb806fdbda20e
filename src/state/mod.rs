//! Centralized state management with reactive updates to UI components.
//!
//! This module provides the shared observable cells backing the storefront
//! UI, plus the registry object that owns them.

pub mod cell;
pub mod store_state;

pub use {
    cell::{ObservableCell, Subscription},
    store_state::{DEFAULT_SORT_OPTION, StoreEvent, StoreState},
};
