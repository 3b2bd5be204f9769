//! Request handlers, one module per resource.

pub mod baked_goods;
pub mod bakeries;
pub mod health;
pub mod metrics;
pub mod root;

use store::BakeryStore;

/// Shared application state accessible from all handlers.
///
/// Holds the injected store handle; handlers never reach for process-wide
/// globals.
pub struct AppState<S: BakeryStore> {
    pub store: S,
}
