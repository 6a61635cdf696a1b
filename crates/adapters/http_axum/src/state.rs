//! Shared application state for axum handlers.

use std::sync::Arc;

use thermohub_domain::sensor::SensorVariant;

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, C, H> {
    /// The accessory cache.
    pub accessories: Arc<R>,
    /// Published characteristics.
    pub characteristics: Arc<C>,
    /// History log.
    pub history: Arc<H>,
    /// Product variant every accessory was attached as.
    pub variant: SensorVariant,
}

impl<R, C, H> Clone for AppState<R, C, H> {
    fn clone(&self) -> Self {
        Self {
            accessories: Arc::clone(&self.accessories),
            characteristics: Arc::clone(&self.characteristics),
            history: Arc::clone(&self.history),
            variant: self.variant,
        }
    }
}

impl<R, C, H> AppState<R, C, H> {
    /// Create a new application state from shared port implementations.
    pub fn new(
        accessories: Arc<R>,
        characteristics: Arc<C>,
        history: Arc<H>,
        variant: SensorVariant,
    ) -> Self {
        Self {
            accessories,
            characteristics,
            history,
            variant,
        }
    }
}
