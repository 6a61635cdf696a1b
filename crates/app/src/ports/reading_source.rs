//! Reading source port: obtains one best-effort measurement from a sensor.

use std::future::Future;
use std::time::Duration;

use thermohub_domain::address::MacAddress;
use thermohub_domain::reading::Reading;

/// Why a read produced no reading at all.
///
/// Every variant is classified the same way by the poller (the accessory
/// goes to fault); the distinction only matters for logs.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("read timed out after {0:?}")]
    Timeout(Duration),

    #[error("no reading available for {0}")]
    Unavailable(MacAddress),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("malformed payload: {0}")]
    Payload(String),
}

/// Produces readings for a sensor identified by its hardware address.
///
/// Implementations may block for several seconds; the poller bounds every
/// call with its own timeout. Partial readings are returned as `Ok` with the
/// missing fields set to `None`.
pub trait ReadingSource: Send + Sync {
    fn read(&self, address: MacAddress) -> impl Future<Output = Result<Reading, ReadError>> + Send;
}

impl<T: ReadingSource> ReadingSource for std::sync::Arc<T> {
    fn read(&self, address: MacAddress) -> impl Future<Output = Result<Reading, ReadError>> + Send {
        (**self).read(address)
    }
}
