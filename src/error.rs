use std::time::Duration;
use thiserror::Error;

/// Failure to resolve the device location.
///
/// The page only ever sees a single "geolocation failed" signal; the
/// variants exist for logging and for providers to report what happened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    /// The platform has no location API at all.
    #[error("geolocation is not supported on this platform")]
    Unsupported,

    /// The user or platform refused the location request.
    #[error("geolocation permission denied")]
    Denied,

    /// No position arrived within the bounded wait.
    #[error("geolocation timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered but could not produce a position.
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, GeolocationError>;
