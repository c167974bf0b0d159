//! Map-based spatial search over property listings: "near me" proximity
//! search around the device and free-form circle search drawn on the map.

pub mod config;
pub mod error;
pub mod location;
pub mod map;
pub mod models;
pub mod page;
pub mod search;

pub use config::SearchConfig;
pub use error::GeolocationError;
pub use page::{ControlsView, RecordingObserver, SearchObserver, SearchPage};
