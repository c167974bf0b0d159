pub mod fixed;
pub mod http;
pub mod traits;
pub mod types;

pub use fixed::{FixedLocationProvider, UnsupportedLocationProvider};
pub use http::HttpLocationProvider;
pub use traits::LocationProvider;
pub use types::PositionOptions;
