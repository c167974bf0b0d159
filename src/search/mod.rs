pub mod draw;
pub mod panel;
pub mod proximity;
pub mod query;

pub use draw::{DrawEffect, DrawEvent, DrawSession, DrawState};
pub use panel::{ResultsPanel, Viewport};
pub use proximity::{request_position, ProximitySession, ProximityStatus, DEFAULT_PROXIMITY_RADIUS_M};
pub use query::{find_within_radius, haversine_distance};
