pub mod access;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod logger;


pub use access::{Capability, CapabilityMatrix, Role};
pub use clock::{Clock, FixedClock, SystemClock};
pub use crate::config::Settings;
pub use error::{CoreError, CoreResult, DataIntegrityWarning};
pub use geo::GeoPoint;
