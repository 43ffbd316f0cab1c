pub mod locator;
pub mod service;
pub mod source;
pub mod unit;


pub use locator::{locate, UnitMatch};
pub use service::{DispatchService, LocateRequest};
pub use source::{InMemoryUnitSource, UnitSource};
pub use unit::{EmergencyType, Facility, TransportUnit, UnitStatus};
