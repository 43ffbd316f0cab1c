pub mod intake;
pub mod ranker;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use intake::{IntakeEntry, IntakeStatus, TriageLevel};
pub use ranker::{rank_queue, summarize, QueueSummary, RankedEntry};
pub use service::TriageService;
pub use source::{InMemoryIntakeSource, IntakeSource};
