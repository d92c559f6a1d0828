//! Journey service: validated create/read/update/delete, synchronous or queued.

mod journey;
pub mod validation;

pub use journey::JourneyService;
