//! Core trait abstractions.

pub mod clock;
pub mod provider;

pub use clock::{Clock, TokioClock};
pub use provider::ListingProvider;
