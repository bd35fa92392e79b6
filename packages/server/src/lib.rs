// Listing Stream Server - API Core
//
// Serves incremental property listing searches over Server-Sent Events.
// The ingestion pipeline lives in the listing-feed crate; this crate owns
// configuration, HTTP wiring and request validation.

pub mod config;
pub mod server;

pub use config::*;
