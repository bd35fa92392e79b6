// HTTP routes
pub mod health;
pub mod stream;

pub use health::*;
pub use stream::*;
