//! Umeng Push Dispatch
//!
//! Builds, signs, uploads and transmits pushes to the Umeng API.

mod builder;
mod dispatcher;
mod endpoints;
mod http;
mod outcome;
mod traits;
mod upload;

#[cfg(test)]
mod testing;

pub use builder::*;
pub use dispatcher::*;
pub use endpoints::*;
pub use http::*;
pub use outcome::*;
pub use traits::*;
pub use upload::*;

// Re-export for convenience
pub use umeng_core;
pub use umeng_crypto;
