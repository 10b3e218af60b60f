//! Umeng Core Types
//!
//! Request model for the Umeng push API: field sets, audience filters,
//! the platform/cast matrix, wire layout, and API replies.

mod cast;
mod error;
mod fields;
mod filter;
mod layout;
mod request;
mod response;

pub use cast::*;
pub use error::*;
pub use fields::*;
pub use filter::*;
pub use layout::*;
pub use request::*;
pub use response::*;
