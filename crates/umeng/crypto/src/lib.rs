//! Umeng Request Signing
//!
//! MD5 request signatures and signed request descriptors.

mod signature;

pub use signature::*;
