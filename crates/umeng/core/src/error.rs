//! Error taxonomy for building and sending pushes.

use crate::{AddressingKind, CastType};

/// Missing or malformed input, detected before any network call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The cast type needs an audience that was not given or is empty.
    #[error("{cast} requires {expected}")]
    MissingAddressing {
        cast: CastType,
        expected: &'static str,
    },

    /// The audience kind does not fit the cast type.
    #[error("{cast} cannot be addressed by {given}")]
    UnsupportedAddressing {
        cast: CastType,
        given: AddressingKind,
    },

    /// Groupcast with no tags and no explicit opt-in.
    #[error("groupcast tag filter is empty")]
    EmptyTagFilter,

    /// Caller values tried to set an addressing or body-structure field directly.
    #[error("`{0}` is reserved and cannot be set through values")]
    ReservedKey(String),

    /// Customized iOS field collides with the payload structure.
    #[error("`{0}` is reserved in the iOS payload")]
    ReservedCustomKey(String),

    #[error("unknown platform `{0}`")]
    UnknownPlatform(String),
}

/// Signing precondition violated.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("app master secret is empty")]
    MissingSecret,

    #[error("request body is empty")]
    EmptyBody,
}

/// Network or HTTP-level failure.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed API response: {0}")]
    Decode(String),
}

/// Bulk token or alias upload failed.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("nothing to upload")]
    EmptyContent,

    #[error("upload transport failed: {0}")]
    Transport(#[source] TransportError),

    #[error("upload rejected ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("upload response has no file_id")]
    MissingFileId,

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Any failure of a push send.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
