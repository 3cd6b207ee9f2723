//! # Primitives
//!
//! Compiled-in constants for the subscription catalog.

/// Namespace assigned to subscriber records that carry no explicit one.
pub const DEFAULT_NAMESPACE: &str = "member";

/// Namespace used for subscribers identified only by an email address.
pub const EMAIL_NAMESPACE: &str = "email";

/// Magic bytes for the snapshot binary format header.
///
/// - File Header = Magic Bytes ("SUBS") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"SUBS";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Number of digest bytes folded into a subscription key.
pub const KEY_DIGEST_BYTES: usize = 16;

/// Length of a generated subscription key (unpadded base64 of 16 bytes).
pub const KEY_LENGTH: usize = 22;

/// Human-readable description of the key generation scheme.
pub const KEY_DESCRIPTION: &str = "URL-safe base64 (no padding) of the first 16 bytes of a \
     BLAKE3 digest over the slash-delimited relationship name, subscriber namespace, \
     subscriber identifier and item uid.";
