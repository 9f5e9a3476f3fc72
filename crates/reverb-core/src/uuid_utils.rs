//! Time-ordered identifiers.
//!
//! Every entity ID in the workspace is a UUIDv7 (RFC 9562). The leading
//! 48 bits hold a Unix millisecond timestamp, so `ORDER BY id DESC` yields
//! newest-first without touching a timestamp column. The listing endpoints
//! depend on that property.

use uuid::Uuid;

/// Mint a time-ordered UUIDv7.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

/// True when `uuid` carries the version-7 marker.
#[inline]
pub fn is_v7(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 7
}
