//! Identifier and timestamp generation for newly uploaded records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// `"<unix millis>_<8 hex chars>"`: sorts by creation time, unique across devices.
pub fn new_photo_id(now: DateTime<Utc>) -> String {
    format!("{}_{}", now.timestamp_millis(), random_suffix())
}

pub fn new_spot_id(now: DateTime<Utc>) -> String {
    format!("spot_{}", new_photo_id(now))
}

/// The random part of an id from [`new_photo_id`], used to keep stored
/// filenames apart when two uploads share a millisecond.
pub fn id_suffix(id: &str) -> &str {
    id.rsplit_once('_').map_or(id, |(_, suffix)| suffix)
}

/// Timestamp stored on a `PhotoDetail`.
pub fn detail_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    suffix
}
