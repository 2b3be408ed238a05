//! Keel Audio
//!
//! Volume unit conversions and the handle the client uses to push volume
//! changes to the playback backend.

pub mod backend;
pub mod units;

pub use backend::{AudioBackend, SharedVolume};
pub use units::{db_to_lv100, lv100_to_db, DB_FLOOR};
