//! Data models for kishop.
//!
//! - [`LineItem`] - one row of the list
//! - [`Snapshot`] - whole-app blob kept in local storage
//! - [`numeric`] - lenient number coercion shared by everything above

pub mod item;
pub mod numeric;
pub mod snapshot;

pub use item::{ItemField, ItemId, LineItem, DEFAULT_QUANTITY};
pub use numeric::parse_number;
pub use snapshot::{Snapshot, SNAPSHOT_KEY};
