//! Moonquake events: the dataset format, validation and the event registry.

mod catalog;
mod record;

pub use catalog::{CatalogError, QuakeCatalog, RejectReason, RejectedRecord};
pub use record::{
    Quake, QuakeId, QuakeRecord, QuakeTimestamp, RecordError, StationRecord, StringOrNumber,
};
