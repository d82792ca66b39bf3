// authoritative-only responder for a small fixed zone
// A and CNAME records, UDP only, one answer per query

pub mod codec;
pub mod error;
pub mod listener;
pub mod resolver;
pub mod zone;

pub use error::Error;
pub use resolver::{Policy, Resolver};
pub use zone::{RecordKind, ResourceRecord, Zone, ZoneError};
