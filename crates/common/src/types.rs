pub mod aggregate;
pub mod preset;
pub mod record;

pub use self::aggregate::{ServerAggregate, parse_count, parse_percent};
pub use self::preset::Preset;
pub use self::record::{TimestampedRecord, lookup_field, parse_timestamp};
