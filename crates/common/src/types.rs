pub mod record;

pub use self::record::{Record, Series, values_of};
