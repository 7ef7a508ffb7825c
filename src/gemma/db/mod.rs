pub mod raw;
pub mod processed;
pub mod warehouse_queries;

pub use raw::Raw;
pub use processed::Processed;
