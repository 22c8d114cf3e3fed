pub mod aggregate;

pub use aggregate::{ReturnRecord, ReturnRecordDto, ReturnRecordId};
