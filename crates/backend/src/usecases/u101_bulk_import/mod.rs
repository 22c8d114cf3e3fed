pub mod executor;
pub mod row_reader;

pub use executor::ImportExecutor;
