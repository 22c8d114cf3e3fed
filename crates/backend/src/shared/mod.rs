pub mod config;
pub mod data;
pub mod dates;
pub mod export;
pub mod logging;
pub mod valuation;
