pub mod aggregate;

pub use aggregate::{ProductProfile, ProductProfileDto, ProductProfileId};
