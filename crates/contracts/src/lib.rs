//! Shared contracts for the toner-return back-office: domain aggregates,
//! enums and use-case DTOs. No IO here, types only.

pub mod domain;
pub mod enums;
pub mod usecases;
