//! Service layer of the toner-return back-office: persistence, the
//! valuation/import core and the export boundary. The HTTP surface, auth and
//! file storage live elsewhere; this crate only consumes their capabilities.

pub mod domain;
pub mod shared;
pub mod usecases;
