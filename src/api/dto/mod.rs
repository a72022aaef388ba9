//! Data Transfer Objects for REST request/response serialization.
//!
//! Dates travel as ISO `YYYY-MM-DD` strings, ids as UUID strings.

pub mod ad_dto;
pub mod booking_dto;
pub mod checkout_dto;
pub mod common_dto;

pub use ad_dto::*;
pub use booking_dto::*;
pub use checkout_dto::*;
pub use common_dto::*;
