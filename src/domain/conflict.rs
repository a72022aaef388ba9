//! Slot conflict checks over an already-loaded set of bookings.
//!
//! These are advisory: the store enforces the same uniqueness rule on
//! write, and its [`ApiError::SlotConflict`] is authoritative.

use chrono::NaiveDate;

use super::{AdType, Booking, BookingId};
use crate::error::ApiError;

/// Returns the bookings that currently hold `(date, ad_type)`.
pub fn slot_holders(
    bookings: &[Booking],
    date: NaiveDate,
    ad_type: AdType,
) -> impl Iterator<Item = &Booking> {
    bookings
        .iter()
        .filter(move |b| b.slot() == (date, ad_type) && b.status.holds_slot())
}

/// Validates moving booking `id` to `new_date`.
///
/// Scans every other slot-holding booking of the same ad type; if one
/// already sits on `new_date` the edit is refused.
///
/// # Errors
///
/// Returns [`ApiError::SlotConflict`] naming the conflicting date.
pub fn check_date_edit(
    bookings: &[Booking],
    id: BookingId,
    ad_type: AdType,
    new_date: NaiveDate,
) -> Result<(), ApiError> {
    if slot_holders(bookings, new_date, ad_type).any(|b| b.id != id) {
        return Err(ApiError::SlotConflict {
            ad_type,
            dates: vec![new_date],
        });
    }
    Ok(())
}

/// Returns the subset of `dates` already held for `ad_type`, in input order.
#[must_use]
pub fn taken_dates(bookings: &[Booking], ad_type: AdType, dates: &[NaiveDate]) -> Vec<NaiveDate> {
    dates
        .iter()
        .copied()
        .filter(|date| slot_holders(bookings, *date, ad_type).next().is_some())
        .collect()
}
