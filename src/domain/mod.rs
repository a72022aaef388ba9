//! Domain layer: placements, bookings, the status machine, slot
//! conflict rules, creative resolution and the event system.

pub mod ad_type;
pub mod booking;
pub mod booking_event;
pub mod conflict;
pub mod creative;
pub mod date_range;
pub mod event_bus;

pub use ad_type::AdType;
pub use booking::{Booking, BookingId, BookingStatus, NewBooking};
pub use booking_event::BookingEvent;
pub use creative::{Creative, CreativeSource, LegacyAd, LegacyAdPatch, NewLegacyAd};
pub use event_bus::EventBus;
