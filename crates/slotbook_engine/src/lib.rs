// --- File: crates/slotbook_engine/src/lib.rs ---
pub mod availability;
pub mod booking;
pub mod error;
pub mod memory;
pub mod reducer;
#[cfg(test)]
mod reducer_proptest;
pub mod slots;
pub mod time_range;
pub mod working_hours;

pub use availability::AvailabilityService;
pub use booking::{Appointment, BookingConfirmation, BookingCoordinator, BookingState};
pub use error::{ProviderOperation, SchedulingError};
pub use memory::InMemoryCalendar;
pub use reducer::{merge, subtract, BusyIntervalSet, FreeIntervalSet};
pub use slots::{slice, Slot, Slots};
pub use time_range::TimeRange;
pub use working_hours::WorkingHours;
