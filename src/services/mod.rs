//! Read models and derived views layered over the store.
//!
//! Services take `&MeetingDb` / `&mut MeetingDb`; callers hold the state lock for the
//! duration of one call. Anything time-dependent takes `now` as an argument.

pub mod dashboard;
pub mod meetings;
pub mod reports;
