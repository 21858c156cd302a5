//! Application layer containing the booking logic orchestration.
//!
//! [`engine::BookingEngine`] owns the appointment collection and
//! [`accounts::AdminAccountManager`] owns the administrator accounts. Both are
//! plain synchronous objects built over injected storage (and, for the engine,
//! a clock), so every operation runs to completion inside one call.

pub mod accounts;
pub mod engine;
