//! Domain types of the booking core: appointments, the slot catalog, admin
//! accounts, admin-side filters, and the ports the engine is built against.

pub mod admin;
pub mod appointment;
pub mod filter;
pub mod ports;
pub mod slot;
