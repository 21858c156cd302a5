//! View-layer collaborators: CSV export, text renderers and notifications.

pub mod csv;
pub mod notify;
pub mod render;
