//! Background components mounted behind the check-in app.

pub mod butterflies;
pub mod glow_field;
