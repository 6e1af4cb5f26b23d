//! Domain models for the DentaSys system.

mod doctor;
mod patient;
mod payment;
mod record;
mod treatment;

pub use doctor::*;
pub use patient::*;
pub use payment::*;
pub use record::*;
pub use treatment::*;
