//! Row types mapping database tables onto the core domain models.

pub mod identity;
pub mod session;
