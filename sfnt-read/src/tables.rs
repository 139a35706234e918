//! The various font tables

pub mod layout;
pub mod math;
