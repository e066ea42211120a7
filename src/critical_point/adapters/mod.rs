//! Adapter implementations for critical point ports.

pub mod memory;
pub mod postgres;
