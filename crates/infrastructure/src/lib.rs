//! NDNS Infrastructure Layer
pub mod bootstrap;
pub mod ndns;
