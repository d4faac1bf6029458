pub mod hierarchy;

pub use hierarchy::{name, Hierarchy, Zone};
