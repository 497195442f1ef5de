//! Python interface layer for mcfrontier.

pub mod bindings;
pub mod numpy_bridge;
