//! Chart aggregate: decoded input, configuration and fixed options.

pub mod entities;
pub mod specification;
pub mod value_objects;

pub use entities::*;
pub use specification::*;
pub use value_objects::*;
