//! Utility modules

pub mod csv_io;
pub mod memory;
pub mod validation;

pub use csv_io::*;
pub use memory::*;
pub use validation::*;
