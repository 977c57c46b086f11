//! Setting handlers for different configuration patterns.

pub mod number;
pub mod path;
pub mod string;

pub use number::*;
pub use path::*;
pub use string::*;
