pub mod enumerate;
pub mod walk;

pub use enumerate::*;
pub use walk::*;
