pub mod branch;
pub mod commit;
pub mod repository;

// Re-exports for convenience
pub use branch::*;
pub use commit::*;
pub use repository::*;
