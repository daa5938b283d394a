pub mod codecommit;
pub mod report;

// Re-exports
pub use codecommit::*;
pub use report::*;
