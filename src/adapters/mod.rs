pub mod clone;
pub mod codecommit;
pub mod sigv4;
pub mod terminal;
