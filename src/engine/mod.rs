pub mod aggregate;
pub mod errors;
