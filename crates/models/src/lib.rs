pub mod errors;
pub mod line;
