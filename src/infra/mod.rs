pub mod keys;
pub mod twitter;
