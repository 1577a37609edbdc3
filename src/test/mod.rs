// Test utilities, only compiled for tests
pub mod utils;
