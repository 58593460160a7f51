pub mod constants;
pub mod sanitize;
pub mod test_helpers;
pub mod types;
