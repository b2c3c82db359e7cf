mod error;
pub mod utils;
