pub mod converter;
pub mod file_check;

pub use converter::*;
pub use file_check::*;
