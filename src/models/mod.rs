pub mod file_type;
pub mod request;
pub mod response;

pub use file_type::*;
pub use request::*;
pub use response::*;
