pub mod credentials;
pub mod user;

pub use credentials::*;
pub use user::*;
