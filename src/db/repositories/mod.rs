pub mod request;
pub mod user;
