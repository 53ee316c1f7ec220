pub mod prelude;

pub mod client_requests;
pub mod requests;
pub mod users;
