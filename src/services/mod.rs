pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod request_service;
pub mod request_service_impl;
pub use request_service::{RequestError, RequestService};
pub use request_service_impl::SeaOrmRequestService;
