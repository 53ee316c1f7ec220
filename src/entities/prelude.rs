pub use super::client_requests::Entity as ClientRequests;
pub use super::requests::Entity as Requests;
pub use super::users::Entity as Users;
