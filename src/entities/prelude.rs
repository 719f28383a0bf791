pub use super::jutsus::Entity as Jutsus;
pub use super::users::Entity as Users;
