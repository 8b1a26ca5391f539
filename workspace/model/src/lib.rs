pub mod entities;

pub use entities::property::PropertyStatus;
pub use entities::user::UserRole;
