pub mod create_user;
pub mod initdb;
pub mod seed;
pub mod serve;

pub use create_user::create_user;
pub use initdb::{connect_and_migrate, init_database};
pub use seed::seed;
pub use serve::serve;
