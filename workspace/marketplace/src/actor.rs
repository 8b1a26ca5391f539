use model::UserRole;
use model::entities::user;

/// The authenticated user performing an operation.
///
/// Anonymous requests are modelled as `Option<&Actor>::None` at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: i32, role: UserRole) -> Self {
        Self { id, role }
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id, user.role)
    }
}
