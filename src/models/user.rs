use serde::{Deserialize, Serialize};

/// A registered user
///
/// Registration and login live in the account collaborator; this service only
/// reads users to attribute interactions and enforce token checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub is_active: bool,
}
