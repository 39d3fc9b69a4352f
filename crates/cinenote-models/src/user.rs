use serde::{Deserialize, Serialize};

/// Public view of an account. Credentials never travel with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub username: String,
}
