use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::User;

/// What the session provider yields for an active caller.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "<{}>", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_user() {
        let user = User {
            id: 3,
            email: "admin@example.com".into(),
            name: "Admin".into(),
            created_ts: 1234567890,
        };
        let identity = Identity::from(&user);
        assert_eq!(identity.id, 3);
        assert_eq!(identity.to_string(), "Admin <admin@example.com>");

        let identity = Identity {
            name: "".into(),
            ..identity
        };
        assert_eq!(identity.to_string(), "<admin@example.com>");
    }
}
