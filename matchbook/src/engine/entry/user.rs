use serde::{Deserialize, Serialize};

/// A registered participant. The engine only checks identity and ownership;
/// contact details ride along as an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl User {
    pub fn new(user_id: &str, name: &str, phone: &str, email: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.user_id.is_empty()
            && !self.name.is_empty()
            && !self.phone.is_empty()
            && !self.email.is_empty()
    }
}
