//! User record: a human or API identity owned by a party.

use crate::models::identifier::Identifier;
use crate::models::party::{Id, PartyType};
use crate::services::records::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub email_address: String,
    pub registered: bool,
    /// Names of the roles assigned to this user.
    pub roles: Vec<String>,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl User {
    /// Identifier kinds accepted when looking up users.
    pub fn is_valid_identifier(identifier: &Identifier) -> bool {
        matches!(
            identifier,
            Identifier::Id(_) | Identifier::Username(_) | Identifier::EmailAddress(_)
        )
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
