//! Role record: a named bundle of permissions. Roles are keyed by unique
//! name and are not tenant-scoped.

use crate::models::identifier::Identifier;
use crate::models::permission::{ApiPermission, ViewPermission};
use crate::services::records::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub api_permissions: Vec<ApiPermission>,
    pub view_permissions: Vec<ViewPermission>,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        api_permissions: Vec<ApiPermission>,
        view_permissions: Vec<ViewPermission>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            api_permissions,
            view_permissions,
        }
    }

    /// Identifier kinds accepted when looking up roles.
    pub fn is_valid_identifier(identifier: &Identifier) -> bool {
        matches!(identifier, Identifier::Id(_) | Identifier::Name(_))
    }
}

impl Entity for Role {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
