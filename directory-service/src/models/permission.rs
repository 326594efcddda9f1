//! Permission strings: opaque `"<ServiceProvider>.<Operation>"` identifiers
//! compared by exact equality. No wildcard or hierarchy semantics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission guarding one API operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiPermission(pub String);

impl ApiPermission {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ApiPermission {
    fn from(value: &str) -> Self {
        ApiPermission(value.to_string())
    }
}

impl fmt::Display for ApiPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission exposing one UI surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewPermission(pub String);

impl From<&str> for ViewPermission {
    fn from(value: &str) -> Self {
        ViewPermission(value.to_string())
    }
}

impl fmt::Display for ViewPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Known API permission strings.
pub mod api {
    pub const PERMISSION_ADMINISTRATOR_GET_ALL_USERS_VIEW_PERMISSIONS: &str =
        "PermissionAdministrator.GetAllUsersViewPermissions";

    pub const USER_RECORD_HANDLER_RETRIEVE: &str = "UserRecordHandler.Retrieve";
    pub const USER_RECORD_HANDLER_COLLECT: &str = "UserRecordHandler.Collect";
    pub const USER_VALIDATOR_VALIDATE: &str = "UserValidator.Validate";
    pub const USER_ADMINISTRATOR_CREATE: &str = "UserAdministrator.Create";
    pub const USER_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS: &str =
        "UserAdministrator.UpdateAllowedFields";
    pub const USER_ADMINISTRATOR_SET_PASSWORD: &str = "UserAdministrator.SetPassword";

    pub const ROLE_RECORD_HANDLER_CREATE: &str = "RoleRecordHandler.Create";
    pub const ROLE_RECORD_HANDLER_RETRIEVE: &str = "RoleRecordHandler.Retrieve";
    pub const ROLE_RECORD_HANDLER_UPDATE: &str = "RoleRecordHandler.Update";
    pub const ROLE_RECORD_HANDLER_DELETE: &str = "RoleRecordHandler.Delete";
    pub const ROLE_RECORD_HANDLER_COLLECT: &str = "RoleRecordHandler.Collect";

    pub const COMPANY_RECORD_HANDLER_RETRIEVE: &str = "CompanyRecordHandler.Retrieve";
    pub const COMPANY_RECORD_HANDLER_COLLECT: &str = "CompanyRecordHandler.Collect";
    pub const COMPANY_VALIDATOR_VALIDATE: &str = "CompanyValidator.Validate";
    pub const COMPANY_ADMINISTRATOR_CREATE: &str = "CompanyAdministrator.Create";
    pub const COMPANY_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS: &str =
        "CompanyAdministrator.UpdateAllowedFields";

    pub const CLIENT_RECORD_HANDLER_RETRIEVE: &str = "ClientRecordHandler.Retrieve";
    pub const CLIENT_RECORD_HANDLER_COLLECT: &str = "ClientRecordHandler.Collect";
    pub const CLIENT_VALIDATOR_VALIDATE: &str = "ClientValidator.Validate";
    pub const CLIENT_ADMINISTRATOR_CREATE: &str = "ClientAdministrator.Create";
    pub const CLIENT_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS: &str =
        "ClientAdministrator.UpdateAllowedFields";

    pub const PARTY_REGISTRAR_INVITE_COMPANY_ADMIN_USER: &str =
        "PartyRegistrar.InviteCompanyAdminUser";
    pub const PARTY_REGISTRAR_REGISTER_COMPANY_ADMIN_USER: &str =
        "PartyRegistrar.RegisterCompanyAdminUser";
    pub const PARTY_REGISTRAR_INVITE_COMPANY_USER: &str = "PartyRegistrar.InviteCompanyUser";
    pub const PARTY_REGISTRAR_REGISTER_COMPANY_USER: &str =
        "PartyRegistrar.RegisterCompanyUser";
    pub const PARTY_REGISTRAR_INVITE_CLIENT_ADMIN_USER: &str =
        "PartyRegistrar.InviteClientAdminUser";
    pub const PARTY_REGISTRAR_REGISTER_CLIENT_ADMIN_USER: &str =
        "PartyRegistrar.RegisterClientAdminUser";
    pub const PARTY_REGISTRAR_INVITE_CLIENT_USER: &str = "PartyRegistrar.InviteClientUser";
    pub const PARTY_REGISTRAR_REGISTER_CLIENT_USER: &str = "PartyRegistrar.RegisterClientUser";
}

/// Known view permission strings (UI surface tags).
pub mod view {
    pub const PARTY_COMPANY: &str = "Party.Company";
    pub const PARTY_CLIENT: &str = "Party.Client";
    pub const PARTY_USER: &str = "Party.User";
    pub const DASHBOARD_OVERVIEW: &str = "Dashboard.Overview";
    pub const DASHBOARD_AUDIT: &str = "Dashboard.Audit";
}
