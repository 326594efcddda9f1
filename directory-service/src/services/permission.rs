//! Permission resolution for logged-in identities.
//!
//! A user's effective permissions are the union of the permission lists of
//! every role assigned to them. Only login claims resolve this way;
//! capability tokens (registration, password reset) carry their own fixed
//! grant list and are checked by the API authorizer instead.

use crate::error::{PermissionError, RecordHandlerError};
use crate::models::claims::Claims;
use crate::models::identifier::Identifier;
use crate::models::permission::{ApiPermission, ViewPermission};
use crate::models::role::Role;
use crate::models::user::User;
use crate::services::records::MongoRecordHandler;
use async_trait::async_trait;

/// Lookup of the target user, tenant-scoped under the caller's claims.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn retrieve(
        &self,
        claims: &Claims,
        identifier: &Identifier,
    ) -> Result<User, RecordHandlerError>;
}

/// Role lookup by unique name.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn retrieve_by_name(
        &self,
        claims: &Claims,
        name: &str,
    ) -> Result<Role, RecordHandlerError>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    handler: MongoRecordHandler<User>,
}

impl MongoUserStore {
    pub fn new(handler: MongoRecordHandler<User>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn retrieve(
        &self,
        claims: &Claims,
        identifier: &Identifier,
    ) -> Result<User, RecordHandlerError> {
        self.handler.retrieve(claims, identifier).await
    }
}

#[derive(Clone)]
pub struct MongoRoleStore {
    handler: MongoRecordHandler<Role>,
}

impl MongoRoleStore {
    pub fn new(handler: MongoRecordHandler<Role>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl RoleStore for MongoRoleStore {
    async fn retrieve_by_name(
        &self,
        claims: &Claims,
        name: &str,
    ) -> Result<Role, RecordHandlerError> {
        self.handler.retrieve(claims, &Identifier::name(name)).await
    }
}

#[derive(Clone)]
pub struct PermissionAdministrator<U, R> {
    user_store: U,
    role_store: R,
}

impl<U: UserStore, R: RoleStore> PermissionAdministrator<U, R> {
    pub fn new(user_store: U, role_store: R) -> Self {
        Self {
            user_store,
            role_store,
        }
    }

    fn validate_user_identifier(&self, user_identifier: &Identifier) -> Vec<String> {
        let mut reasons = Vec::new();
        if !User::is_valid_identifier(user_identifier) {
            reasons.push(format!(
                "identifier of type {} not supported for user",
                user_identifier.identifier_type()
            ));
        }
        reasons
    }

    /// True iff the permission is in the union of the target user's roles'
    /// API permissions. An empty union is an ordinary `false`, not an error.
    pub async fn user_has_permission(
        &self,
        claims: &Claims,
        user_identifier: &Identifier,
        permission: &ApiPermission,
    ) -> Result<bool, PermissionError> {
        let mut reasons = self.validate_user_identifier(user_identifier);
        if permission.as_str().is_empty() {
            reasons.push("permission is blank".to_string());
        }
        if !reasons.is_empty() {
            return Err(PermissionError::RequestInvalid { reasons });
        }

        let all_permissions = self
            .get_all_users_api_permissions(claims, user_identifier)
            .await
            .map_err(|err| PermissionError::GetAllPermissions {
                reasons: vec![err.to_string()],
            })?;

        for held in &all_permissions {
            if held == permission {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Union of the API permissions of every role assigned to the target
    /// user. Only login claims may ask; capability tokens have no roles to
    /// resolve.
    pub async fn get_all_users_api_permissions(
        &self,
        claims: &Claims,
        user_identifier: &Identifier,
    ) -> Result<Vec<ApiPermission>, PermissionError> {
        let reasons = self.validate_user_identifier(user_identifier);
        if !reasons.is_empty() {
            return Err(PermissionError::RequestInvalid { reasons });
        }

        match claims {
            Claims::HumanUserLogin(_) | Claims::ApiUserLogin(_) => {}
            other => {
                return Err(PermissionError::InvalidClaimsType {
                    claims_type: other.claims_type(),
                })
            }
        }

        let user = self.user_store.retrieve(claims, user_identifier).await?;

        let mut permissions = Vec::new();
        for role_name in &user.roles {
            let role = self.role_store.retrieve_by_name(claims, role_name).await?;
            permissions.extend(role.api_permissions);
        }
        Ok(permissions)
    }

    /// Union of the view permissions of every role assigned to the target
    /// user.
    pub async fn get_all_users_view_permissions(
        &self,
        claims: &Claims,
        user_identifier: &Identifier,
    ) -> Result<Vec<ViewPermission>, PermissionError> {
        let reasons = self.validate_user_identifier(user_identifier);
        if !reasons.is_empty() {
            return Err(PermissionError::RequestInvalid { reasons });
        }

        match claims {
            Claims::HumanUserLogin(_) | Claims::ApiUserLogin(_) => {}
            other => {
                return Err(PermissionError::InvalidClaimsType {
                    claims_type: other.claims_type(),
                })
            }
        }

        let user = self.user_store.retrieve(claims, user_identifier).await?;

        let mut permissions = Vec::new();
        for role_name in &user.roles {
            let role = self.role_store.retrieve_by_name(claims, role_name).await?;
            permissions.extend(role.view_permissions);
        }
        Ok(permissions)
    }
}
