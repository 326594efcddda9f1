//! API request authorization.
//!
//! Validates the bearer token, unwraps the claims and decides whether the
//! caller may invoke the named operation. Login claims go through role
//! resolution; capability claims are checked against their own fixed grant
//! list and nothing else. Failures are returned to the caller and logged at
//! this boundary, never retried.

use crate::error::AccessError;
use crate::models::claims::{Claims, WrappedClaims};
use crate::models::identifier::Identifier;
use crate::models::permission::ApiPermission;
use crate::services::permission::{PermissionAdministrator, RoleStore, UserStore};
use crate::services::token::TokenValidator;

pub struct ApiAuthorizer<U, R> {
    token_validator: TokenValidator,
    permission_administrator: PermissionAdministrator<U, R>,
}

impl<U: UserStore, R: RoleStore> ApiAuthorizer<U, R> {
    pub fn new(
        token_validator: TokenValidator,
        permission_administrator: PermissionAdministrator<U, R>,
    ) -> Self {
        Self {
            token_validator,
            permission_administrator,
        }
    }

    /// Authorize a request to `method` carried by the signed token `jwt`.
    /// Returns the wrapped claims for the request context on success.
    pub async fn authorize_api_request(
        &self,
        jwt: &str,
        method: &str,
    ) -> Result<WrappedClaims, AccessError> {
        let wrapped = self.token_validator.validate_jwt(jwt).map_err(|err| {
            tracing::warn!(error = %err, "token validation failed");
            AccessError::from(err)
        })?;
        let claims = wrapped.unwrap().map_err(|err| {
            tracing::warn!(error = %err, "claims unwrapping failed");
            AccessError::from(err)
        })?;

        let permission = ApiPermission::from(method);

        match &claims {
            Claims::HumanUserLogin(login) => {
                let user_identifier = Identifier::Id(login.user_id.clone());
                self.check_role_permission(&claims, &user_identifier, permission)
                    .await?;
                Ok(wrapped)
            }
            Claims::ApiUserLogin(login) => {
                let user_identifier = Identifier::Id(login.user_id.clone());
                self.check_role_permission(&claims, &user_identifier, permission)
                    .await?;
                Ok(wrapped)
            }
            // Capability tokens authorize only the operations on their own
            // granted list; no role lookup is possible or attempted.
            capability => {
                if capability
                    .granted_api_permissions()
                    .iter()
                    .any(|granted| granted == &permission)
                {
                    Ok(wrapped)
                } else {
                    tracing::warn!(
                        permission = %permission,
                        claims_type = capability.claims_type(),
                        "request not authorised"
                    );
                    Err(AccessError::NotAuthorised { permission })
                }
            }
        }
    }

    async fn check_role_permission(
        &self,
        claims: &Claims,
        user_identifier: &Identifier,
        permission: ApiPermission,
    ) -> Result<(), AccessError> {
        let has_permission = self
            .permission_administrator
            .user_has_permission(claims, user_identifier, &permission)
            .await?;
        if has_permission {
            Ok(())
        } else {
            tracing::warn!(
                permission = %permission,
                claims_type = claims.claims_type(),
                "request not authorised"
            );
            Err(AccessError::NotAuthorised { permission })
        }
    }
}
