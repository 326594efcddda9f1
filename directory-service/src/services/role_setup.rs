//! Baseline role bootstrap.
//!
//! The baseline role table is composed once into an immutable static and
//! consumed at runtime; the root role aggregates every other baseline
//! role's permissions on top of its own root-only set. `ensure_roles` runs
//! at startup, before the engine accepts traffic, and is idempotent.

use crate::error::RecordHandlerError;
use crate::models::claims::Claims;
use crate::models::identifier::Identifier;
use crate::models::permission::{api, view, ApiPermission, ViewPermission};
use crate::models::role::Role;
use crate::services::records::MongoRecordHandler;
use once_cell::sync::Lazy;

pub const ROLE_ROOT: &str = "root";
pub const ROLE_COMPANY_ADMIN: &str = "companyAdmin";
pub const ROLE_COMPANY_USER: &str = "companyUser";
pub const ROLE_CLIENT_ADMIN: &str = "clientAdmin";
pub const ROLE_CLIENT_USER: &str = "clientUser";

fn api_permissions(keys: &[&str]) -> Vec<ApiPermission> {
    keys.iter().map(|key| ApiPermission::from(*key)).collect()
}

fn view_permissions(keys: &[&str]) -> Vec<ViewPermission> {
    keys.iter().map(|key| ViewPermission::from(*key)).collect()
}

static BASELINE_ROLES: Lazy<Vec<Role>> = Lazy::new(|| {
    let company_admin = Role::new(
        ROLE_COMPANY_ADMIN,
        api_permissions(&[
            api::PERMISSION_ADMINISTRATOR_GET_ALL_USERS_VIEW_PERMISSIONS,
            api::USER_RECORD_HANDLER_RETRIEVE,
            api::USER_RECORD_HANDLER_COLLECT,
            api::USER_VALIDATOR_VALIDATE,
            api::USER_ADMINISTRATOR_CREATE,
            api::USER_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS,
            api::COMPANY_RECORD_HANDLER_RETRIEVE,
            api::COMPANY_RECORD_HANDLER_COLLECT,
            api::COMPANY_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS,
            api::CLIENT_RECORD_HANDLER_RETRIEVE,
            api::CLIENT_RECORD_HANDLER_COLLECT,
            api::CLIENT_VALIDATOR_VALIDATE,
            api::CLIENT_ADMINISTRATOR_CREATE,
            api::CLIENT_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS,
            api::PARTY_REGISTRAR_INVITE_COMPANY_USER,
            api::PARTY_REGISTRAR_INVITE_CLIENT_ADMIN_USER,
        ]),
        view_permissions(&[
            view::PARTY_COMPANY,
            view::PARTY_CLIENT,
            view::PARTY_USER,
            view::DASHBOARD_OVERVIEW,
        ]),
    );

    let company_user = Role::new(
        ROLE_COMPANY_USER,
        api_permissions(&[
            api::PERMISSION_ADMINISTRATOR_GET_ALL_USERS_VIEW_PERMISSIONS,
            api::USER_RECORD_HANDLER_COLLECT,
            api::COMPANY_RECORD_HANDLER_RETRIEVE,
            api::CLIENT_RECORD_HANDLER_COLLECT,
        ]),
        view_permissions(&[view::PARTY_CLIENT, view::DASHBOARD_OVERVIEW]),
    );

    let client_admin = Role::new(
        ROLE_CLIENT_ADMIN,
        api_permissions(&[
            api::PERMISSION_ADMINISTRATOR_GET_ALL_USERS_VIEW_PERMISSIONS,
            api::USER_RECORD_HANDLER_RETRIEVE,
            api::USER_RECORD_HANDLER_COLLECT,
            api::USER_VALIDATOR_VALIDATE,
            api::USER_ADMINISTRATOR_CREATE,
            api::USER_ADMINISTRATOR_UPDATE_ALLOWED_FIELDS,
            api::CLIENT_RECORD_HANDLER_RETRIEVE,
            api::PARTY_REGISTRAR_INVITE_CLIENT_USER,
        ]),
        view_permissions(&[view::PARTY_USER, view::DASHBOARD_OVERVIEW]),
    );

    let client_user = Role::new(
        ROLE_CLIENT_USER,
        api_permissions(&[
            api::PERMISSION_ADMINISTRATOR_GET_ALL_USERS_VIEW_PERMISSIONS,
            api::CLIENT_RECORD_HANDLER_RETRIEVE,
        ]),
        view_permissions(&[view::DASHBOARD_OVERVIEW]),
    );

    // Permissions that only root holds.
    let mut root_api = api_permissions(&[
        api::ROLE_RECORD_HANDLER_CREATE,
        api::ROLE_RECORD_HANDLER_RETRIEVE,
        api::ROLE_RECORD_HANDLER_UPDATE,
        api::ROLE_RECORD_HANDLER_DELETE,
        api::ROLE_RECORD_HANDLER_COLLECT,
        api::COMPANY_VALIDATOR_VALIDATE,
        api::COMPANY_ADMINISTRATOR_CREATE,
        api::USER_ADMINISTRATOR_SET_PASSWORD,
        api::PARTY_REGISTRAR_INVITE_COMPANY_ADMIN_USER,
    ]);
    let mut root_view = view_permissions(&[
        view::PARTY_COMPANY,
        view::PARTY_CLIENT,
        view::PARTY_USER,
        view::DASHBOARD_OVERVIEW,
        view::DASHBOARD_AUDIT,
    ]);

    // Root also holds every permission of every other baseline role.
    for role in [&company_admin, &company_user, &client_admin, &client_user] {
        for permission in &role.api_permissions {
            if !root_api.contains(permission) {
                root_api.push(permission.clone());
            }
        }
        for permission in &role.view_permissions {
            if !root_view.contains(permission) {
                root_view.push(permission.clone());
            }
        }
    }
    let root = Role::new(ROLE_ROOT, root_api, root_view);

    vec![root, company_admin, company_user, client_admin, client_user]
});

/// The immutable baseline role table.
pub fn baseline_roles() -> &'static [Role] {
    &BASELINE_ROLES
}

/// Ensure every baseline role exists with its current permission sets:
/// missing roles are created, drifted roles updated in place by name.
pub async fn ensure_roles(
    handler: &MongoRecordHandler<Role>,
    claims: &Claims,
) -> Result<(), RecordHandlerError> {
    for role in baseline_roles() {
        match handler.retrieve(claims, &Identifier::name(&role.name)).await {
            Ok(existing) => {
                if existing.api_permissions != role.api_permissions
                    || existing.view_permissions != role.view_permissions
                {
                    let mut updated = existing;
                    updated.api_permissions = role.api_permissions.clone();
                    updated.view_permissions = role.view_permissions.clone();
                    handler
                        .update(claims, &Identifier::name(&role.name), updated)
                        .await?;
                    tracing::info!(role = %role.name, "updated baseline role permissions");
                }
            }
            Err(RecordHandlerError::NotFound) => {
                handler.create(role.clone()).await?;
                tracing::info!(role = %role.name, "created baseline role");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_role_names_are_unique() {
        let mut names: Vec<&str> = baseline_roles()
            .iter()
            .map(|role| role.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), baseline_roles().len());
    }

    #[test]
    fn test_root_aggregates_all_baseline_permissions() {
        let root = baseline_roles()
            .iter()
            .find(|role| role.name == ROLE_ROOT)
            .expect("root role present");

        for role in baseline_roles() {
            for permission in &role.api_permissions {
                assert!(
                    root.api_permissions.contains(permission),
                    "root missing {} from {}",
                    permission,
                    role.name
                );
            }
            for permission in &role.view_permissions {
                assert!(
                    root.view_permissions.contains(permission),
                    "root missing {} from {}",
                    permission,
                    role.name
                );
            }
        }
    }

    #[test]
    fn test_root_has_no_duplicate_permissions() {
        let root = baseline_roles()
            .iter()
            .find(|role| role.name == ROLE_ROOT)
            .expect("root role present");

        let mut seen = root.api_permissions.clone();
        seen.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        seen.dedup();
        assert_eq!(seen.len(), root.api_permissions.len());
    }

    #[test]
    fn test_company_user_cannot_create_roles() {
        let company_user = baseline_roles()
            .iter()
            .find(|role| role.name == ROLE_COMPANY_USER)
            .expect("companyUser role present");
        assert!(!company_user
            .api_permissions
            .contains(&ApiPermission::from(api::ROLE_RECORD_HANDLER_CREATE)));

        let root = baseline_roles()
            .iter()
            .find(|role| role.name == ROLE_ROOT)
            .expect("root role present");
        assert!(root
            .api_permissions
            .contains(&ApiPermission::from(api::ROLE_RECORD_HANDLER_CREATE)));
    }
}
