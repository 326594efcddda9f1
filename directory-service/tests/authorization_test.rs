//! End-to-end authorization: token issuance through permission resolution,
//! with in-memory user and role stores standing in for storage.

mod common;

use async_trait::async_trait;
use chrono::Duration;
use common::{
    company_details, company_user, login_claims, TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY_PEM,
};
use directory_service::error::{AccessError, PermissionError, RecordHandlerError};
use directory_service::models::claims::{Claims, ResetPassword};
use directory_service::models::identifier::Identifier;
use directory_service::models::party::Id;
use directory_service::models::permission::{api, ApiPermission};
use directory_service::models::role::Role;
use directory_service::models::user::User;
use directory_service::services::authorizer::ApiAuthorizer;
use directory_service::services::permission::{
    PermissionAdministrator, RoleStore, UserStore,
};
use directory_service::services::role_setup::{
    baseline_roles, ROLE_COMPANY_USER, ROLE_ROOT,
};
use directory_service::services::token::{TokenGenerator, TokenValidator};
use std::collections::HashMap;

struct InMemoryUserStore {
    users: HashMap<String, User>,
}

impl InMemoryUserStore {
    fn with_users(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id.clone(), user)).collect(),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn retrieve(
        &self,
        _claims: &Claims,
        identifier: &Identifier,
    ) -> Result<User, RecordHandlerError> {
        let found = match identifier {
            Identifier::Id(id) => self.users.get(&id.id),
            Identifier::Username(username) => self
                .users
                .values()
                .find(|user| user.username == username.username),
            Identifier::EmailAddress(email) => self
                .users
                .values()
                .find(|user| user.email_address == email.email_address),
            _ => None,
        };
        found.cloned().ok_or(RecordHandlerError::NotFound)
    }
}

struct InMemoryRoleStore {
    roles: HashMap<String, Role>,
}

impl InMemoryRoleStore {
    fn with_baseline_roles() -> Self {
        Self {
            roles: baseline_roles()
                .iter()
                .map(|role| (role.name.clone(), role.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn retrieve_by_name(
        &self,
        _claims: &Claims,
        name: &str,
    ) -> Result<Role, RecordHandlerError> {
        self.roles.get(name).cloned().ok_or(RecordHandlerError::NotFound)
    }
}

fn administrator(
    users: Vec<User>,
) -> PermissionAdministrator<InMemoryUserStore, InMemoryRoleStore> {
    PermissionAdministrator::new(
        InMemoryUserStore::with_users(users),
        InMemoryRoleStore::with_baseline_roles(),
    )
}

fn authorizer(
    users: Vec<User>,
) -> ApiAuthorizer<InMemoryUserStore, InMemoryRoleStore> {
    let validator =
        TokenValidator::from_rsa_pem(TEST_PUBLIC_KEY_PEM.as_bytes()).expect("parsing public key");
    ApiAuthorizer::new(validator, administrator(users))
}

fn generator() -> TokenGenerator {
    TokenGenerator::from_rsa_pem(TEST_PRIVATE_KEY_PEM.as_bytes()).expect("parsing private key")
}

#[tokio::test]
async fn test_permission_resolved_from_role_union() {
    let user = company_user("user-1", vec![ROLE_COMPANY_USER.to_string()]);
    let admin = administrator(vec![user]);
    let claims = login_claims("user-1", company_details());

    // companyUser grants collect but not role creation.
    assert!(admin
        .user_has_permission(
            &claims,
            &Identifier::id("user-1"),
            &ApiPermission::from(api::USER_RECORD_HANDLER_COLLECT),
        )
        .await
        .expect("checking permission"));
    assert!(!admin
        .user_has_permission(
            &claims,
            &Identifier::id("user-1"),
            &ApiPermission::from(api::ROLE_RECORD_HANDLER_CREATE),
        )
        .await
        .expect("checking permission"));
}

#[tokio::test]
async fn test_no_roles_means_false_not_error() {
    let user = company_user("user-1", vec![]);
    let admin = administrator(vec![user]);
    let claims = login_claims("user-1", company_details());

    let has = admin
        .user_has_permission(
            &claims,
            &Identifier::id("user-1"),
            &ApiPermission::from(api::USER_RECORD_HANDLER_COLLECT),
        )
        .await
        .expect("checking permission");
    assert!(!has);
}

#[tokio::test]
async fn test_blank_permission_is_request_invalid() {
    let admin = administrator(vec![company_user("user-1", vec![])]);
    let claims = login_claims("user-1", company_details());

    let result = admin
        .user_has_permission(&claims, &Identifier::id("user-1"), &ApiPermission::from(""))
        .await;
    assert!(matches!(
        result,
        Err(PermissionError::RequestInvalid { .. })
    ));
}

#[tokio::test]
async fn test_capability_claims_rejected_by_role_resolution() {
    let admin = administrator(vec![company_user("user-1", vec![])]);
    let claims = Claims::ResetPassword(ResetPassword::new(
        Id::new("user-1"),
        company_details(),
        Duration::minutes(15),
    ));

    let result = admin
        .get_all_users_api_permissions(&claims, &Identifier::id("user-1"))
        .await;
    assert!(matches!(
        result,
        Err(PermissionError::InvalidClaimsType {
            claims_type: "ResetPassword"
        })
    ));
}

#[tokio::test]
async fn test_view_permissions_resolved_from_roles() {
    let user = company_user("user-1", vec![ROLE_COMPANY_USER.to_string()]);
    let admin = administrator(vec![user]);
    let claims = login_claims("user-1", company_details());

    let views = admin
        .get_all_users_view_permissions(&claims, &Identifier::id("user-1"))
        .await
        .expect("resolving view permissions");
    assert!(!views.is_empty());
}

#[tokio::test]
async fn test_authorize_denies_then_allows_after_role_assignment() {
    let token = generator()
        .generate_token(&login_claims("user-1", company_details()))
        .expect("signing token");

    // companyUser has no RoleRecordHandler.Create grant.
    let denied = authorizer(vec![company_user(
        "user-1",
        vec![ROLE_COMPANY_USER.to_string()],
    )])
    .authorize_api_request(&token, api::ROLE_RECORD_HANDLER_CREATE)
    .await;
    match denied {
        Err(AccessError::NotAuthorised { permission }) => {
            assert_eq!(permission, ApiPermission::from(api::ROLE_RECORD_HANDLER_CREATE));
        }
        other => panic!("expected NotAuthorised, got {:?}", other),
    }

    // root aggregates that grant, so the same token now passes.
    let allowed = authorizer(vec![company_user(
        "user-1",
        vec![ROLE_COMPANY_USER.to_string(), ROLE_ROOT.to_string()],
    )])
    .authorize_api_request(&token, api::ROLE_RECORD_HANDLER_CREATE)
    .await
    .expect("authorizing request");
    assert_eq!(allowed.claims_type, "HumanUserLogin");
}

#[tokio::test]
async fn test_capability_token_authorizes_only_its_granted_list() {
    let claims = Claims::ResetPassword(ResetPassword::new(
        Id::new("user-1"),
        company_details(),
        Duration::minutes(15),
    ));
    let token = generator().generate_token(&claims).expect("signing token");

    // No role assignment involved: the grant comes from the token itself.
    let auth = authorizer(vec![]);
    auth.authorize_api_request(&token, api::USER_ADMINISTRATOR_SET_PASSWORD)
        .await
        .expect("authorizing password set");

    let denied = auth
        .authorize_api_request(&token, api::ROLE_RECORD_HANDLER_CREATE)
        .await;
    assert!(matches!(denied, Err(AccessError::NotAuthorised { .. })));
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let result = authorizer(vec![])
        .authorize_api_request("garbage", api::USER_RECORD_HANDLER_COLLECT)
        .await;
    assert!(matches!(result, Err(AccessError::Token(_))));
}
