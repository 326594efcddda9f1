//! Wires the directory core together at process start.

use crate::config::Settings;
use crate::models::claims::{contextualise_filter, unscoped_filter, Claims, HumanUserLogin};
use crate::models::party::{Id, PartyDetails, PartyType};
use crate::models::role::Role;
use crate::models::user::User;
use crate::services::authorizer::ApiAuthorizer;
use crate::services::database::MongoDb;
use crate::services::keys::provision_key_pair;
use crate::services::permission::{
    MongoRoleStore, MongoUserStore, PermissionAdministrator,
};
use crate::services::records::MongoRecordHandler;
use crate::services::role_setup::ensure_roles;
use crate::services::token::{TokenGenerator, TokenValidator};
use service_core::error::AppError;
use std::path::Path;

pub struct AppState {
    pub db: MongoDb,
    pub token_generator: TokenGenerator,
    pub token_validator: TokenValidator,
    pub users: MongoRecordHandler<User>,
    pub roles: MongoRecordHandler<Role>,
    pub permission_administrator: PermissionAdministrator<MongoUserStore, MongoRoleStore>,
    pub authorizer: ApiAuthorizer<MongoUserStore, MongoRoleStore>,
}

impl AppState {
    /// Connect storage, provision signing keys, build the handlers and run
    /// the role bootstrap. Idempotent; completes before traffic is served.
    pub async fn build(settings: &Settings) -> Result<Self, AppError> {
        let db = MongoDb::connect(&settings.mongo.uri, &settings.mongo.database).await?;
        db.initialize_indexes().await?;

        let keys = provision_key_pair(Path::new(&settings.keys.directory))?;
        let token_generator = TokenGenerator::from_rsa_pem(keys.private_key_pem.as_bytes())?;
        let token_validator = TokenValidator::from_rsa_pem(keys.public_key_pem.as_bytes())?;

        let users = MongoRecordHandler::new(
            db.users(),
            "user",
            User::is_valid_identifier,
            contextualise_filter,
        );
        let roles = MongoRecordHandler::new(
            db.roles(),
            "role",
            Role::is_valid_identifier,
            unscoped_filter,
        );

        let permission_administrator = PermissionAdministrator::new(
            MongoUserStore::new(users.clone()),
            MongoRoleStore::new(roles.clone()),
        );
        let authorizer = ApiAuthorizer::new(
            token_validator.clone(),
            permission_administrator.clone(),
        );

        let bootstrap = bootstrap_claims(settings);
        ensure_roles(&roles, &bootstrap).await?;

        Ok(Self {
            db,
            token_generator,
            token_validator,
            users,
            roles,
            permission_administrator,
            authorizer,
        })
    }
}

/// System-party claims used for the startup role bootstrap pass.
fn bootstrap_claims(settings: &Settings) -> Claims {
    let system = Id::new("system-root");
    Claims::HumanUserLogin(HumanUserLogin::new(
        system.clone(),
        PartyDetails {
            party_type: PartyType::System,
            party_id: system.clone(),
            parent_party_type: PartyType::System,
            parent_id: system,
        },
        settings.token.login_lifetime(),
    ))
}
