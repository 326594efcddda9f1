//! Claims: a verified assertion of who is calling and under what grant.
//!
//! Login claims authorize through role lookup; the registration and
//! password-reset variants are single-purpose capability tokens carrying a
//! fixed permission list of their own. A claims value travels inside a
//! signed token as a `{type, value}` envelope and is reconstructed per
//! request; nothing is kept server-side between requests.

use crate::error::ClaimsError;
use crate::models::party::{Id, PartyDetails, PartyType};
use crate::models::permission::{api, ApiPermission};
use crate::models::user::User;
use bson::{doc, Document};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const HUMAN_USER_LOGIN: &str = "HumanUserLogin";
pub const API_USER_LOGIN: &str = "APIUserLogin";
pub const REGISTER_COMPANY_ADMIN_USER: &str = "RegisterCompanyAdminUser";
pub const REGISTER_COMPANY_USER: &str = "RegisterCompanyUser";
pub const REGISTER_CLIENT_ADMIN_USER: &str = "RegisterClientAdminUser";
pub const REGISTER_CLIENT_USER: &str = "RegisterClientUser";
pub const RESET_PASSWORD: &str = "ResetPassword";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanUserLogin {
    pub user_id: Id,
    pub issue_time: i64,
    pub expiration_time: i64,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl HumanUserLogin {
    pub fn new(user_id: Id, details: PartyDetails, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: details.party_type,
            party_id: details.party_id,
            parent_party_type: details.parent_party_type,
            parent_id: details.parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUserLogin {
    pub user_id: Id,
    pub issue_time: i64,
    pub expiration_time: i64,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl ApiUserLogin {
    pub fn new(user_id: Id, details: PartyDetails, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: details.party_type,
            party_id: details.party_id,
            parent_party_type: details.parent_party_type,
            parent_id: details.parent_id,
        }
    }
}

/// Registration claims embed a snapshot of the user being registered, since
/// that user cannot be looked up yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyAdminUser {
    pub issue_time: i64,
    pub expiration_time: i64,
    pub user: User,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl RegisterCompanyAdminUser {
    pub fn new(user: User, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: user.party_type,
            party_id: user.party_id.clone(),
            parent_party_type: user.parent_party_type,
            parent_id: user.parent_id.clone(),
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyUser {
    pub issue_time: i64,
    pub expiration_time: i64,
    pub user: User,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl RegisterCompanyUser {
    pub fn new(user: User, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: user.party_type,
            party_id: user.party_id.clone(),
            parent_party_type: user.parent_party_type,
            parent_id: user.parent_id.clone(),
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientAdminUser {
    pub issue_time: i64,
    pub expiration_time: i64,
    pub user: User,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl RegisterClientAdminUser {
    pub fn new(user: User, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: user.party_type,
            party_id: user.party_id.clone(),
            parent_party_type: user.parent_party_type,
            parent_id: user.parent_id.clone(),
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientUser {
    pub issue_time: i64,
    pub expiration_time: i64,
    pub user: User,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl RegisterClientUser {
    pub fn new(user: User, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: user.party_type,
            party_id: user.party_id.clone(),
            parent_party_type: user.parent_party_type,
            parent_id: user.parent_id.clone(),
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub user_id: Id,
    pub issue_time: i64,
    pub expiration_time: i64,
    pub party_type: PartyType,
    pub party_id: Id,
    pub parent_party_type: PartyType,
    pub parent_id: Id,
}

impl ResetPassword {
    pub fn new(user_id: Id, details: PartyDetails, valid_for: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            issue_time: now,
            expiration_time: now + valid_for.num_seconds(),
            party_type: details.party_type,
            party_id: details.party_id,
            parent_party_type: details.parent_party_type,
            parent_id: details.parent_id,
        }
    }
}

// Permissions granted by holding a valid capability token of each kind.
static REGISTER_COMPANY_ADMIN_USER_GRANTS: Lazy<Vec<ApiPermission>> = Lazy::new(|| {
    vec![
        ApiPermission::from(api::USER_VALIDATOR_VALIDATE),
        ApiPermission::from(api::PARTY_REGISTRAR_REGISTER_COMPANY_ADMIN_USER),
    ]
});

static REGISTER_COMPANY_USER_GRANTS: Lazy<Vec<ApiPermission>> = Lazy::new(|| {
    vec![
        ApiPermission::from(api::USER_VALIDATOR_VALIDATE),
        ApiPermission::from(api::PARTY_REGISTRAR_REGISTER_COMPANY_USER),
    ]
});

static REGISTER_CLIENT_ADMIN_USER_GRANTS: Lazy<Vec<ApiPermission>> = Lazy::new(|| {
    vec![
        ApiPermission::from(api::USER_VALIDATOR_VALIDATE),
        ApiPermission::from(api::PARTY_REGISTRAR_REGISTER_CLIENT_ADMIN_USER),
    ]
});

static REGISTER_CLIENT_USER_GRANTS: Lazy<Vec<ApiPermission>> = Lazy::new(|| {
    vec![
        ApiPermission::from(api::USER_VALIDATOR_VALIDATE),
        ApiPermission::from(api::PARTY_REGISTRAR_REGISTER_CLIENT_USER),
    ]
});

static RESET_PASSWORD_GRANTS: Lazy<Vec<ApiPermission>> =
    Lazy::new(|| vec![ApiPermission::from(api::USER_ADMINISTRATOR_SET_PASSWORD)]);

#[derive(Debug, Clone, PartialEq)]
pub enum Claims {
    HumanUserLogin(HumanUserLogin),
    ApiUserLogin(ApiUserLogin),
    RegisterCompanyAdminUser(RegisterCompanyAdminUser),
    RegisterCompanyUser(RegisterCompanyUser),
    RegisterClientAdminUser(RegisterClientAdminUser),
    RegisterClientUser(RegisterClientUser),
    ResetPassword(ResetPassword),
}

impl Claims {
    pub fn claims_type(&self) -> &'static str {
        match self {
            Claims::HumanUserLogin(_) => HUMAN_USER_LOGIN,
            Claims::ApiUserLogin(_) => API_USER_LOGIN,
            Claims::RegisterCompanyAdminUser(_) => REGISTER_COMPANY_ADMIN_USER,
            Claims::RegisterCompanyUser(_) => REGISTER_COMPANY_USER,
            Claims::RegisterClientAdminUser(_) => REGISTER_CLIENT_ADMIN_USER,
            Claims::RegisterClientUser(_) => REGISTER_CLIENT_USER,
            Claims::ResetPassword(_) => RESET_PASSWORD,
        }
    }

    pub fn expiration_time(&self) -> i64 {
        match self {
            Claims::HumanUserLogin(c) => c.expiration_time,
            Claims::ApiUserLogin(c) => c.expiration_time,
            Claims::RegisterCompanyAdminUser(c) => c.expiration_time,
            Claims::RegisterCompanyUser(c) => c.expiration_time,
            Claims::RegisterClientAdminUser(c) => c.expiration_time,
            Claims::RegisterClientUser(c) => c.expiration_time,
            Claims::ResetPassword(c) => c.expiration_time,
        }
    }

    pub fn expired(&self) -> bool {
        Utc::now().timestamp() > self.expiration_time()
    }

    pub fn time_to_expiry(&self) -> Duration {
        Duration::seconds(self.expiration_time() - Utc::now().timestamp())
    }

    pub fn party_details(&self) -> PartyDetails {
        let (party_type, party_id, parent_party_type, parent_id) = match self {
            Claims::HumanUserLogin(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::ApiUserLogin(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::RegisterCompanyAdminUser(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::RegisterCompanyUser(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::RegisterClientAdminUser(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::RegisterClientUser(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
            Claims::ResetPassword(c) => {
                (c.party_type, &c.party_id, c.parent_party_type, &c.parent_id)
            }
        };
        PartyDetails {
            party_type,
            party_id: party_id.clone(),
            parent_party_type,
            parent_id: parent_id.clone(),
        }
    }

    /// Fixed permission list intrinsic to a capability token. Login claims
    /// carry no intrinsic grants; their permissions resolve through roles.
    pub fn granted_api_permissions(&self) -> &'static [ApiPermission] {
        match self {
            Claims::HumanUserLogin(_) | Claims::ApiUserLogin(_) => &[],
            Claims::RegisterCompanyAdminUser(_) => &REGISTER_COMPANY_ADMIN_USER_GRANTS,
            Claims::RegisterCompanyUser(_) => &REGISTER_COMPANY_USER_GRANTS,
            Claims::RegisterClientAdminUser(_) => &REGISTER_CLIENT_ADMIN_USER_GRANTS,
            Claims::RegisterClientUser(_) => &REGISTER_CLIENT_USER_GRANTS,
            Claims::ResetPassword(_) => &RESET_PASSWORD_GRANTS,
        }
    }
}

/// Envelope carrying claims across token and RPC boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedClaims {
    #[serde(rename = "type")]
    pub claims_type: String,
    pub value: serde_json::Value,
}

impl WrappedClaims {
    pub fn wrap(claims: &Claims) -> Result<Self, ClaimsError> {
        let value = match claims {
            Claims::HumanUserLogin(c) => serde_json::to_value(c),
            Claims::ApiUserLogin(c) => serde_json::to_value(c),
            Claims::RegisterCompanyAdminUser(c) => serde_json::to_value(c),
            Claims::RegisterCompanyUser(c) => serde_json::to_value(c),
            Claims::RegisterClientAdminUser(c) => serde_json::to_value(c),
            Claims::RegisterClientUser(c) => serde_json::to_value(c),
            Claims::ResetPassword(c) => serde_json::to_value(c),
        }
        .map_err(|err| ClaimsError::Wrapping {
            reasons: vec!["marshalling".to_string(), err.to_string()],
        })?;

        Ok(Self {
            claims_type: claims.claims_type().to_string(),
            value,
        })
    }

    /// Decode table over the closed set of claims variants.
    ///
    /// Expiry is checked here, exactly once; callers receiving unwrapped
    /// claims can trust they are current.
    pub fn unwrap(&self) -> Result<Claims, ClaimsError> {
        let unwrapping = |err: serde_json::Error| ClaimsError::Unwrapping {
            reasons: vec!["unmarshalling".to_string(), err.to_string()],
        };

        let result = match self.claims_type.as_str() {
            HUMAN_USER_LOGIN => Claims::HumanUserLogin(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            API_USER_LOGIN => Claims::ApiUserLogin(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            REGISTER_COMPANY_ADMIN_USER => Claims::RegisterCompanyAdminUser(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            REGISTER_COMPANY_USER => Claims::RegisterCompanyUser(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            REGISTER_CLIENT_ADMIN_USER => Claims::RegisterClientAdminUser(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            REGISTER_CLIENT_USER => Claims::RegisterClientUser(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            RESET_PASSWORD => Claims::ResetPassword(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            ),
            _ => {
                return Err(ClaimsError::Invalid {
                    reasons: vec!["invalid type".to_string()],
                })
            }
        };

        if result.expired() {
            return Err(ClaimsError::Invalid {
                reasons: vec!["expired".to_string()],
            });
        }

        Ok(result)
    }
}

/// Rewrite a query filter so the caller only sees records within its party's
/// visibility. System-level callers see everything; company and client
/// callers are restricted to records owned by or assigned to their party.
pub fn contextualise_filter(filter: Document, claims: &Claims) -> Document {
    let details = claims.party_details();
    match details.party_type {
        PartyType::System => filter,
        PartyType::Company | PartyType::Client => doc! {
            "$and": [
                filter,
                { "$or": [
                    { "ownerId.id": &details.party_id.id },
                    { "assignedId.id": &details.party_id.id },
                ]},
            ]
        },
    }
}

/// Pass-through scoper for collections visible to every party (e.g. roles).
pub fn unscoped_filter(filter: Document, _claims: &Claims) -> Document {
    filter
}
