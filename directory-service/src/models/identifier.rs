//! Identifiers name a single record in a collection.
//!
//! Each variant converts to the filter fragment used to look the record up.
//! Which variants a given collection accepts is configuration on the record
//! handler, not knowledge baked in here.

use crate::error::IdentifierError;
use crate::models::party::Id;
use bson::{doc, Document};
use serde::{Deserialize, Serialize};

pub const ID: &str = "Id";
pub const NAME: &str = "Name";
pub const USERNAME: &str = "Username";
pub const EMAIL_ADDRESS: &str = "EmailAddress";
pub const ADMIN_EMAIL_ADDRESS: &str = "AdminEmailAddress";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEmailAddress {
    pub admin_email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Id(Id),
    Name(Name),
    Username(Username),
    EmailAddress(EmailAddress),
    AdminEmailAddress(AdminEmailAddress),
}

impl Identifier {
    pub fn id(id: impl Into<String>) -> Self {
        Identifier::Id(Id::new(id))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Identifier::Name(Name { name: name.into() })
    }

    pub fn username(username: impl Into<String>) -> Self {
        Identifier::Username(Username {
            username: username.into(),
        })
    }

    pub fn email_address(email_address: impl Into<String>) -> Self {
        Identifier::EmailAddress(EmailAddress {
            email_address: email_address.into(),
        })
    }

    pub fn identifier_type(&self) -> &'static str {
        match self {
            Identifier::Id(_) => ID,
            Identifier::Name(_) => NAME,
            Identifier::Username(_) => USERNAME,
            Identifier::EmailAddress(_) => EMAIL_ADDRESS,
            Identifier::AdminEmailAddress(_) => ADMIN_EMAIL_ADDRESS,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Identifier::Id(v) => !v.id.is_empty(),
            Identifier::Name(v) => !v.name.is_empty(),
            Identifier::Username(v) => !v.username.is_empty(),
            Identifier::EmailAddress(v) => !v.email_address.is_empty(),
            Identifier::AdminEmailAddress(v) => !v.admin_email_address.is_empty(),
        }
    }

    pub fn to_filter(&self) -> Document {
        match self {
            Identifier::Id(v) => doc! { "id": &v.id },
            Identifier::Name(v) => doc! { "name": &v.name },
            Identifier::Username(v) => doc! { "username": &v.username },
            Identifier::EmailAddress(v) => doc! { "emailAddress": &v.email_address },
            Identifier::AdminEmailAddress(v) => {
                doc! { "adminEmailAddress": &v.admin_email_address }
            }
        }
    }
}

/// Envelope carrying an identifier across a serialization boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedIdentifier {
    #[serde(rename = "type")]
    pub identifier_type: String,
    pub value: serde_json::Value,
}

impl WrappedIdentifier {
    pub fn wrap(identifier: &Identifier) -> Result<Self, IdentifierError> {
        let value = match identifier {
            Identifier::Id(v) => serde_json::to_value(v),
            Identifier::Name(v) => serde_json::to_value(v),
            Identifier::Username(v) => serde_json::to_value(v),
            Identifier::EmailAddress(v) => serde_json::to_value(v),
            Identifier::AdminEmailAddress(v) => serde_json::to_value(v),
        }
        .map_err(|err| IdentifierError::Wrapping {
            reasons: vec!["marshalling".to_string(), err.to_string()],
        })?;

        Ok(Self {
            identifier_type: identifier.identifier_type().to_string(),
            value,
        })
    }

    /// Decode table over the closed set of identifier variants.
    pub fn unwrap(&self) -> Result<Identifier, IdentifierError> {
        let unwrapping = |err: serde_json::Error| IdentifierError::Unwrapping {
            reasons: vec!["unmarshalling".to_string(), err.to_string()],
        };

        match self.identifier_type.as_str() {
            ID => Ok(Identifier::Id(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            NAME => Ok(Identifier::Name(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            USERNAME => Ok(Identifier::Username(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            EMAIL_ADDRESS => Ok(Identifier::EmailAddress(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            ADMIN_EMAIL_ADDRESS => Ok(Identifier::AdminEmailAddress(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            _ => Err(IdentifierError::Invalid {
                reasons: vec!["invalid type".to_string()],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_filter_per_variant() {
        assert_eq!(Identifier::id("1234").to_filter(), doc! { "id": "1234" });
        assert_eq!(
            Identifier::name("root").to_filter(),
            doc! { "name": "root" }
        );
        assert_eq!(
            Identifier::username("bob").to_filter(),
            doc! { "username": "bob" }
        );
        assert_eq!(
            Identifier::email_address("bob@example.com").to_filter(),
            doc! { "emailAddress": "bob@example.com" }
        );
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let identifiers = vec![
            Identifier::id("1234"),
            Identifier::name("root"),
            Identifier::username("bob"),
            Identifier::email_address("bob@example.com"),
            Identifier::AdminEmailAddress(AdminEmailAddress {
                admin_email_address: "admin@example.com".to_string(),
            }),
        ];

        for identifier in identifiers {
            let wrapped = WrappedIdentifier::wrap(&identifier).unwrap();
            assert_eq!(wrapped.unwrap().unwrap(), identifier);
        }
    }

    #[test]
    fn test_unwrap_unknown_type_is_invalid() {
        let wrapped = WrappedIdentifier {
            identifier_type: "Barcode".to_string(),
            value: serde_json::json!({ "barcode": "x" }),
        };
        assert!(matches!(
            wrapped.unwrap(),
            Err(IdentifierError::Invalid { .. })
        ));
    }

    #[test]
    fn test_unwrap_bad_payload_is_unwrapping_error() {
        let wrapped = WrappedIdentifier {
            identifier_type: ID.to_string(),
            value: serde_json::json!("not an object"),
        };
        assert!(matches!(
            wrapped.unwrap(),
            Err(IdentifierError::Unwrapping { .. })
        ));
    }

    #[test]
    fn test_blank_identifier_is_invalid() {
        assert!(!Identifier::id("").is_valid());
        assert!(!Identifier::name("").is_valid());
        assert!(Identifier::username("bob").is_valid());
    }

    #[test]
    fn test_wire_format() {
        let wrapped = WrappedIdentifier::wrap(&Identifier::id("1234")).unwrap();
        let json = serde_json::to_value(&wrapped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "Id", "value": { "id": "1234" } })
        );
    }
}
