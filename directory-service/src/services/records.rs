//! Generic tenant-scoped record access.
//!
//! One `MongoRecordHandler` per backing collection, configured with the
//! identifier kinds that collection accepts and the tenant-scoping filter
//! rewrite to apply on every read path. Entity services build their storage
//! layers from this engine instead of talking to the driver directly.

use crate::error::RecordHandlerError;
use crate::models::claims::Claims;
use crate::models::criterion::{criteria_to_filter, Criterion};
use crate::models::identifier::Identifier;
use crate::models::query::Query;
use bson::Document;
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Contract a record type fulfils to live in a handled collection. The
/// engine owns id assignment; callers never supply identities.
pub trait Entity: Serialize + DeserializeOwned + Unpin + Send + Sync {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

/// Decides whether an identifier kind is acceptable for a collection,
/// rejecting cross-entity identifier misuse at the boundary.
pub type IdentifierAcceptor = fn(&Identifier) -> bool;

/// Rewrites a raw filter with the caller's tenant visibility constraints.
pub type FilterScoper = fn(Document, &Claims) -> Document;

pub struct MongoRecordHandler<E> {
    collection: Collection<E>,
    entity_name: &'static str,
    accepts_identifier: IdentifierAcceptor,
    scope_filter: FilterScoper,
}

impl<E> Clone for MongoRecordHandler<E> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            entity_name: self.entity_name,
            accepts_identifier: self.accepts_identifier,
            scope_filter: self.scope_filter,
        }
    }
}

/// Page of records plus the total count of the filtered set before
/// pagination.
#[derive(Debug, Clone)]
pub struct CollectResponse<E> {
    pub records: Vec<E>,
    pub total: u64,
}

impl<E: Entity> MongoRecordHandler<E> {
    pub fn new(
        collection: Collection<E>,
        entity_name: &'static str,
        accepts_identifier: IdentifierAcceptor,
        scope_filter: FilterScoper,
    ) -> Self {
        Self {
            collection,
            entity_name,
            accepts_identifier,
            scope_filter,
        }
    }

    fn validate_identifier(&self, identifier: &Identifier) -> Vec<String> {
        let mut reasons = Vec::new();
        if !(self.accepts_identifier)(identifier) {
            reasons.push(format!(
                "identifier of type {} not supported for {}",
                identifier.identifier_type(),
                self.entity_name
            ));
        }
        reasons
    }

    fn validate_criteria(&self, criteria: &[Criterion]) -> Vec<String> {
        let mut reasons = Vec::new();
        for (index, criterion) in criteria.iter().enumerate() {
            if let Err(err) = criterion.validate() {
                reasons.push(format!("criterion {}: {}", index, err));
            }
        }
        reasons
    }

    /// Persist a new record under a freshly generated identity and return
    /// the stored entity. Ownership stamping is the caller's concern; the
    /// write path applies no tenant scoping.
    pub async fn create(&self, mut entity: E) -> Result<E, RecordHandlerError> {
        entity.set_id(Uuid::new_v4().to_string());

        self.collection
            .insert_one(&entity, None)
            .await
            .map_err(|err| RecordHandlerError::Create {
                reasons: vec!["inserting record".to_string(), err.to_string()],
            })?;

        Ok(entity)
    }

    pub async fn retrieve(
        &self,
        claims: &Claims,
        identifier: &Identifier,
    ) -> Result<E, RecordHandlerError> {
        let reasons = self.validate_identifier(identifier);
        if !reasons.is_empty() {
            return Err(RecordHandlerError::RequestInvalid { reasons });
        }

        let filter = (self.scope_filter)(identifier.to_filter(), claims);

        match self.collection.find_one(filter, None).await {
            Ok(Some(entity)) => Ok(entity),
            Ok(None) => Err(RecordHandlerError::NotFound),
            Err(err) => Err(RecordHandlerError::Unexpected {
                reasons: vec![err.to_string()],
            }),
        }
    }

    /// Replace the stored record wholesale. Callers must have merged their
    /// allowed-field changes onto a freshly retrieved copy; there is no
    /// diffing here.
    pub async fn update(
        &self,
        claims: &Claims,
        identifier: &Identifier,
        entity: E,
    ) -> Result<E, RecordHandlerError> {
        let reasons = self.validate_identifier(identifier);
        if !reasons.is_empty() {
            return Err(RecordHandlerError::RequestInvalid { reasons });
        }

        let filter = (self.scope_filter)(identifier.to_filter(), claims);

        let result = self
            .collection
            .replace_one(filter, &entity, None)
            .await
            .map_err(|err| RecordHandlerError::Update {
                reasons: vec!["updating record".to_string(), err.to_string()],
            })?;
        if result.matched_count == 0 {
            return Err(RecordHandlerError::Update {
                reasons: vec![
                    "updating record".to_string(),
                    "no record matched".to_string(),
                ],
            });
        }

        Ok(entity)
    }

    pub async fn delete(
        &self,
        claims: &Claims,
        identifier: &Identifier,
    ) -> Result<(), RecordHandlerError> {
        let reasons = self.validate_identifier(identifier);
        if !reasons.is_empty() {
            return Err(RecordHandlerError::RequestInvalid { reasons });
        }

        let filter = (self.scope_filter)(identifier.to_filter(), claims);

        let result = self
            .collection
            .delete_one(filter, None)
            .await
            .map_err(|err| RecordHandlerError::Delete {
                reasons: vec!["removing record".to_string(), err.to_string()],
            })?;
        if result.deleted_count == 0 {
            return Err(RecordHandlerError::Delete {
                reasons: vec![
                    "removing record".to_string(),
                    "no record matched".to_string(),
                ],
            });
        }

        Ok(())
    }

    /// Count and fetch the records matching the criteria under the caller's
    /// visibility. `total` reflects the filtered set before pagination.
    pub async fn collect(
        &self,
        claims: &Claims,
        criteria: &[Criterion],
        query: &Query,
    ) -> Result<CollectResponse<E>, RecordHandlerError> {
        let reasons = self.validate_criteria(criteria);
        if !reasons.is_empty() {
            return Err(RecordHandlerError::RequestInvalid { reasons });
        }

        let filter = (self.scope_filter)(criteria_to_filter(criteria), claims);

        let collect_error = |step: &str| {
            let step = step.to_string();
            move |err: mongodb::error::Error| RecordHandlerError::Collect {
                reasons: vec![step, err.to_string()],
            }
        };

        let total = self
            .collection
            .count_documents(filter.clone(), None)
            .await
            .map_err(collect_error("counting records"))?;

        let mut find_options = FindOptions::builder()
            .skip(query.offset)
            .sort(query.to_mongo_sort())
            .build();
        if query.limit > 0 {
            find_options.limit = Some(query.limit);
        }

        let mut cursor = self
            .collection
            .find(filter, find_options)
            .await
            .map_err(collect_error("fetching records"))?;

        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await.map_err(collect_error("fetching records"))? {
            records.push(record);
        }

        Ok(CollectResponse { records, total })
    }
}
