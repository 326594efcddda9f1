//! Pagination and sort options for Collect operations.

use bson::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Page size; zero or negative means no limit.
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub sort_field: Vec<String>,
    #[serde(default)]
    pub sort_order: Vec<SortOrder>,
}

impl Query {
    /// Translate the parallel field/order arrays into a Mongo sort document.
    ///
    /// A length mismatch between the two arrays is a caller configuration
    /// error; it is logged and treated as "no sort" rather than failing the
    /// request.
    pub fn to_mongo_sort(&self) -> Option<Document> {
        if self.sort_field.len() != self.sort_order.len() {
            tracing::error!(
                sort_fields = self.sort_field.len(),
                sort_orders = self.sort_order.len(),
                "sort field and sort order counts differ, applying no sort"
            );
            return None;
        }
        if self.sort_field.is_empty() {
            return None;
        }

        let mut sort = Document::new();
        for (field, order) in self.sort_field.iter().zip(self.sort_order.iter()) {
            let direction: i32 = match order {
                SortOrder::Asc => 1,
                SortOrder::Desc => -1,
            };
            sort.insert(field.clone(), direction);
        }
        Some(sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_multi_field_sort_preserves_order() {
        let query = Query {
            limit: 10,
            offset: 0,
            sort_field: vec!["surname".to_string(), "name".to_string()],
            sort_order: vec![SortOrder::Asc, SortOrder::Desc],
        };
        assert_eq!(
            query.to_mongo_sort(),
            Some(doc! { "surname": 1, "name": -1 })
        );
    }

    #[test]
    fn test_length_mismatch_degrades_to_no_sort() {
        let query = Query {
            limit: 10,
            offset: 0,
            sort_field: vec!["surname".to_string(), "name".to_string()],
            sort_order: vec![SortOrder::Asc],
        };
        assert_eq!(query.to_mongo_sort(), None);
    }

    #[test]
    fn test_empty_sort_is_none() {
        assert_eq!(Query::default().to_mongo_sort(), None);
    }
}
