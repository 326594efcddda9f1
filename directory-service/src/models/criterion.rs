//! Query criteria: predicates a caller composes into a Collect filter.
//!
//! A list of criteria combines conjunctively; the `Or` variant is the only
//! way to express disjunction. Criteria are built per request from wire
//! envelopes and never persisted.

use crate::error::CriterionError;
use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

pub const EXACT_TEXT: &str = "ExactText";
pub const TEXT: &str = "Text";
pub const LIST_TEXT: &str = "ListText";
pub const LIST_DATE: &str = "ListDate";
pub const DATE_RANGE: &str = "DateRange";
pub const OR: &str = "Or";

/// Exact equality on a text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactTextCriterion {
    pub field: String,
    pub text: String,
}

/// Case-insensitive substring match on a text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCriterion {
    pub field: String,
    pub text: String,
}

/// Membership of a text field in a list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTextCriterion {
    pub field: String,
    pub list: Vec<String>,
}

/// Membership of a date field in a list of unix-seconds values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDateCriterion {
    pub field: String,
    pub list: Vec<i64>,
}

/// One bound of a date range. `ignore` omits the bound entirely;
/// `inclusive` selects >=/<= over >/<.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeValue {
    pub date: i64,
    pub inclusive: bool,
    pub ignore: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeCriterion {
    pub field: String,
    pub start_date: RangeValue,
    pub end_date: RangeValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrCriterion {
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    ExactText(ExactTextCriterion),
    Text(TextCriterion),
    ListText(ListTextCriterion),
    ListDate(ListDateCriterion),
    DateRange(DateRangeCriterion),
    Or(OrCriterion),
}

impl Criterion {
    pub fn criterion_type(&self) -> &'static str {
        match self {
            Criterion::ExactText(_) => EXACT_TEXT,
            Criterion::Text(_) => TEXT,
            Criterion::ListText(_) => LIST_TEXT,
            Criterion::ListDate(_) => LIST_DATE,
            Criterion::DateRange(_) => DATE_RANGE,
            Criterion::Or(_) => OR,
        }
    }

    /// Each variant validates independently. Date ranges accept any
    /// combination of bound flags; there is no cross-field validation.
    pub fn validate(&self) -> Result<(), CriterionError> {
        let mut reasons = Vec::new();
        match self {
            Criterion::ExactText(c) => {
                if c.field.is_empty() {
                    reasons.push("field is blank".to_string());
                }
                if c.text.is_empty() {
                    reasons.push("text is blank".to_string());
                }
            }
            Criterion::Text(c) => {
                if c.field.is_empty() {
                    reasons.push("field is blank".to_string());
                }
                if c.text.is_empty() {
                    reasons.push("text is blank".to_string());
                }
            }
            Criterion::ListText(c) => {
                if c.field.is_empty() {
                    reasons.push("field is blank".to_string());
                }
                if c.list.is_empty() {
                    reasons.push("list is empty".to_string());
                }
            }
            Criterion::ListDate(c) => {
                if c.field.is_empty() {
                    reasons.push("field is blank".to_string());
                }
                if c.list.is_empty() {
                    reasons.push("list is empty".to_string());
                }
            }
            Criterion::DateRange(c) => {
                if c.field.is_empty() {
                    reasons.push("field is blank".to_string());
                }
            }
            Criterion::Or(c) => {
                if c.criteria.is_empty() {
                    reasons.push("criteria is empty".to_string());
                }
                for criterion in &c.criteria {
                    if let Err(err) = criterion.validate() {
                        reasons.push(err.to_string());
                    }
                }
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(CriterionError::Invalid { reasons })
        }
    }

    pub fn to_filter(&self) -> Document {
        let mut filter = Document::new();
        match self {
            Criterion::ExactText(c) => {
                filter.insert(c.field.clone(), c.text.clone());
            }
            Criterion::Text(c) => {
                filter.insert(
                    c.field.clone(),
                    doc! { "$regex": c.text.clone(), "$options": "i" },
                );
            }
            Criterion::ListText(c) => {
                filter.insert(c.field.clone(), doc! { "$in": c.list.clone() });
            }
            Criterion::ListDate(c) => {
                filter.insert(c.field.clone(), doc! { "$in": c.list.clone() });
            }
            Criterion::DateRange(c) => {
                filter.insert(c.field.clone(), date_range_condition(c));
            }
            Criterion::Or(c) => {
                let filters: Vec<Document> = c
                    .criteria
                    .iter()
                    .map(|criterion| criterion.to_filter())
                    .collect();
                filter.insert("$or", filters);
            }
        }
        filter
    }
}

fn date_range_condition(c: &DateRangeCriterion) -> Document {
    let start_operator = if c.start_date.inclusive { "$gte" } else { "$gt" };
    let end_operator = if c.end_date.inclusive { "$lte" } else { "$lt" };

    let mut condition = Document::new();
    if !c.start_date.ignore {
        condition.insert(start_operator, c.start_date.date);
    }
    if !c.end_date.ignore {
        condition.insert(end_operator, c.end_date.date);
    }
    // Both bounds ignored leaves an empty condition on the field, which
    // matches unconditionally. Preserved observed behaviour; do not tighten.
    condition
}

/// Combine a list of criteria into one conjunctive filter.
pub fn criteria_to_filter(criteria: &[Criterion]) -> Document {
    if criteria.is_empty() {
        return Document::new();
    }
    let filters: Vec<Bson> = criteria
        .iter()
        .map(|criterion| Bson::Document(criterion.to_filter()))
        .collect();
    doc! { "$and": filters }
}

/// Envelope carrying a criterion across the RPC boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedCriterion {
    #[serde(rename = "type")]
    pub criterion_type: String,
    pub value: serde_json::Value,
}

/// The `Or` payload nests further envelopes rather than bare criteria, so
/// the decode path stays uniform at every level.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrWrapped {
    criteria: Vec<WrappedCriterion>,
}

impl WrappedCriterion {
    pub fn wrap(criterion: &Criterion) -> Result<Self, CriterionError> {
        let wrapping = |err: serde_json::Error| CriterionError::Wrapping {
            reasons: vec!["marshalling".to_string(), err.to_string()],
        };

        let value = match criterion {
            Criterion::ExactText(c) => serde_json::to_value(c).map_err(wrapping)?,
            Criterion::Text(c) => serde_json::to_value(c).map_err(wrapping)?,
            Criterion::ListText(c) => serde_json::to_value(c).map_err(wrapping)?,
            Criterion::ListDate(c) => serde_json::to_value(c).map_err(wrapping)?,
            Criterion::DateRange(c) => serde_json::to_value(c).map_err(wrapping)?,
            Criterion::Or(c) => {
                let criteria = c
                    .criteria
                    .iter()
                    .map(WrappedCriterion::wrap)
                    .collect::<Result<Vec<_>, _>>()?;
                serde_json::to_value(OrWrapped { criteria }).map_err(wrapping)?
            }
        };

        Ok(Self {
            criterion_type: criterion.criterion_type().to_string(),
            value,
        })
    }

    /// Decode table over the closed set of criterion variants.
    pub fn unwrap(&self) -> Result<Criterion, CriterionError> {
        let unwrapping = |err: serde_json::Error| CriterionError::Unwrapping {
            reasons: vec!["unmarshalling".to_string(), err.to_string()],
        };

        match self.criterion_type.as_str() {
            EXACT_TEXT => Ok(Criterion::ExactText(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            TEXT => Ok(Criterion::Text(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            LIST_TEXT => Ok(Criterion::ListText(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            LIST_DATE => Ok(Criterion::ListDate(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            DATE_RANGE => Ok(Criterion::DateRange(
                serde_json::from_value(self.value.clone()).map_err(unwrapping)?,
            )),
            OR => {
                let wrapped_or: OrWrapped =
                    serde_json::from_value(self.value.clone()).map_err(unwrapping)?;
                let criteria = wrapped_or
                    .criteria
                    .iter()
                    .map(WrappedCriterion::unwrap)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Criterion::Or(OrCriterion { criteria }))
            }
            _ => Err(CriterionError::Invalid {
                reasons: vec!["invalid type".to_string()],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(field: &str, text: &str) -> Criterion {
        Criterion::ExactText(ExactTextCriterion {
            field: field.to_string(),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(exact("", "x").validate().is_err());
        assert!(exact("name", "").validate().is_err());
        assert!(exact("name", "x").validate().is_ok());

        let empty_list = Criterion::ListText(ListTextCriterion {
            field: "roles".to_string(),
            list: vec![],
        });
        assert!(empty_list.validate().is_err());
    }

    #[test]
    fn test_validate_or_checks_children() {
        let or = Criterion::Or(OrCriterion {
            criteria: vec![exact("name", "x"), exact("", "y")],
        });
        assert!(or.validate().is_err());

        let empty = Criterion::Or(OrCriterion { criteria: vec![] });
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_exact_text_filter() {
        assert_eq!(exact("name", "acme").to_filter(), doc! { "name": "acme" });
    }

    #[test]
    fn test_text_filter_is_case_insensitive_regex() {
        let criterion = Criterion::Text(TextCriterion {
            field: "name".to_string(),
            text: "acme".to_string(),
        });
        assert_eq!(
            criterion.to_filter(),
            doc! { "name": { "$regex": "acme", "$options": "i" } }
        );
    }

    #[test]
    fn test_list_filters_use_in() {
        let criterion = Criterion::ListText(ListTextCriterion {
            field: "roles".to_string(),
            list: vec!["root".to_string(), "companyAdmin".to_string()],
        });
        assert_eq!(
            criterion.to_filter(),
            doc! { "roles": { "$in": ["root", "companyAdmin"] } }
        );
    }

    #[test]
    fn test_date_range_start_only_inclusive() {
        let criterion = Criterion::DateRange(DateRangeCriterion {
            field: "createdAt".to_string(),
            start_date: RangeValue {
                date: 100,
                inclusive: true,
                ignore: false,
            },
            end_date: RangeValue {
                date: 0,
                inclusive: false,
                ignore: true,
            },
        });
        assert_eq!(
            criterion.to_filter(),
            doc! { "createdAt": { "$gte": 100_i64 } }
        );
    }

    #[test]
    fn test_date_range_both_bounds_exclusive() {
        let criterion = Criterion::DateRange(DateRangeCriterion {
            field: "createdAt".to_string(),
            start_date: RangeValue {
                date: 100,
                inclusive: false,
                ignore: false,
            },
            end_date: RangeValue {
                date: 200,
                inclusive: false,
                ignore: false,
            },
        });
        assert_eq!(
            criterion.to_filter(),
            doc! { "createdAt": { "$gt": 100_i64, "$lt": 200_i64 } }
        );
    }

    #[test]
    fn test_date_range_both_ignored_matches_anything_on_field() {
        let criterion = Criterion::DateRange(DateRangeCriterion {
            field: "createdAt".to_string(),
            start_date: RangeValue {
                date: 100,
                inclusive: true,
                ignore: true,
            },
            end_date: RangeValue {
                date: 200,
                inclusive: true,
                ignore: true,
            },
        });
        assert_eq!(criterion.to_filter(), doc! { "createdAt": {} });
    }

    #[test]
    fn test_or_filter_wraps_disjunction() {
        let or = Criterion::Or(OrCriterion {
            criteria: vec![exact("name", "a"), exact("name", "b")],
        });
        assert_eq!(
            or.to_filter(),
            doc! { "$or": [ { "name": "a" }, { "name": "b" } ] }
        );
    }

    #[test]
    fn test_criteria_combine_conjunctively() {
        let filter = criteria_to_filter(&[exact("name", "a"), exact("surname", "b")]);
        assert_eq!(
            filter,
            doc! { "$and": [ { "name": "a" }, { "surname": "b" } ] }
        );
        assert_eq!(criteria_to_filter(&[]), Document::new());
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let criteria = vec![
            exact("name", "acme"),
            Criterion::Text(TextCriterion {
                field: "name".to_string(),
                text: "ac".to_string(),
            }),
            Criterion::ListDate(ListDateCriterion {
                field: "createdAt".to_string(),
                list: vec![100, 200],
            }),
            Criterion::Or(OrCriterion {
                criteria: vec![
                    exact("name", "a"),
                    Criterion::Or(OrCriterion {
                        criteria: vec![exact("name", "b")],
                    }),
                ],
            }),
        ];

        for criterion in criteria {
            let wrapped = WrappedCriterion::wrap(&criterion).unwrap();
            assert_eq!(wrapped.unwrap().unwrap(), criterion);
        }
    }

    #[test]
    fn test_or_wire_format_nests_envelopes() {
        let or = Criterion::Or(OrCriterion {
            criteria: vec![exact("name", "a")],
        });
        let wrapped = WrappedCriterion::wrap(&or).unwrap();
        let json = serde_json::to_value(&wrapped).unwrap();
        assert_eq!(json["type"], "Or");
        assert_eq!(json["value"]["criteria"][0]["type"], "ExactText");
        assert_eq!(json["value"]["criteria"][0]["value"]["field"], "name");
    }

    #[test]
    fn test_unwrap_unknown_type_is_invalid() {
        let wrapped = WrappedCriterion {
            criterion_type: "Fuzzy".to_string(),
            value: serde_json::json!({}),
        };
        assert!(matches!(
            wrapped.unwrap(),
            Err(CriterionError::Invalid { .. })
        ));
    }
}
