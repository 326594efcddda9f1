//! Criteria cross the RPC boundary as arrays of `{type, value}` envelopes.

use bson::doc;
use directory_service::models::criterion::{criteria_to_filter, WrappedCriterion};

#[test]
fn test_wire_array_unwraps_to_conjunctive_filter() {
    let body = serde_json::json!([
        { "type": "ExactText", "value": { "field": "surname", "text": "Dlamini" } },
        { "type": "DateRange", "value": {
            "field": "createdAt",
            "startDate": { "date": 100, "inclusive": true, "ignore": false },
            "endDate": { "date": 0, "inclusive": false, "ignore": true },
        }},
        { "type": "Or", "value": { "criteria": [
            { "type": "Text", "value": { "field": "name", "text": "an" } },
            { "type": "ListText", "value": { "field": "roles", "list": ["root"] } },
        ]}},
    ]);

    let wrapped: Vec<WrappedCriterion> =
        serde_json::from_value(body).expect("parsing criteria envelopes");
    let criteria = wrapped
        .iter()
        .map(WrappedCriterion::unwrap)
        .collect::<Result<Vec<_>, _>>()
        .expect("unwrapping criteria");

    assert_eq!(
        criteria_to_filter(&criteria),
        doc! { "$and": [
            { "surname": "Dlamini" },
            { "createdAt": { "$gte": 100_i64 } },
            { "$or": [
                { "name": { "$regex": "an", "$options": "i" } },
                { "roles": { "$in": ["root"] } },
            ]},
        ]}
    );
}

#[test]
fn test_wire_array_with_unknown_variant_fails_closed() {
    let body = serde_json::json!([
        { "type": "Fuzzy", "value": { "field": "name", "text": "x" } },
    ]);

    let wrapped: Vec<WrappedCriterion> =
        serde_json::from_value(body).expect("parsing criteria envelopes");
    assert!(wrapped[0].unwrap().is_err());
}
