//! Request extraction helpers shared by the resource handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use models::errors::ModelError;
use models::validation;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::ApiError;

/// Deserializes a field that was present in the body, keeping `null`, so that
/// with `#[serde(default)]` an absent key stays `None` and `null` becomes
/// `Some(Value::Null)`.
pub fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(d).map(Some)
}

pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

pub fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(v)| v)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// A segment that does not parse as an id cannot name an existing record.
pub fn id(path: Result<Path<i32>, PathRejection>, entity: &str) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(format!("{entity} not found")))
}

pub fn required<'a>(field: &str, v: &'a Option<Value>) -> Result<&'a Value, ModelError> {
    v.as_ref().ok_or_else(|| ModelError::validation(format!("{field} is required")))
}

pub fn required_integer(field: &str, v: &Option<Value>) -> Result<i32, ModelError> {
    validation::integer(field, required(field, v)?)
}

/// Text that may be absent; absent reads as empty.
pub fn text_or_empty(field: &str, v: &Option<Value>) -> Result<String, ModelError> {
    v.as_ref().map_or(Ok(String::new()), |v| validation::text(field, v))
}

pub fn patch_text(field: &str, v: &Option<Value>) -> Result<Option<String>, ModelError> {
    v.as_ref().map(|v| validation::text(field, v)).transpose()
}

pub fn patch_integer(field: &str, v: &Option<Value>) -> Result<Option<i32>, ModelError> {
    v.as_ref().map(|v| validation::integer(field, v)).transpose()
}

/// Nullable text: `Some(None)` when the key is present with `null`.
pub fn patch_nullable_text(field: &str, v: &Option<Value>) -> Result<Option<Option<String>>, ModelError> {
    match v {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(v) => validation::text(field, v).map(|s| Some(Some(s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "present")]
        grade: Option<Value>,
    }

    #[test]
    fn present_distinguishes_null_from_absent() {
        let absent: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.grade, None);
        let null: Probe = serde_json::from_value(json!({"grade": null})).unwrap();
        assert_eq!(null.grade, Some(Value::Null));
        let set: Probe = serde_json::from_value(json!({"grade": 90, "other": 1})).unwrap();
        assert_eq!(set.grade, Some(json!(90)));
    }

    #[test]
    fn required_fields_report_their_name() {
        assert_eq!(required_integer("course_id", &None).unwrap_err().to_string(), "course_id is required");
        assert_eq!(required_integer("course_id", &Some(json!("4"))).unwrap(), 4);
        assert_eq!(text_or_empty("name", &None).unwrap(), "");
    }

    #[test]
    fn nullable_text_patch() {
        assert_eq!(patch_nullable_text("specialty", &None).unwrap(), None);
        assert_eq!(patch_nullable_text("specialty", &Some(Value::Null)).unwrap(), Some(None));
        assert_eq!(patch_nullable_text("specialty", &Some(json!("AI"))).unwrap(), Some(Some("AI".into())));
        assert!(patch_nullable_text("specialty", &Some(json!(3))).is_err());
    }
}
