//! Patient identities from demographic records.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::{debug, info};

use patlab_model::{InternalId, LabError, PatientIdentity, Result};

use crate::phi::redact_value;

/// Build patient identities in source order.
///
/// The internal id is the first element of each record's `identifiers`
/// array, given either as a JSON integer or as a numeric string. Any bad
/// record aborts the load; no partial list is returned.
pub fn load_patients(records: &[Value]) -> Result<Vec<PatientIdentity>> {
    let mut patients = Vec::with_capacity(records.len());
    let mut seen = BTreeSet::new();
    for (index, record) in records.iter().enumerate() {
        let patient = patient_from_record(index, record)?;
        if !seen.insert(patient.internal_id) {
            return Err(LabError::malformed_record(
                index,
                format!("duplicate internal id {}", patient.internal_id),
            ));
        }
        debug!(
            index,
            internal_id = patient.internal_id,
            last_name = redact_value(&patient.last_name),
            "loaded patient"
        );
        patients.push(patient);
    }
    info!(patients = patients.len(), "demographics loaded");
    Ok(patients)
}

fn patient_from_record(index: usize, record: &Value) -> Result<PatientIdentity> {
    let fields = record
        .as_object()
        .ok_or_else(|| LabError::malformed_record(index, "record is not a JSON object"))?;

    let internal_id = internal_id(index, fields)?;
    let external_id = string_field(index, fields, "id")?;
    let first_name = string_field(index, fields, "firstName")?;
    let last_name = string_field(index, fields, "lastName")?;
    let date_of_birth = string_field(index, fields, "dateOfBirth")?;

    Ok(PatientIdentity::new(
        internal_id,
        external_id,
        first_name,
        last_name,
        date_of_birth,
    ))
}

fn internal_id(index: usize, fields: &Map<String, Value>) -> Result<InternalId> {
    let first = fields
        .get("identifiers")
        .and_then(Value::as_array)
        .and_then(|identifiers| identifiers.first())
        .ok_or_else(|| LabError::malformed_record(index, "missing identifiers[0]"))?;

    let parsed = match first {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<InternalId>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        LabError::malformed_record(index, format!("identifiers[0] is not an integer: {first}"))
    })
}

fn string_field<'a>(index: usize, fields: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| LabError::malformed_record(index, format!("missing string field {key:?}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use patlab_model::LabErrorKind;

    fn record(identifiers: Value) -> Value {
        json!({
            "identifiers": identifiers,
            "id": "uuid-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dateOfBirth": "1815-12-10"
        })
    }

    #[test]
    fn string_and_number_identifiers() {
        let records = vec![record(json!(["7", "MRN-7"])), {
            let mut second = record(json!([8]));
            second["id"] = json!("uuid-2");
            second
        }];
        let patients = load_patients(&records).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].internal_id, 7);
        assert_eq!(patients[1].internal_id, 8);
        assert_eq!(patients[1].external_id, "uuid-2");
        assert!(patients.iter().all(|patient| patient.results.is_empty()));
    }

    #[test]
    fn date_of_birth_is_passed_through() {
        let patients = load_patients(&[record(json!(["7"]))]).unwrap();
        assert_eq!(patients[0].date_of_birth, "1815-12-10");
        assert_eq!(patients[0].first_name, "Ada");
        assert_eq!(patients[0].last_name, "Lovelace");
    }

    #[test]
    fn empty_identifiers_fail() {
        let err = load_patients(&[record(json!([]))]).unwrap_err();
        assert_eq!(err.kind(), LabErrorKind::MalformedRecord);
    }

    #[test]
    fn non_numeric_identifier_fails() {
        for bad in [json!(["MRN-7"]), json!([7.5]), json!([null]), json!("7")] {
            let err = load_patients(&[record(bad)]).unwrap_err();
            assert_eq!(err.kind(), LabErrorKind::MalformedRecord);
        }
    }

    #[test]
    fn missing_name_fails_with_index() {
        let mut bad = record(json!(["9"]));
        bad.as_object_mut().unwrap().remove("lastName");
        let err = load_patients(&[record(json!(["7"])), bad]).unwrap_err();
        match err {
            LabError::MalformedRecord { index, message } => {
                assert_eq!(index, 1);
                assert!(message.contains("lastName"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_internal_ids_fail() {
        let err = load_patients(&[record(json!(["7"])), record(json!([7]))]).unwrap_err();
        assert_eq!(err.kind(), LabErrorKind::MalformedRecord);
        assert!(err.to_string().contains("duplicate internal id 7"));
    }

    #[test]
    fn non_object_record_fails() {
        let err = load_patients(&[json!(["7"])]).unwrap_err();
        assert_eq!(err.kind(), LabErrorKind::MalformedRecord);
    }
}
