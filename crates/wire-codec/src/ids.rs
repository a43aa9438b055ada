//! Codec de UUID: ida y vuelta por la gramática textual canónica.

use uuid::Uuid;
use wire_model::CodecError;

pub fn uuid_to_string(value: &Uuid) -> String {
    value.to_string()
}

pub fn uuid_from_string(s: &str) -> Result<Uuid, CodecError> {
    Uuid::parse_str(s).map_err(|e| CodecError::validation(s, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_round_trip() {
        let v = Uuid::new_v4();
        assert_eq!(uuid_from_string(&uuid_to_string(&v)).expect("round trip"), v);
    }

    #[test]
    fn malformed_uuid_is_validation() {
        let err = uuid_from_string("no-es-un-uuid").unwrap_err();
        match err {
            CodecError::Validation { value, .. } => assert_eq!(value, "no-es-un-uuid"),
            other => panic!("se esperaba Validation, hubo {other:?}"),
        }
    }
}
