//! An executable model of the tagged-union wire format the enum codec
//! generates code for.
//!
//! The model is built from the same validated case list as the generated
//! code, so the two agree on case names, labels and field order.

use serde_json::{Map, Value};

use crate::enum_codec::EnumCaseSpec;

/// One case of the union and the labels of its payload, in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCase {
    pub name: String,
    pub labels: Vec<String>,
}

/// A decoded value: the case and its payload values in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseValue {
    pub case: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedUnion {
    discriminator_key: String,
    cases: Vec<WireCase>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WireError {
    #[error("key '{key}' not found")]
    MissingKey { key: String },
    #[error("cannot decode case from discriminator {value}")]
    UnknownDiscriminator { value: Value },
    #[error("unknown case '{case}'")]
    UnknownCase { case: String },
    #[error("case '{case}' takes {expected} values, got {got}")]
    ArityMismatch {
        case: String,
        expected: usize,
        got: usize,
    },
}

impl CaseValue {
    pub fn new(case: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            case: case.into(),
            values,
        }
    }

    /// A case without payload.
    pub fn bare(case: impl Into<String>) -> Self {
        Self::new(case, Vec::new())
    }
}

impl TaggedUnion {
    pub fn new(discriminator_key: impl Into<String>, cases: &[EnumCaseSpec]) -> Self {
        Self {
            discriminator_key: discriminator_key.into(),
            cases: cases
                .iter()
                .map(|case| WireCase {
                    name: case.name.to_string(),
                    labels: case.fields().iter().map(|f| f.label.to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.name.as_str())
    }

    fn case(&self, name: &str) -> Option<&WireCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// The discriminator first, then each payload value under its label.
    pub fn encode(&self, value: &CaseValue) -> Result<Map<String, Value>, WireError> {
        let case = self.case(&value.case).ok_or_else(|| WireError::UnknownCase {
            case: value.case.clone(),
        })?;
        if case.labels.len() != value.values.len() {
            return Err(WireError::ArityMismatch {
                case: case.name.clone(),
                expected: case.labels.len(),
                got: value.values.len(),
            });
        }

        let mut object = Map::new();
        object.insert(
            self.discriminator_key.clone(),
            Value::String(case.name.clone()),
        );
        for (label, field) in case.labels.iter().zip(&value.values) {
            object.insert(label.clone(), field.clone());
        }
        Ok(object)
    }

    /// Keys not named by the decoded case are ignored.
    pub fn decode(&self, object: &Map<String, Value>) -> Result<CaseValue, WireError> {
        let discriminator =
            object
                .get(&self.discriminator_key)
                .ok_or_else(|| WireError::MissingKey {
                    key: self.discriminator_key.clone(),
                })?;
        let case = discriminator
            .as_str()
            .and_then(|name| self.case(name))
            .ok_or_else(|| WireError::UnknownDiscriminator {
                value: discriminator.clone(),
            })?;

        let values = case
            .labels
            .iter()
            .map(|label| {
                object
                    .get(label)
                    .cloned()
                    .ok_or_else(|| WireError::MissingKey { key: label.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CaseValue::new(case.name.clone(), values))
    }
}

#[cfg(test)]
mod tests {
    use companion_syntax::{Ident, TypeRef};
    use serde_json::json;

    use super::*;
    use crate::enum_codec::PayloadField;

    fn field(label: &str, ty: &str) -> PayloadField {
        PayloadField {
            label: Ident::new(label),
            ty: TypeRef::named(ty),
        }
    }

    fn role() -> TaggedUnion {
        TaggedUnion::new(
            "type",
            &[
                EnumCaseSpec {
                    name: Ident::new("nobody"),
                    payload: None,
                },
                EnumCaseSpec {
                    name: Ident::new("user"),
                    payload: Some(vec![field("user", "User")]),
                },
                EnumCaseSpec {
                    name: Ident::new("transfer"),
                    payload: Some(vec![field("from", "User"), field("to", "User")]),
                },
            ],
        )
    }

    #[test]
    fn test_encode() {
        let union = role();
        let encoded = union
            .encode(&CaseValue::new("user", vec![json!({"name": "ada"})]))
            .unwrap();
        assert_eq!(
            Value::Object(encoded),
            json!({"type": "user", "user": {"name": "ada"}})
        );
        let encoded = union.encode(&CaseValue::bare("nobody")).unwrap();
        assert_eq!(Value::Object(encoded), json!({"type": "nobody"}));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let union = role();
        for value in [
            CaseValue::bare("nobody"),
            CaseValue::new("user", vec![json!({"name": "ada"})]),
            CaseValue::new("transfer", vec![json!(1), json!(2)]),
        ] {
            let encoded = union.encode(&value).unwrap();
            assert_eq!(union.decode(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_ignores_unrelated_keys() {
        let object = json!({"type": "nobody", "user": 1});
        let Value::Object(object) = object else {
            unreachable!()
        };
        assert_eq!(role().decode(&object).unwrap(), CaseValue::bare("nobody"));
    }

    #[test]
    fn test_errors() {
        let union = role();
        assert_eq!(
            union.encode(&CaseValue::bare("admin")),
            Err(WireError::UnknownCase {
                case: "admin".into()
            })
        );
        assert_eq!(
            union.encode(&CaseValue::bare("user")),
            Err(WireError::ArityMismatch {
                case: "user".into(),
                expected: 1,
                got: 0
            })
        );

        let decode = |value: Value| match value {
            Value::Object(object) => union.decode(&object),
            _ => unreachable!(),
        };
        assert_eq!(
            decode(json!({"user": 1})),
            Err(WireError::MissingKey { key: "type".into() })
        );
        assert_eq!(
            decode(json!({"type": "admin"})),
            Err(WireError::UnknownDiscriminator {
                value: json!("admin")
            })
        );
        assert_eq!(
            decode(json!({"type": 3})),
            Err(WireError::UnknownDiscriminator { value: json!(3) })
        );
        assert_eq!(
            decode(json!({"type": "transfer", "from": 1})),
            Err(WireError::MissingKey { key: "to".into() })
        );
        assert_eq!(
            WireError::UnknownDiscriminator {
                value: json!("admin")
            }
            .to_string(),
            "cannot decode case from discriminator \"admin\""
        );
    }
}
