use super::{FormValues, populate_form};
use crate::error::SdkError;
use crate::metadata::Style;
use crate::params::ParamValue;
use bytes::Bytes;

pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Form fields of a `application/x-www-form-urlencoded` body.
///
/// Object bodies contribute their `form`-tagged fields, map bodies contribute
/// every entry. Anything else cannot be a form.
pub fn serialize_form(body: &ParamValue) -> Result<FormValues, SdkError> {
    let mut form = FormValues::new();
    match body {
        ParamValue::Object(fields) => {
            for field in fields {
                if !field.value.is_set() {
                    continue;
                }
                let Some(meta) = field.metadata.form.as_ref() else {
                    continue;
                };
                if meta.json {
                    form.set(field.wire_name, vec![field.value.flat_string()]);
                } else if meta.style == Style::Form {
                    populate_form(field.wire_name, meta.explode, &field.value, ",", &mut form);
                } else {
                    return Err(SdkError::InvalidStyle {
                        channel: "form",
                        field: field.name,
                        style: meta.style,
                    });
                }
            }
        }
        ParamValue::Map(entries) => {
            for (k, v) in entries.iter().filter(|(_, v)| v.is_set()) {
                form.set(k.as_str(), vec![v.flat_string()]);
            }
        }
        other => {
            return Err(SdkError::InvalidBodyType {
                found: other.type_name(),
                media_type: FORM_MEDIA_TYPE,
            });
        }
    }
    Ok(form)
}

pub fn encode_form(form: &FormValues) -> Bytes {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in form.pairs() {
        ser.append_pair(k, v);
    }
    Bytes::from(ser.finish())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metadata::{FieldMetadata, FormMetadata};
    use crate::params::Field;

    fn form_field(name: &'static str, meta: FormMetadata, value: ParamValue) -> Field {
        Field {
            name,
            wire_name: name,
            metadata: FieldMetadata {
                form: Some(meta),
                ..Default::default()
            },
            value,
        }
    }

    #[test]
    fn object_bodies_use_form_rule_and_json() {
        let body = ParamValue::Object(vec![
            form_field("name", FormMetadata::default(), ParamValue::scalar("a b")),
            form_field(
                "ids",
                FormMetadata::default(),
                ParamValue::List(vec![ParamValue::scalar(1), ParamValue::scalar(2)]),
            ),
            form_field(
                "meta",
                FormMetadata {
                    json: true,
                    ..Default::default()
                },
                ParamValue::Scalar("{\"k\":true}".into()),
            ),
            Field {
                name: "untagged",
                wire_name: "untagged",
                metadata: FieldMetadata::default(),
                value: ParamValue::scalar("ignored"),
            },
        ]);
        let form = serialize_form(&body).unwrap();
        assert_eq!(
            encode_form(&form),
            Bytes::from_static(b"name=a+b&ids=1&ids=2&meta=%7B%22k%22%3Atrue%7D")
        );
    }

    #[test]
    fn map_bodies_take_every_entry() {
        let body = ParamValue::Map(vec![
            ("a".into(), ParamValue::scalar(1)),
            ("b".into(), ParamValue::Null),
        ]);
        let form = serialize_form(&body).unwrap();
        assert_eq!(form.pairs().collect::<Vec<_>>(), [("a", "1")]);
    }

    #[test]
    fn rejects_scalars_and_unsupported_styles() {
        let err = serialize_form(&ParamValue::scalar("x")).unwrap_err();
        assert!(matches!(err, SdkError::InvalidBodyType { found: "scalar", .. }));

        let body = ParamValue::Object(vec![form_field(
            "f",
            FormMetadata {
                style: Style::DeepObject,
                ..Default::default()
            },
            ParamValue::scalar(1),
        )]);
        let err = serialize_form(&body).unwrap_err();
        assert!(matches!(err, SdkError::InvalidStyle { channel: "form", .. }));
    }
}
