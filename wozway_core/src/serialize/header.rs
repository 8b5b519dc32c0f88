use super::simple_style;
use crate::error::SdkError;
use crate::metadata::{Channel, Style};
use crate::params::Field;
use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};

pub(crate) fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), SdkError> {
    let name_h = HeaderName::from_bytes(name.as_bytes()).map_err(|_| SdkError::InvalidHeader {
        name: name.to_string(),
        reason: "invalid header name",
    })?;
    let value_h = HeaderValue::from_str(value).map_err(|_| SdkError::InvalidHeader {
        name: name.to_string(),
        reason: "invalid header value",
    })?;
    headers.insert(name_h, value_h);
    Ok(())
}

/// Headers for every field tagged `header`; empty values are left out.
pub fn get_headers(fields: &[Field]) -> Result<HeaderMap, SdkError> {
    let mut headers = HeaderMap::new();
    for field in fields {
        let Some(meta) = field.metadata.header.as_ref() else {
            continue;
        };
        let value = if meta.serialization.is_some() {
            field.value.flat_string()
        } else {
            if meta.style != Style::Simple {
                return Err(SdkError::InvalidStyle {
                    channel: Channel::Header.as_str(),
                    field: field.name,
                    style: meta.style,
                });
            }
            simple_style(&field.value, meta.explode, Channel::Header, &str::to_owned)
        };
        if value.is_empty() {
            continue;
        }
        insert_header(&mut headers, field.wire_name, &value)?;
    }
    Ok(headers)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metadata::{FieldMetadata, ParamMetadata};
    use crate::params::ParamValue;

    fn header_field(name: &'static str, explode: bool, value: ParamValue) -> Field {
        Field {
            name,
            wire_name: name,
            metadata: FieldMetadata {
                header: Some(ParamMetadata {
                    explode,
                    ..ParamMetadata::header()
                }),
                ..Default::default()
            },
            value,
        }
    }

    #[test]
    fn lists_and_objects_use_simple_style() {
        let obj = ParamValue::Object(vec![
            header_field("id", false, ParamValue::scalar(7)),
            header_field("name", false, ParamValue::scalar("x")),
        ]);
        let h = get_headers(&[
            header_field("x-tags", false, ParamValue::List(vec![
                ParamValue::scalar("a"),
                ParamValue::scalar("b"),
            ])),
            header_field("x-obj", true, obj.clone()),
            header_field("x-obj-flat", false, obj),
        ])
        .unwrap();
        assert_eq!(h["x-tags"], "a,b");
        assert_eq!(h["x-obj"], "id=7,name=x");
        assert_eq!(h["x-obj-flat"], "id,7,name,x");
    }

    #[test]
    fn empty_values_are_omitted() {
        let h = get_headers(&[
            header_field("x-none", false, ParamValue::Null),
            header_field("x-empty", false, ParamValue::List(vec![])),
        ])
        .unwrap();
        assert!(h.is_empty());
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = get_headers(&[header_field("x-bad", false, ParamValue::scalar("a\nb"))])
            .unwrap_err();
        match err {
            SdkError::InvalidHeader { name, reason } => {
                assert_eq!(name, "x-bad");
                assert_eq!(reason, "invalid header value");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
