use super::simple_style;
use crate::error::SdkError;
use crate::metadata::{Channel, Style};
use crate::params::{Field, ParamValue};

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn percent_encode_path_segment(seg: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let bytes = seg.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        let unreserved = matches!(
            b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~'
        );
        if unreserved {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

/// `(placeholder, value)` pairs for every set field tagged `path`.
pub fn get_path_params(fields: &[Field]) -> Result<Vec<(&'static str, String)>, SdkError> {
    let mut out = Vec::new();
    for field in fields {
        let Some(meta) = field.metadata.path.as_ref() else {
            continue;
        };
        if !field.value.is_set() {
            continue;
        }
        if meta.serialization.is_some() {
            // already reduced to its JSON text by the derive
            let json = match &field.value {
                ParamValue::Scalar(s) => s.clone(),
                other => other.flat_string(),
            };
            out.push((field.wire_name, percent_encode_path_segment(&json)));
            continue;
        }
        if meta.style != Style::Simple {
            return Err(SdkError::InvalidStyle {
                channel: Channel::Path.as_str(),
                field: field.name,
                style: meta.style,
            });
        }
        let value = simple_style(
            &field.value,
            meta.explode,
            Channel::Path,
            &percent_encode_path_segment,
        );
        out.push((field.wire_name, value));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metadata::{FieldMetadata, ParamMetadata};

    fn path_field(name: &'static str, explode: bool, value: ParamValue) -> Field {
        Field {
            name,
            wire_name: name,
            metadata: FieldMetadata {
                path: Some(ParamMetadata {
                    explode,
                    ..ParamMetadata::path()
                }),
                ..Default::default()
            },
            value,
        }
    }

    #[test]
    fn encodes_values_but_keeps_separators() {
        let f = path_field(
            "ids",
            false,
            ParamValue::List(vec![ParamValue::scalar("a b"), ParamValue::scalar("c/d")]),
        );
        let got = get_path_params(&[f]).unwrap();
        assert_eq!(got, [("ids", "a%20b,c%2Fd".to_string())]);
    }

    #[test]
    fn map_explode_switches_pair_separator() {
        let m = ParamValue::Map(vec![
            ("role".into(), ParamValue::scalar("admin")),
            ("first".into(), ParamValue::scalar("Alex")),
        ]);
        let exploded = get_path_params(&[path_field("id", true, m.clone())]).unwrap();
        assert_eq!(exploded[0].1, "role=admin,first=Alex");
        let flat = get_path_params(&[path_field("id", false, m)]).unwrap();
        assert_eq!(flat[0].1, "role,admin,first,Alex");
    }

    #[test]
    fn object_members_need_path_metadata() {
        let inner = vec![
            path_field("a", false, ParamValue::scalar(1)),
            Field {
                name: "b",
                wire_name: "b",
                metadata: FieldMetadata::default(),
                value: ParamValue::scalar(2),
            },
        ];
        let got = get_path_params(&[path_field("obj", true, ParamValue::Object(inner))]).unwrap();
        assert_eq!(got[0].1, "a=1");
    }

    #[test]
    fn unset_fields_and_non_simple_styles() {
        assert!(get_path_params(&[path_field("x", false, ParamValue::Null)])
            .unwrap()
            .is_empty());

        let mut f = path_field("x", false, ParamValue::scalar(1));
        if let Some(p) = f.metadata.path.as_mut() {
            p.style = Style::Form;
        }
        let err = get_path_params(&[f]).unwrap_err();
        assert!(matches!(err, SdkError::InvalidStyle { channel: "path", .. }));
    }
}
