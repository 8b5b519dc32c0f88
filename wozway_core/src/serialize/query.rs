use super::{FormValues, populate_form};
use crate::error::SdkError;
use crate::metadata::{Channel, Style};
use crate::params::{Field, ParamValue};

/// Writes every set field tagged `query` into `out`.
pub fn get_query_params(fields: &[Field], out: &mut FormValues) -> Result<(), SdkError> {
    for field in fields {
        let Some(meta) = field.metadata.query.as_ref() else {
            continue;
        };
        if !field.value.is_set() {
            continue;
        }
        if meta.serialization.is_some() {
            out.push(field.wire_name, field.value.flat_string());
            continue;
        }
        match meta.style {
            Style::DeepObject => deep_object(field.wire_name, &field.value, out),
            Style::Form => populate_form(field.wire_name, meta.explode, &field.value, ",", out),
            Style::PipeDelimited => {
                populate_form(field.wire_name, meta.explode, &field.value, "|", out)
            }
            Style::SpaceDelimited => {
                populate_form(field.wire_name, meta.explode, &field.value, " ", out)
            }
            style => {
                return Err(SdkError::InvalidStyle {
                    channel: Channel::Query.as_str(),
                    field: field.name,
                    style,
                });
            }
        }
    }
    Ok(())
}

/// `name[a][b]=v`. Scalars at the top level produce nothing.
fn deep_object(prefix: &str, value: &ParamValue, out: &mut FormValues) {
    match value {
        ParamValue::Object(fields) => {
            for f in fields
                .iter()
                .filter(|f| f.metadata.has(Channel::Query) && f.value.is_set())
            {
                deep_member(&format!("{}[{}]", prefix, f.wire_name), &f.value, out);
            }
        }
        ParamValue::Map(entries) => {
            for (k, v) in entries.iter().filter(|(_, v)| v.is_set()) {
                deep_member(&format!("{}[{}]", prefix, k), v, out);
            }
        }
        _ => {}
    }
}

fn deep_member(key: &str, value: &ParamValue, out: &mut FormValues) {
    match value {
        ParamValue::Null => {}
        ParamValue::Object(_) | ParamValue::Map(_) => deep_object(key, value, out),
        ParamValue::List(items) => {
            for v in items.iter().filter(|v| v.is_set()) {
                out.push(key, v.flat_string());
            }
        }
        other => out.set(key, vec![other.flat_string()]),
    }
}
