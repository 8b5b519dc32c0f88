use crate::body::SerializedRequestBody;
use crate::error::SdkError;
use crate::metadata::{Channel, FieldMetadata, ParamMetadata};
use bytes::Bytes;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;

/// File payload for a multipart part.
#[derive(Clone, Debug, PartialEq)]
pub struct FilePart {
    pub file_name: String,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, ct: impl Into<String>) -> Self {
        self.content_type = Some(ct.into());
        self
    }
}

/// Value tree a field is reduced to before any wire formatting.
///
/// `Null` means "not set": every serializer skips it.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Null,
    Scalar(String),
    List(Vec<ParamValue>),
    Map(Vec<(String, ParamValue)>),
    Object(Vec<Field>),
    File(FilePart),
}

impl ParamValue {
    #[inline]
    pub fn scalar(v: impl Display) -> Self {
        ParamValue::Scalar(v.to_string())
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self, ParamValue::Null)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Scalar(_) => "scalar",
            ParamValue::List(_) => "list",
            ParamValue::Map(_) => "map",
            ParamValue::Object(_) => "object",
            ParamValue::File(_) => "file",
        }
    }

    /// String form used when a value is nested deeper than a style can express.
    pub fn flat_string(&self) -> String {
        match self {
            ParamValue::Null => String::new(),
            ParamValue::Scalar(s) => s.clone(),
            ParamValue::List(items) => items
                .iter()
                .filter(|v| v.is_set())
                .map(ParamValue::flat_string)
                .collect::<Vec<_>>()
                .join(","),
            ParamValue::Map(entries) => entries
                .iter()
                .filter(|(_, v)| v.is_set())
                .map(|(k, v)| format!("{},{}", k, v.flat_string()))
                .collect::<Vec<_>>()
                .join(","),
            ParamValue::Object(fields) => fields
                .iter()
                .filter(|f| f.value.is_set())
                .map(|f| format!("{},{}", f.wire_name, f.value.flat_string()))
                .collect::<Vec<_>>()
                .join(","),
            ParamValue::File(f) => f.file_name.clone(),
        }
    }
}

/// One field of a `Params` struct with its tags and reduced value.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Rust field name; globals are matched on it.
    pub name: &'static str,
    /// Name on the wire (alias).
    pub wire_name: &'static str,
    pub metadata: FieldMetadata,
    pub value: ParamValue,
}

impl Field {
    #[inline]
    pub fn param(&self, channel: Channel) -> Option<&ParamMetadata> {
        self.metadata.param(channel)
    }
}

/// Conversion into a `ParamValue`.
pub trait ToParam {
    fn to_param(&self) -> Result<ParamValue, SdkError>;
}

/// Field introspection, usually derived with `#[derive(Params)]`.
pub trait Params {
    fn fields(&self) -> Result<Vec<Field>, SdkError>;

    fn request_body(&self) -> Result<Option<SerializedRequestBody>, SdkError> {
        Ok(None)
    }

    /// Fields carrying metadata for `channel`, in declaration order.
    fn fields_with(&self, channel: Channel) -> Result<Vec<Field>, SdkError> {
        let mut fields = self.fields()?;
        fields.retain(|f| f.metadata.has(channel));
        Ok(fields)
    }
}

impl Params for () {
    fn fields(&self) -> Result<Vec<Field>, SdkError> {
        Ok(Vec::new())
    }
}

impl<T: Params + ?Sized> Params for &T {
    fn fields(&self) -> Result<Vec<Field>, SdkError> {
        (**self).fields()
    }
    fn request_body(&self) -> Result<Option<SerializedRequestBody>, SdkError> {
        (**self).request_body()
    }
}

impl<T: Params + ?Sized> Params for Box<T> {
    fn fields(&self) -> Result<Vec<Field>, SdkError> {
        (**self).fields()
    }
    fn request_body(&self) -> Result<Option<SerializedRequestBody>, SdkError> {
        (**self).request_body()
    }
}

impl<T: Params + ?Sized> Params for Arc<T> {
    fn fields(&self) -> Result<Vec<Field>, SdkError> {
        (**self).fields()
    }
    fn request_body(&self) -> Result<Option<SerializedRequestBody>, SdkError> {
        (**self).request_body()
    }
}

/// Value for a field tagged `serialization = "json"` (or form/multipart `json`).
pub fn json_param<T: Serialize + ?Sized>(v: &T) -> Result<ParamValue, SdkError> {
    let value = serde_json::to_value(v)?;
    if value.is_null() {
        return Ok(ParamValue::Null);
    }
    Ok(ParamValue::Scalar(serde_json::to_string(&value)?))
}

macro_rules! display_to_param {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToParam for $t {
                #[inline]
                fn to_param(&self) -> Result<ParamValue, SdkError> {
                    Ok(ParamValue::scalar(self))
                }
            }
        )*
    };
}

display_to_param!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, bool, String,
    str
);

impl ToParam for Cow<'_, str> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        Ok(ParamValue::Scalar(self.to_string()))
    }
}

impl<T: ToParam + ?Sized> ToParam for &T {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Box<T> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        (**self).to_param()
    }
}

impl<T: ToParam + ?Sized> ToParam for Arc<T> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        (**self).to_param()
    }
}

impl<T: ToParam> ToParam for Option<T> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        match self {
            Some(v) => v.to_param(),
            None => Ok(ParamValue::Null),
        }
    }
}

impl<T: ToParam> ToParam for [T] {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        let items = self
            .iter()
            .map(ToParam::to_param)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParamValue::List(items))
    }
}

impl<T: ToParam> ToParam for Vec<T> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        self.as_slice().to_param()
    }
}

impl<K: Display, V: ToParam> ToParam for BTreeMap<K, V> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        let entries = self
            .iter()
            .map(|(k, v)| Ok((k.to_string(), v.to_param()?)))
            .collect::<Result<Vec<_>, SdkError>>()?;
        Ok(ParamValue::Map(entries))
    }
}

impl<K: Display, V: ToParam, S> ToParam for HashMap<K, V, S> {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        // HashMap order is unspecified; sort for a stable wire format.
        let mut entries = self
            .iter()
            .map(|(k, v)| Ok((k.to_string(), v.to_param()?)))
            .collect::<Result<Vec<_>, SdkError>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ParamValue::Map(entries))
    }
}

impl ToParam for serde_json::Value {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        use serde_json::Value;
        Ok(match self {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::scalar(b),
            Value::Number(n) => ParamValue::scalar(n),
            Value::String(s) => ParamValue::Scalar(s.clone()),
            Value::Array(items) => ParamValue::List(
                items
                    .iter()
                    .map(ToParam::to_param)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Object(map) => ParamValue::Map(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_param()?)))
                    .collect::<Result<Vec<_>, SdkError>>()?,
            ),
        })
    }
}

impl ToParam for FilePart {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        Ok(ParamValue::File(self.clone()))
    }
}

impl ToParam for ParamValue {
    fn to_param(&self) -> Result<ParamValue, SdkError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scalars_use_display_and_lowercase_bools() {
        assert_eq!(true.to_param().unwrap(), ParamValue::Scalar("true".into()));
        assert_eq!(42u8.to_param().unwrap(), ParamValue::Scalar("42".into()));
        assert_eq!(1.5f64.to_param().unwrap(), ParamValue::Scalar("1.5".into()));
        assert_eq!(Option::<i32>::None.to_param().unwrap(), ParamValue::Null);
    }

    #[test]
    fn hash_maps_are_sorted_by_key() {
        let mut m = HashMap::new();
        m.insert("b", 2);
        m.insert("a", 1);
        let ParamValue::Map(entries) = m.to_param().unwrap() else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn json_param_maps_null_to_unset() {
        assert_eq!(json_param(&Option::<u8>::None).unwrap(), ParamValue::Null);
        let v = serde_json::json!({"a": [1, 2]});
        assert_eq!(
            json_param(&v).unwrap(),
            ParamValue::Scalar("{\"a\":[1,2]}".into())
        );
    }

    #[test]
    fn flat_string_skips_unset_members() {
        let v = ParamValue::List(vec![
            ParamValue::scalar(1),
            ParamValue::Null,
            ParamValue::scalar(3),
        ]);
        assert_eq!(v.flat_string(), "1,3");

        let m = ParamValue::Map(vec![
            ("a".into(), ParamValue::scalar("x")),
            ("b".into(), ParamValue::Null),
        ]);
        assert_eq!(m.flat_string(), "a,x");
    }
}
