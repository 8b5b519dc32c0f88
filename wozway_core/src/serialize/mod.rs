//! Wire formatting of `ParamValue`s, one module per channel.

pub mod form;
pub mod header;
pub mod json;
pub mod multipart;
pub mod path;
pub mod query;

use crate::metadata::Channel;
use crate::params::ParamValue;

/// Ordered `key -> values` multimap used for query strings and form bodies.
///
/// Keys keep their first-insertion position. `set` replaces the values of a
/// key, `push` appends to them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormValues {
    entries: Vec<(String, Vec<String>)>,
}

impl FormValues {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: &str) -> Option<&mut Vec<String>> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.slot(&key) {
            Some(slot) => *slot = values,
            None => self.entries.push((key, values)),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.slot(&key) {
            Some(slot) => slot.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Overlays `other`: its keys replace ours.
    pub fn merge(&mut self, other: FormValues) {
        for (k, v) in other.entries {
            self.set(k, v);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }

    /// Flattened `(key, value)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }
}

/// `simple` style shared by path and header params.
///
/// Object members only take part when they carry metadata for `channel`.
pub(crate) fn simple_style(
    value: &ParamValue,
    explode: bool,
    channel: Channel,
    enc: &dyn Fn(&str) -> String,
) -> String {
    let mut items: Vec<String> = Vec::new();
    let mut pair = |k: &str, v: &ParamValue| {
        let v = enc(&v.flat_string());
        if explode {
            items.push(format!("{}={}", enc(k), v));
        } else {
            items.push(enc(k));
            items.push(v);
        }
    };
    match value {
        ParamValue::Null => return String::new(),
        ParamValue::Scalar(s) => return enc(s),
        ParamValue::File(f) => return enc(&f.file_name),
        ParamValue::List(list) => {
            return list
                .iter()
                .filter(|v| v.is_set())
                .map(|v| enc(&v.flat_string()))
                .collect::<Vec<_>>()
                .join(",");
        }
        ParamValue::Map(entries) => {
            for (k, v) in entries.iter().filter(|(_, v)| v.is_set()) {
                pair(k, v);
            }
        }
        ParamValue::Object(fields) => {
            for f in fields
                .iter()
                .filter(|f| f.metadata.has(channel) && f.value.is_set())
            {
                pair(f.wire_name, &f.value);
            }
        }
    }
    items.join(",")
}

/// Form rule (`style=form` and the delimited styles).
///
/// Exploded objects and maps write each member under its own key; exploded
/// lists repeat `name`. Unexploded values collapse into one delimited entry.
pub(crate) fn populate_form(
    name: &str,
    explode: bool,
    value: &ParamValue,
    delimiter: &str,
    out: &mut FormValues,
) {
    match value {
        ParamValue::Null => {}
        ParamValue::Scalar(_) | ParamValue::File(_) => out.set(name, vec![value.flat_string()]),
        ParamValue::List(list) => {
            let items = list.iter().filter(|v| v.is_set());
            if explode {
                for v in items {
                    out.push(name, v.flat_string());
                }
            } else {
                let joined: Vec<String> = items.map(ParamValue::flat_string).collect();
                if !joined.is_empty() {
                    out.set(name, vec![joined.join(delimiter)]);
                }
            }
        }
        ParamValue::Map(entries) => {
            let members = entries
                .iter()
                .filter(|(_, v)| v.is_set())
                .map(|(k, v)| (k.as_str(), v));
            populate_members(name, explode, members, delimiter, out);
        }
        ParamValue::Object(fields) => {
            let members = fields
                .iter()
                .filter(|f| !f.wire_name.is_empty() && f.value.is_set())
                .map(|f| (f.wire_name, &f.value));
            populate_members(name, explode, members, delimiter, out);
        }
    }
}

fn populate_members<'a>(
    name: &str,
    explode: bool,
    members: impl Iterator<Item = (&'a str, &'a ParamValue)>,
    delimiter: &str,
    out: &mut FormValues,
) {
    let mut items = Vec::new();
    for (k, v) in members {
        if explode {
            out.set(k, vec![v.flat_string()]);
        } else {
            items.push(format!("{}{}{}", k, delimiter, v.flat_string()));
        }
    }
    if !items.is_empty() {
        out.set(name, vec![items.join(delimiter)]);
    }
}
