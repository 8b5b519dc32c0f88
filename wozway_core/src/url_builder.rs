use crate::error::SdkError;
use crate::globals::{Globals, resolve_fields};
use crate::metadata::Channel;
use crate::params::Field;
use crate::serialize::path::get_path_params;

/// `server_url` (trailing `/` removed) joined with `path`, its `{name}`
/// placeholders filled from the path-tagged fields.
pub fn generate_url(
    server_url: &str,
    path: &str,
    fields: &[Field],
    globals: Option<&Globals>,
) -> Result<String, SdkError> {
    let path_fields = resolve_fields(fields, globals, Channel::Path);
    let mut path = path.to_string();
    for (name, value) in get_path_params(&path_fields)? {
        path = path.replacen(&format!("{{{}}}", name), &value, 1);
    }
    Ok(format!("{}{}", remove_suffix(server_url, "/"), path))
}

/// Replaces every `{key}` occurrence.
pub fn template_url<'a, I>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = url.to_string();
    for (k, v) in params {
        out = out.replace(&format!("{{{}}}", k), v);
    }
    out
}

pub fn remove_suffix<'a>(s: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return s;
    }
    s.strip_suffix(suffix).unwrap_or(s)
}
