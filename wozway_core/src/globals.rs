use crate::error::SdkError;
use crate::metadata::Channel;
use crate::params::{Field, Params};

/// Client-level default values for path, query and header params.
///
/// Matched against request fields by Rust field name and channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Globals {
    fields: Vec<Field>,
}

impl Globals {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params<P: Params + ?Sized>(params: &P) -> Result<Self, SdkError> {
        Ok(Self {
            fields: params.fields()?,
        })
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Request fields tagged for `channel`, globals folded in.
    ///
    /// - an unset request field takes the value of the global with the same name;
    /// - a request field shadows the same-named global even when both are unset;
    /// - remaining globals tagged for `channel` are appended.
    pub fn resolve(&self, fields: &[Field], channel: Channel) -> Vec<Field> {
        let mut out = Vec::new();
        let mut shadowed: Vec<&'static str> = Vec::new();
        for f in fields.iter().filter(|f| f.metadata.has(channel)) {
            let mut f = f.clone();
            if let Some(g) = self.fields.iter().find(|g| g.name == f.name) {
                shadowed.push(g.name);
                if !f.value.is_set() && g.metadata.has(channel) {
                    f.value = g.value.clone();
                }
            }
            out.push(f);
        }
        out.extend(
            self.fields
                .iter()
                .filter(|g| g.metadata.has(channel) && !shadowed.contains(&g.name))
                .cloned(),
        );
        out
    }
}

/// `fields` for `channel`, resolved against `globals` when there are any.
pub fn resolve_fields(fields: &[Field], globals: Option<&Globals>, channel: Channel) -> Vec<Field> {
    match globals {
        Some(g) => g.resolve(fields, channel),
        None => fields
            .iter()
            .filter(|f| f.metadata.has(channel))
            .cloned()
            .collect(),
    }
}
