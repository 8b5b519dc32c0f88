//! Per-field serialization tags.
//!
//! These are normally produced by `#[derive(Params)]` from `#[wozway(..)]`
//! attributes, but they are plain data and can be built by hand.

use core::fmt;

/// OpenAPI parameter style.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Style {
    Simple,
    Form,
    DeepObject,
    PipeDelimited,
    SpaceDelimited,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Simple => "simple",
            Style::Form => "form",
            Style::DeepObject => "deepObject",
            Style::PipeDelimited => "pipeDelimited",
            Style::SpaceDelimited => "spaceDelimited",
        }
    }

    pub fn parse(s: &str) -> Option<Style> {
        match s {
            "simple" => Some(Style::Simple),
            "form" => Some(Style::Form),
            "deepObject" => Some(Style::DeepObject),
            "pipeDelimited" => Some(Style::PipeDelimited),
            "spaceDelimited" => Some(Style::SpaceDelimited),
            _ => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-value serialization that bypasses the style rules.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Serialization {
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SchemeType {
    ApiKey,
    Http,
    OAuth2,
    OpenIdConnect,
}

impl SchemeType {
    pub fn parse(s: &str) -> Option<SchemeType> {
        match s {
            "apiKey" => Some(SchemeType::ApiKey),
            "http" => Some(SchemeType::Http),
            "oauth2" => Some(SchemeType::OAuth2),
            "openIdConnect" => Some(SchemeType::OpenIdConnect),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SecurityMetadata {
    /// Field is one alternative of a security requirement (an object of schemes).
    pub option: bool,
    /// Field is a security scheme.
    pub scheme: bool,
    pub scheme_type: Option<SchemeType>,
    pub sub_type: Option<&'static str>,
    pub field_name: Option<&'static str>,
}

impl SecurityMetadata {
    #[inline]
    pub fn field_name_or<'a>(&self, default: &'a str) -> &'a str {
        self.field_name.map_or(default, |n| n)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamMetadata {
    pub serialization: Option<Serialization>,
    pub style: Style,
    pub explode: bool,
}

impl ParamMetadata {
    pub const fn path() -> Self {
        Self {
            serialization: None,
            style: Style::Simple,
            explode: false,
        }
    }

    pub const fn query() -> Self {
        Self {
            serialization: None,
            style: Style::Form,
            explode: true,
        }
    }

    pub const fn header() -> Self {
        Self {
            serialization: None,
            style: Style::Simple,
            explode: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestMetadata {
    pub media_type: &'static str,
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self {
            media_type: "application/octet-stream",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartFormMetadata {
    pub file: bool,
    pub json: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormMetadata {
    pub json: bool,
    pub style: Style,
    pub explode: bool,
}

impl Default for FormMetadata {
    fn default() -> Self {
        Self {
            json: false,
            style: Style::Form,
            explode: true,
        }
    }
}

/// Parameter channels that share the style/explode rule set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    Path,
    Query,
    Header,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Path => "path",
            Channel::Query => "query",
            Channel::Header => "header",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMetadata {
    pub security: Option<SecurityMetadata>,
    pub path: Option<ParamMetadata>,
    pub query: Option<ParamMetadata>,
    pub header: Option<ParamMetadata>,
    pub request: Option<RequestMetadata>,
    pub form: Option<FormMetadata>,
    pub multipart: Option<MultipartFormMetadata>,
}

impl FieldMetadata {
    pub fn param(&self, channel: Channel) -> Option<&ParamMetadata> {
        match channel {
            Channel::Path => self.path.as_ref(),
            Channel::Query => self.query.as_ref(),
            Channel::Header => self.header.as_ref(),
        }
    }

    pub fn has(&self, channel: Channel) -> bool {
        self.param(channel).is_some()
    }
}
