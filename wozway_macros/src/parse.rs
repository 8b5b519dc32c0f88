// wozway_macros/src/parse.rs
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitBool, LitStr, PathArguments,
    Result, Type, bracketed, punctuated::Punctuated,
};

pub struct ParamsInput {
    pub ident: Ident,
    pub generics: syn::Generics,
    pub endpoint: Option<EndpointAttr>,
    pub fields: Vec<FieldDef>,
}

pub struct EndpointAttr {
    pub id: LitStr,
    pub method: Ident,
    pub path: LitStr,
    pub response: ResponseDef,
    pub scopes: Option<Vec<LitStr>>,
    pub success_codes: Option<Vec<LitStr>>,
    pub error_codes: Option<Vec<LitStr>>,
}

/// `response = Json<User>` splits into decoder `Json` and output `User`.
pub struct ResponseDef {
    pub decoder: syn::Path,
    pub output: Option<Type>,
}

pub struct FieldDef {
    pub ident: Ident,
    pub ty: Type,
    pub wire_name: String,
    pub skip: bool,
    pub path: Option<ParamAttr>,
    pub query: Option<ParamAttr>,
    pub header: Option<ParamAttr>,
    pub security: Option<SecurityAttr>,
    pub form: Option<FormAttr>,
    pub multipart: Option<MultipartAttr>,
    pub request: Option<RequestAttr>,
}

impl FieldDef {
    /// Any json-tagged channel turns the whole value into a JSON string.
    pub fn is_json(&self) -> bool {
        [&self.path, &self.query, &self.header]
            .into_iter()
            .flatten()
            .any(|p| p.json)
            || self.form.as_ref().is_some_and(|f| f.json)
            || self.multipart.as_ref().is_some_and(|m| m.json)
    }
}

#[derive(Clone, Copy)]
pub enum Channel {
    Path,
    Query,
    Header,
}

pub struct ParamAttr {
    pub style: String,
    pub explode: bool,
    pub json: bool,
}

impl ParamAttr {
    fn defaults(channel: Channel) -> Self {
        match channel {
            Channel::Path | Channel::Header => Self {
                style: "simple".into(),
                explode: false,
                json: false,
            },
            Channel::Query => Self {
                style: "form".into(),
                explode: true,
                json: false,
            },
        }
    }
}

#[derive(Default)]
pub struct SecurityAttr {
    pub option: bool,
    pub scheme: bool,
    pub scheme_type: Option<LitStr>,
    pub sub_type: Option<LitStr>,
    pub field_name: Option<LitStr>,
}

pub struct FormAttr {
    pub style: String,
    pub explode: bool,
    pub json: bool,
}

#[derive(Default)]
pub struct MultipartAttr {
    pub file: bool,
    pub json: bool,
}

pub struct RequestAttr {
    pub media_type: LitStr,
    pub nullable: bool,
}

const STYLES: &[&str] = &["simple", "form", "deepObject", "pipeDelimited", "spaceDelimited"];
const SCHEME_TYPES: &[&str] = &["apiKey", "http", "oauth2", "openIdConnect"];
const METHODS: &[&str] = &[
    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

pub fn parse_input(input: DeriveInput) -> Result<ParamsInput> {
    let fields = match input.data {
        Data::Struct(s) => match s.fields {
            Fields::Named(n) => n.named,
            Fields::Unit => Punctuated::new(),
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Params requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Params can only be derived for structs",
            ));
        }
    };

    let endpoint = parse_struct_attrs(&input.attrs)?;
    let mut defs = Vec::with_capacity(fields.len());
    for f in fields {
        let Some(ident) = f.ident.clone() else {
            return Err(syn::Error::new(f.span(), "unnamed field"));
        };
        defs.push(parse_field(ident, f.ty, &f.attrs)?);
    }

    let bodies: Vec<_> = defs.iter().filter(|f| f.request.is_some()).collect();
    if let Some(extra) = bodies.get(1) {
        return Err(syn::Error::new_spanned(
            &extra.ident,
            "only one field may be tagged `request`",
        ));
    }

    Ok(ParamsInput {
        ident: input.ident,
        generics: input.generics,
        endpoint,
        fields: defs,
    })
}

fn wozway_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("wozway"))
}

fn parse_struct_attrs(attrs: &[Attribute]) -> Result<Option<EndpointAttr>> {
    let mut endpoint = None;
    for attr in wozway_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("endpoint") {
                endpoint = Some(parse_endpoint(&meta)?);
                Ok(())
            } else {
                Err(meta.error("expected `endpoint(..)`"))
            }
        })?;
    }
    Ok(endpoint)
}

fn parse_endpoint(meta: &ParseNestedMeta<'_>) -> Result<EndpointAttr> {
    let mut id = None;
    let mut method: Option<LitStr> = None;
    let mut path = None;
    let mut response = None;
    let mut scopes = None;
    let mut success_codes = None;
    let mut error_codes = None;

    meta.parse_nested_meta(|m| {
        if m.path.is_ident("id") {
            id = Some(m.value()?.parse::<LitStr>()?);
        } else if m.path.is_ident("method") {
            method = Some(m.value()?.parse::<LitStr>()?);
        } else if m.path.is_ident("path") {
            path = Some(m.value()?.parse::<LitStr>()?);
        } else if m.path.is_ident("response") {
            response = Some(parse_response(m.value()?.parse::<Type>()?)?);
        } else if m.path.is_ident("scopes") {
            scopes = Some(parse_str_list(&m)?);
        } else if m.path.is_ident("success_codes") {
            success_codes = Some(parse_str_list(&m)?);
        } else if m.path.is_ident("error_codes") {
            error_codes = Some(parse_str_list(&m)?);
        } else {
            return Err(m.error("unknown endpoint key"));
        }
        Ok(())
    })?;

    let id = id.ok_or_else(|| meta.error("missing `id`"))?;
    let path = path.ok_or_else(|| meta.error("missing `path`"))?;
    let method_lit = method.ok_or_else(|| meta.error("missing `method`"))?;
    let upper = method_lit.value().to_ascii_uppercase();
    if !METHODS.contains(&upper.as_str()) {
        return Err(syn::Error::new(method_lit.span(), "unsupported HTTP method"));
    }
    let response = response.unwrap_or_else(|| ResponseDef {
        decoder: syn::parse_quote!(NoContent),
        output: None,
    });

    Ok(EndpointAttr {
        id,
        method: Ident::new(&upper, method_lit.span()),
        path,
        response,
        scopes,
        success_codes,
        error_codes,
    })
}

fn parse_response(ty: Type) -> Result<ResponseDef> {
    let tp = match ty {
        Type::Path(tp) => tp,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "expected a decoder type like `Json<T>`",
            ));
        }
    };
    let mut decoder = tp.path.clone();
    let Some(last) = decoder.segments.last_mut() else {
        return Err(syn::Error::new(tp.span(), "empty response type"));
    };
    let output = match std::mem::replace(&mut last.arguments, PathArguments::None) {
        PathArguments::None => None,
        PathArguments::AngleBracketed(args) => {
            let mut types = args.args.into_iter().filter_map(|a| match a {
                GenericArgument::Type(t) => Some(t),
                _ => None,
            });
            let first = types.next();
            if first.is_none() || types.next().is_some() {
                return Err(syn::Error::new(
                    tp.span(),
                    "decoder takes exactly one output type",
                ));
            }
            first
        }
        PathArguments::Parenthesized(p) => {
            return Err(syn::Error::new(p.span(), "unexpected parentheses"));
        }
    };
    Ok(ResponseDef { decoder, output })
}

fn parse_str_list(m: &ParseNestedMeta<'_>) -> Result<Vec<LitStr>> {
    let input = m.value()?;
    let content;
    bracketed!(content in input);
    let items = Punctuated::<LitStr, syn::Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().collect())
}

fn parse_bool(m: &ParseNestedMeta<'_>) -> Result<bool> {
    if m.input.peek(syn::Token![=]) {
        Ok(m.value()?.parse::<LitBool>()?.value)
    } else {
        Ok(true)
    }
}

fn parse_style(m: &ParseNestedMeta<'_>) -> Result<String> {
    let lit = m.value()?.parse::<LitStr>()?;
    let style = lit.value();
    if !STYLES.contains(&style.as_str()) {
        return Err(syn::Error::new(lit.span(), "unknown style"));
    }
    Ok(style)
}

fn parse_serialization(m: &ParseNestedMeta<'_>) -> Result<bool> {
    let lit = m.value()?.parse::<LitStr>()?;
    match lit.value().as_str() {
        "json" => Ok(true),
        _ => Err(syn::Error::new(lit.span(), "only `json` serialization is supported")),
    }
}

fn parse_param(meta: &ParseNestedMeta<'_>, channel: Channel) -> Result<ParamAttr> {
    let mut out = ParamAttr::defaults(channel);
    if meta.input.is_empty() || !meta.input.peek(syn::token::Paren) {
        return Ok(out);
    }
    meta.parse_nested_meta(|m| {
        if m.path.is_ident("style") {
            out.style = parse_style(&m)?;
        } else if m.path.is_ident("explode") {
            out.explode = parse_bool(&m)?;
        } else if m.path.is_ident("serialization") {
            out.json = parse_serialization(&m)?;
        } else {
            return Err(m.error("expected `style`, `explode` or `serialization`"));
        }
        Ok(())
    })?;
    Ok(out)
}

fn parse_security(meta: &ParseNestedMeta<'_>) -> Result<SecurityAttr> {
    let mut out = SecurityAttr::default();
    meta.parse_nested_meta(|m| {
        if m.path.is_ident("option") {
            out.option = parse_bool(&m)?;
        } else if m.path.is_ident("scheme") {
            out.scheme = parse_bool(&m)?;
        } else if m.path.is_ident("type") {
            let lit = m.value()?.parse::<LitStr>()?;
            if !SCHEME_TYPES.contains(&lit.value().as_str()) {
                return Err(syn::Error::new(lit.span(), "unknown security scheme type"));
            }
            out.scheme_type = Some(lit);
        } else if m.path.is_ident("sub_type") {
            out.sub_type = Some(m.value()?.parse::<LitStr>()?);
        } else if m.path.is_ident("field_name") {
            out.field_name = Some(m.value()?.parse::<LitStr>()?);
        } else {
            return Err(m.error("unknown security key"));
        }
        Ok(())
    })?;
    Ok(out)
}

fn parse_form(meta: &ParseNestedMeta<'_>) -> Result<FormAttr> {
    let mut out = FormAttr {
        style: "form".into(),
        explode: true,
        json: false,
    };
    if !meta.input.peek(syn::token::Paren) {
        return Ok(out);
    }
    meta.parse_nested_meta(|m| {
        if m.path.is_ident("style") {
            out.style = parse_style(&m)?;
        } else if m.path.is_ident("explode") {
            out.explode = parse_bool(&m)?;
        } else if m.path.is_ident("json") {
            out.json = parse_bool(&m)?;
        } else {
            return Err(m.error("expected `style`, `explode` or `json`"));
        }
        Ok(())
    })?;
    Ok(out)
}

fn parse_multipart(meta: &ParseNestedMeta<'_>) -> Result<MultipartAttr> {
    let mut out = MultipartAttr::default();
    if !meta.input.peek(syn::token::Paren) {
        return Ok(out);
    }
    meta.parse_nested_meta(|m| {
        if m.path.is_ident("file") {
            out.file = parse_bool(&m)?;
        } else if m.path.is_ident("json") {
            out.json = parse_bool(&m)?;
        } else {
            return Err(m.error("expected `file` or `json`"));
        }
        Ok(())
    })?;
    Ok(out)
}

fn parse_request(meta: &ParseNestedMeta<'_>) -> Result<RequestAttr> {
    let mut media_type = None;
    let mut nullable = false;
    meta.parse_nested_meta(|m| {
        if m.path.is_ident("media_type") {
            media_type = Some(m.value()?.parse::<LitStr>()?);
        } else if m.path.is_ident("nullable") {
            nullable = parse_bool(&m)?;
        } else {
            return Err(m.error("expected `media_type` or `nullable`"));
        }
        Ok(())
    })?;
    let media_type =
        media_type.unwrap_or_else(|| LitStr::new("application/octet-stream", meta.path.span()));
    Ok(RequestAttr {
        media_type,
        nullable,
    })
}

fn parse_field(ident: Ident, ty: Type, attrs: &[Attribute]) -> Result<FieldDef> {
    let mut def = FieldDef {
        wire_name: ident.to_string().trim_start_matches("r#").to_string(),
        ident,
        ty,
        skip: false,
        path: None,
        query: None,
        header: None,
        security: None,
        form: None,
        multipart: None,
        request: None,
    };

    for attr in wozway_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                def.skip = true;
            } else if meta.path.is_ident("name") {
                def.wire_name = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("path") {
                def.path = Some(parse_param(&meta, Channel::Path)?);
            } else if meta.path.is_ident("query") {
                def.query = Some(parse_param(&meta, Channel::Query)?);
            } else if meta.path.is_ident("header") {
                def.header = Some(parse_param(&meta, Channel::Header)?);
            } else if meta.path.is_ident("security") {
                def.security = Some(parse_security(&meta)?);
            } else if meta.path.is_ident("form") {
                def.form = Some(parse_form(&meta)?);
            } else if meta.path.is_ident("multipart") {
                def.multipart = Some(parse_multipart(&meta)?);
            } else if meta.path.is_ident("request") {
                def.request = Some(parse_request(&meta)?);
            } else {
                return Err(meta.error("unknown wozway field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(def)
}

/// `Option<T>` spelled as a plain path (`Option`, `std::option::Option`, ..).
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(tp) = ty else {
        return None;
    };
    if tp.qself.is_some() {
        return None;
    }
    let last = tp.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn input(src: &str) -> ParamsInput {
        parse_input(syn::parse_str(src).unwrap()).unwrap()
    }

    #[test]
    fn reads_channel_attrs_and_defaults() {
        let p = input(
            r#"
            struct R {
                #[wozway(path)]
                id: String,
                #[wozway(query(style = "deepObject", explode = false), name = "f")]
                filter: Option<u8>,
                #[wozway(header(serialization = "json"))]
                meta: Option<u8>,
                plain: u8,
            }
            "#,
        );
        let [id, filter, meta, plain] = &p.fields[..] else {
            panic!("expected 4 fields");
        };
        let path = id.path.as_ref().unwrap();
        assert_eq!((path.style.as_str(), path.explode), ("simple", false));
        let q = filter.query.as_ref().unwrap();
        assert_eq!((q.style.as_str(), q.explode), ("deepObject", false));
        assert_eq!(filter.wire_name, "f");
        assert!(meta.is_json());
        assert!(plain.path.is_none() && plain.query.is_none() && !plain.skip);
    }

    #[test]
    fn endpoint_response_is_split() {
        let p = input(
            r#"
            #[wozway(endpoint(id = "getUser", method = "get", path = "/u/{id}", response = Json<User>, error_codes = ["4XX"]))]
            struct R {}
            "#,
        );
        let ep = p.endpoint.unwrap();
        assert_eq!(ep.method.to_string(), "GET");
        assert!(ep.response.decoder.is_ident("Json"));
        assert!(ep.response.output.is_some());
        assert_eq!(ep.error_codes.unwrap().len(), 1);
        assert!(ep.scopes.is_none());
    }

    #[test]
    fn rejects_bad_style_and_two_bodies() {
        let bad: DeriveInput =
            syn::parse_str(r#"struct R { #[wozway(query(style = "matrix"))] a: u8 }"#).unwrap();
        assert!(parse_input(bad).is_err());

        let two: DeriveInput = syn::parse_str(
            r#"struct R {
                #[wozway(request(media_type = "application/json"))] a: u8,
                #[wozway(request(media_type = "application/json"))] b: u8,
            }"#,
        )
        .unwrap();
        assert!(parse_input(two).is_err());
    }

    #[test]
    fn detects_option_types() {
        let t: Type = syn::parse_str("Option<Vec<u8>>").unwrap();
        assert!(option_inner(&t).is_some());
        let t: Type = syn::parse_str("Vec<u8>").unwrap();
        assert!(option_inner(&t).is_none());
    }
}
