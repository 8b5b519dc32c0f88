// wozway_macros/src/codegen.rs
use crate::parse::{
    EndpointAttr, FieldDef, FormAttr, MultipartAttr, ParamAttr, ParamsInput, RequestAttr,
    ResponseDef, SecurityAttr, option_inner,
};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Ident, LitStr, Result};

/// Body serialization picked from the declared media type.
#[derive(Debug, PartialEq, Eq)]
enum BodyMethod {
    Json,
    Form,
    Multipart,
    Raw,
    String,
}

fn body_method(media_type: &str) -> BodyMethod {
    let mt = media_type.trim().to_ascii_lowercase();
    let (ty, sub) = mt.split_once('/').unwrap_or((mt.as_str(), ""));
    if matches!(ty, "application" | "text") && sub.contains("json") {
        BodyMethod::Json
    } else if ty == "multipart" {
        BodyMethod::Multipart
    } else if mt.starts_with("application/x-www-form-urlencoded") {
        BodyMethod::Form
    } else if mt.starts_with("text/plain") {
        BodyMethod::String
    } else {
        BodyMethod::Raw
    }
}

pub fn emit(input: ParamsInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let (impl_g, ty_g, where_c) = input.generics.split_for_impl();

    let pushes = input
        .fields
        .iter()
        .filter(|f| !f.skip && f.request.is_none())
        .map(emit_field);
    let body_fn = match input.fields.iter().find(|f| f.request.is_some()) {
        Some(f) => emit_request_body(f)?,
        None => TokenStream2::new(),
    };
    let endpoint = match &input.endpoint {
        Some(ep) => emit_endpoint(name, &input.generics, ep)?,
        None => TokenStream2::new(),
    };

    Ok(quote! {
        impl #impl_g ::wozway_core::__private::Params for #name #ty_g #where_c {
            fn fields(
                &self,
            ) -> ::wozway_core::__private::Result<
                ::wozway_core::__private::Vec<::wozway_core::__private::Field>,
                ::wozway_core::__private::SdkError,
            > {
                #[allow(unused_imports)]
                use ::wozway_core::__private as __w;
                #[allow(unused_mut)]
                let mut __fields = __w::Vec::new();
                #(#pushes)*
                __w::Result::Ok(__fields)
            }

            #body_fn
        }

        impl #impl_g ::wozway_core::__private::ToParam for #name #ty_g #where_c {
            fn to_param(
                &self,
            ) -> ::wozway_core::__private::Result<
                ::wozway_core::__private::ParamValue,
                ::wozway_core::__private::SdkError,
            > {
                ::wozway_core::__private::Result::Ok(::wozway_core::__private::ParamValue::Object(
                    ::wozway_core::__private::Params::fields(self)?,
                ))
            }
        }

        #endpoint
    })
}

fn emit_field(f: &FieldDef) -> TokenStream2 {
    let ident = &f.ident;
    let name = LitStr::new(ident.to_string().trim_start_matches("r#"), ident.span());
    let wire = LitStr::new(&f.wire_name, ident.span());
    let value = if f.is_json() {
        quote! { __w::json_param(&self.#ident)? }
    } else {
        quote! { __w::ToParam::to_param(&self.#ident)? }
    };

    let path = opt(f.path.as_ref().map(emit_param));
    let query = opt(f.query.as_ref().map(emit_param));
    let header = opt(f.header.as_ref().map(emit_param));
    let security = opt(f.security.as_ref().map(emit_security));
    let form = opt(f.form.as_ref().map(emit_form));
    let multipart = opt(f.multipart.as_ref().map(emit_multipart));

    quote! {
        __fields.push(__w::Field {
            name: #name,
            wire_name: #wire,
            metadata: __w::FieldMetadata {
                security: #security,
                path: #path,
                query: #query,
                header: #header,
                request: ::core::option::Option::None,
                form: #form,
                multipart: #multipart,
            },
            value: #value,
        });
    }
}

fn opt(ts: Option<TokenStream2>) -> TokenStream2 {
    match ts {
        Some(ts) => quote! { ::core::option::Option::Some(#ts) },
        None => quote! { ::core::option::Option::None },
    }
}

fn style_variant(style: &str) -> Ident {
    let variant = match style {
        "form" => "Form",
        "deepObject" => "DeepObject",
        "pipeDelimited" => "PipeDelimited",
        "spaceDelimited" => "SpaceDelimited",
        _ => "Simple",
    };
    Ident::new(variant, Span::call_site())
}

fn emit_param(p: &ParamAttr) -> TokenStream2 {
    let style = style_variant(&p.style);
    let explode = p.explode;
    let serialization = if p.json {
        quote! { ::core::option::Option::Some(__w::Serialization::Json) }
    } else {
        quote! { ::core::option::Option::None }
    };
    quote! {
        __w::ParamMetadata {
            serialization: #serialization,
            style: __w::Style::#style,
            explode: #explode,
        }
    }
}

fn emit_security(s: &SecurityAttr) -> TokenStream2 {
    let option = s.option;
    let scheme = s.scheme;
    let scheme_type = opt(s.scheme_type.as_ref().map(|t| {
        let variant = match t.value().as_str() {
            "apiKey" => "ApiKey",
            "oauth2" => "OAuth2",
            "openIdConnect" => "OpenIdConnect",
            _ => "Http",
        };
        let variant = Ident::new(variant, t.span());
        quote! { __w::SchemeType::#variant }
    }));
    let sub_type = opt(s.sub_type.as_ref().map(|l| quote! { #l }));
    let field_name = opt(s.field_name.as_ref().map(|l| quote! { #l }));
    quote! {
        __w::SecurityMetadata {
            option: #option,
            scheme: #scheme,
            scheme_type: #scheme_type,
            sub_type: #sub_type,
            field_name: #field_name,
        }
    }
}

fn emit_form(f: &FormAttr) -> TokenStream2 {
    let style = style_variant(&f.style);
    let explode = f.explode;
    let json = f.json;
    quote! {
        __w::FormMetadata {
            json: #json,
            style: __w::Style::#style,
            explode: #explode,
        }
    }
}

fn emit_multipart(m: &MultipartAttr) -> TokenStream2 {
    let file = m.file;
    let json = m.json;
    quote! {
        __w::MultipartFormMetadata {
            file: #file,
            json: #json,
        }
    }
}

fn emit_request_body(f: &FieldDef) -> Result<TokenStream2> {
    let Some(RequestAttr {
        media_type,
        nullable,
    }) = f.request.as_ref()
    else {
        return Ok(TokenStream2::new());
    };
    let ident = &f.ident;
    let is_option = option_inner(&f.ty).is_some();

    let body = match body_method(&media_type.value()) {
        BodyMethod::Json if *nullable || !is_option => quote! {
            __w::Result::Ok(::core::option::Option::Some(
                __w::body::json(&self.#ident)?,
            ))
        },
        BodyMethod::Json => quote! {
            match &self.#ident {
                ::core::option::Option::Some(v) => __w::Result::Ok(::core::option::Option::Some(
                    __w::body::json(v)?,
                )),
                ::core::option::Option::None => __w::Result::Ok(::core::option::Option::None),
            }
        },
        BodyMethod::Form => quote! {
            let value = __w::ToParam::to_param(&self.#ident)?;
            if !value.is_set() {
                return __w::Result::Ok(::core::option::Option::None);
            }
            __w::Result::Ok(::core::option::Option::Some(
                __w::body::form(&value)?,
            ))
        },
        BodyMethod::Multipart => quote! {
            let value = __w::ToParam::to_param(&self.#ident)?;
            if !value.is_set() {
                return __w::Result::Ok(::core::option::Option::None);
            }
            __w::Result::Ok(::core::option::Option::Some(__w::body::multipart(&value)?))
        },
        BodyMethod::Raw | BodyMethod::String => {
            let encode = if body_method(&media_type.value()) == BodyMethod::Raw {
                quote! { __w::body::raw }
            } else {
                quote! { __w::body::string }
            };
            if is_option {
                quote! {
                    __w::Result::Ok(self.#ident.as_ref().map(|v| #encode(v)))
                }
            } else {
                quote! {
                    __w::Result::Ok(::core::option::Option::Some(
                        #encode(&self.#ident),
                    ))
                }
            }
        }
    };

    Ok(quote! {
        fn request_body(
            &self,
        ) -> ::wozway_core::__private::Result<
            ::core::option::Option<::wozway_core::__private::SerializedRequestBody>,
            ::wozway_core::__private::SdkError,
        > {
            use ::wozway_core::__private as __w;
            #body
        }
    })
}

fn emit_response(r: &ResponseDef) -> Result<TokenStream2> {
    let known = r.decoder.get_ident().map(|i| i.to_string());
    let decoder = match known.as_deref() {
        Some(k @ ("Json" | "Text" | "NoContent" | "Binary")) => {
            let id = Ident::new(k, Span::call_site());
            quote! { ::wozway_core::prelude::#id }
        }
        _ => {
            let p = &r.decoder;
            quote! { #p }
        }
    };
    let output = match (&r.output, known.as_deref()) {
        (Some(t), _) => quote! { #t },
        (None, Some("NoContent")) => quote! { () },
        (None, Some("Text")) => quote! { ::std::string::String },
        (None, Some("Binary")) => quote! { ::wozway_core::__private::Bytes },
        (None, _) => {
            return Err(syn::Error::new_spanned(
                &r.decoder,
                "response decoder needs an output type, e.g. `Json<T>`",
            ));
        }
    };
    Ok(quote! { ::wozway_core::__private::Decoded<#decoder, #output> })
}

fn emit_list(items: &[LitStr]) -> TokenStream2 {
    quote! { &[#(#items),*] }
}

fn emit_endpoint(name: &Ident, generics: &syn::Generics, ep: &EndpointAttr) -> Result<TokenStream2> {
    let (impl_g, ty_g, where_c) = generics.split_for_impl();
    let id = &ep.id;
    let method = &ep.method;
    let path = &ep.path;
    let response = emit_response(&ep.response)?;
    let scopes = ep.scopes.as_deref().map(|s| {
        let list = emit_list(s);
        quote! { const OAUTH2_SCOPES: &'static [&'static str] = #list; }
    });
    let success = ep.success_codes.as_deref().map(|s| {
        let list = emit_list(s);
        quote! { const SUCCESS_STATUS_CODES: &'static [&'static str] = #list; }
    });
    let errors = ep.error_codes.as_deref().map(|s| {
        let list = emit_list(s);
        quote! { const ERROR_STATUS_CODES: &'static [&'static str] = #list; }
    });

    Ok(quote! {
        impl #impl_g ::wozway_core::__private::Endpoint for #name #ty_g #where_c {
            const OPERATION_ID: &'static str = #id;
            const METHOD: ::wozway_core::__private::Method = ::wozway_core::__private::Method::#method;
            const PATH: &'static str = #path;
            #scopes
            #success
            #errors
            type Response = #response;
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn media_types_map_to_body_methods() {
        assert_eq!(body_method("application/json"), BodyMethod::Json);
        assert_eq!(body_method("application/merge-patch+json"), BodyMethod::Json);
        assert_eq!(body_method("text/json"), BodyMethod::Json);
        assert_eq!(body_method("multipart/form-data"), BodyMethod::Multipart);
        assert_eq!(
            body_method("application/x-www-form-urlencoded"),
            BodyMethod::Form
        );
        assert_eq!(body_method("text/plain; charset=utf-8"), BodyMethod::String);
        assert_eq!(body_method("image/png"), BodyMethod::Raw);
    }

    #[test]
    fn emits_endpoint_consts_only_when_given() {
        let input = crate::parse::parse_input(
            syn::parse_str(
                r#"
                #[wozway(endpoint(id = "ping", method = "head", path = "/ping"))]
                struct Ping {}
                "#,
            )
            .unwrap(),
        )
        .unwrap();
        let out = emit(input).unwrap().to_string();
        assert!(out.contains("OPERATION_ID"));
        assert!(out.contains("Method :: HEAD"));
        assert!(out.contains("NoContent"));
        assert!(!out.contains("ERROR_STATUS_CODES"));
    }
}
