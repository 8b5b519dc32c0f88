use proc_macro::TokenStream;

mod codegen;
mod parse;

/// Derives `Params` and `ToParam` from `#[wozway(..)]` field attributes, plus
/// `Endpoint` when the struct carries `#[wozway(endpoint(..))]`.
#[proc_macro_derive(Params, attributes(wozway))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    match parse::parse_input(input).and_then(codegen::emit) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
