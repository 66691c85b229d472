//! Derives for KB Cloud wire types.
//!
//! `#[derive(Model)]` implements `kbcloud_common::Model` for a struct with
//! named fields: a tolerant two-pass decoder, an encoder that keeps
//! unknown keys, and an accessor, presence check and mutator per field.
//! Fields of type `Option<T>` are optional, all others are required. The
//! struct must declare `pub additional_properties: AdditionalProperties`.
//! JSON keys are the camelCase field names unless
//! `#[model(rename = "...")]` says otherwise.
//!
//! `#[derive(StringEnum)]` turns an enum of unit variants into a string
//! enum with a closed set of values. Unknown values fail to parse; inside
//! a model they make the model fall back to its unparsed form.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod enumeration;
mod model;
mod translate;

#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match model::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[proc_macro_derive(StringEnum, attributes(model))]
pub fn derive_string_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match enumeration::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
