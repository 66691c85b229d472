use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{
    Data, DataStruct, DeriveInput, Fields, GenericArgument, PathArguments, Type, TypePath,
    ext::IdentExt,
};

use crate::attrs::ModelAttrs;
use crate::translate::field_to_wire_name;

const ADDITIONAL_PROPERTIES: &str = "additional_properties";

struct ModelField {
    ident: Ident,
    /// The declared type, without the `Option` of an optional field.
    ty: Type,
    required: bool,
    wire_name: String,
}

impl ModelField {
    fn method(&self, prefix: &str, suffix: &str) -> Ident {
        format_ident!("{}{}{}", prefix, self.ident.unraw(), suffix)
    }
}

/// `T` if `ty` is `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<ModelField>> {
    let Data::Struct(DataStruct {
        fields: Fields::Named(named),
        ..
    }) = &input.data
    else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Model can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();
    let mut has_additional = false;
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        if ident == ADDITIONAL_PROPERTIES {
            has_additional = true;
            continue;
        }
        let attrs = ModelAttrs::from_attributes(&field.attrs)?;
        let (ty, required) = match option_inner(&field.ty) {
            Some(inner) => (inner.clone(), false),
            None => (field.ty.clone(), true),
        };
        let wire_name = attrs
            .rename
            .unwrap_or_else(|| field_to_wire_name(&ident.unraw().to_string()));
        if let Some(other) = fields.iter().find(|f: &&ModelField| f.wire_name == wire_name) {
            return Err(syn::Error::new_spanned(
                &field.ident,
                format!("`{}` is sent as `{wire_name}` too", other.ident),
            ));
        }
        fields.push(ModelField {
            ident,
            ty,
            required,
            wire_name,
        });
    }

    if !has_additional {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "a Model needs an `additional_properties: AdditionalProperties` field",
        ));
    }
    Ok(fields)
}

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic types",
        ));
    }
    let fields = collect_fields(&input)?;
    let name = &input.ident;

    let model_impl = model_impl(name, &fields);
    let accessors = accessors(&fields);
    Ok(quote! {
        #model_impl

        impl ::serde::Serialize for #name {
            fn serialize<__S: ::serde::Serializer>(
                &self,
                serializer: __S,
            ) -> ::core::result::Result<__S::Ok, __S::Error> {
                let object = ::kbcloud_common::Model::to_object(self)
                    .map_err(<__S::Error as ::serde::ser::Error>::custom)?;
                ::serde::Serialize::serialize(&object, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for #name {
            fn deserialize<__D: ::serde::Deserializer<'de>>(
                deserializer: __D,
            ) -> ::core::result::Result<Self, __D::Error> {
                <::kbcloud_common::Decoded<Self> as ::serde::Deserialize>::deserialize(deserializer)?
                    .into_valid()
                    .map_err(<__D::Error as ::serde::de::Error>::custom)
            }
        }

        impl ::kbcloud_common::Field for #name {
            type Shadow = ::kbcloud_common::Decoded<Self>;

            fn from_shadow(shadow: Self::Shadow) -> ::core::option::Option<Self> {
                shadow.ok()
            }

            fn to_value(&self) -> ::core::result::Result<::serde_json::Value, ::serde_json::Error> {
                ::kbcloud_common::Model::to_object(self).map(::serde_json::Value::Object)
            }
        }

        impl #name {
            #accessors
        }
    })
}

fn model_impl(name: &Ident, fields: &[ModelField]) -> TokenStream {
    let name_str = name.to_string();
    let wire_names = fields.iter().map(|f| &f.wire_name);

    let shadow_fields = fields.iter().map(|f| {
        let ModelField {
            ident,
            ty,
            wire_name,
            ..
        } = f;
        quote! {
            #[serde(rename = #wire_name, default)]
            #ident: ::core::option::Option<<#ty as ::kbcloud_common::Field>::Shadow>
        }
    });

    let require = fields.iter().filter(|f| f.required).map(|f| {
        let ModelField {
            ident, wire_name, ..
        } = f;
        quote! {
            let #ident = ::kbcloud_common::model::require::<Self, _>(__shadow.#ident, #wire_name)?;
        }
    });

    let validate = fields.iter().map(|f| {
        let ModelField { ident, ty, .. } = f;
        let reason = format!("invalid value for {}", f.wire_name);
        let checked = if f.required {
            quote!(<#ty as ::kbcloud_common::Field>::from_shadow(#ident))
        } else {
            quote!(::kbcloud_common::model::accept_optional::<#ty>(__shadow.#ident))
        };
        quote! {
            let ::core::option::Option::Some(#ident) = #checked else {
                return ::core::result::Result::Ok(
                    ::kbcloud_common::model::unparsed::<Self>(__object, &#reason),
                );
            };
        }
    });

    let idents = fields.iter().map(|f| &f.ident);

    let write = fields.iter().map(|f| {
        let ModelField {
            ident, wire_name, ..
        } = f;
        if f.required {
            quote!(__writer.required(#wire_name, &self.#ident)?;)
        } else {
            quote!(__writer.optional(#wire_name, self.#ident.as_ref())?;)
        }
    });

    quote! {
        impl ::kbcloud_common::Model for #name {
            const NAME: &'static str = #name_str;
            const FIELDS: &'static [&'static str] = &[#(#wire_names),*];

            fn from_object(
                __object: ::kbcloud_common::UnparsedObject,
            ) -> ::core::result::Result<::kbcloud_common::Decoded<Self>, ::kbcloud_common::DecodeError> {
                #[derive(::serde::Deserialize)]
                struct __Shadow {
                    #(#shadow_fields,)*
                }

                let __shadow: __Shadow = match ::serde_json::from_value(
                    ::serde_json::Value::Object(__object.clone()),
                ) {
                    ::core::result::Result::Ok(shadow) => shadow,
                    ::core::result::Result::Err(err) => {
                        return ::core::result::Result::Ok(
                            ::kbcloud_common::model::unparsed::<Self>(__object, &err),
                        );
                    }
                };
                #(#require)*

                let additional_properties = ::kbcloud_common::model::additional_properties(
                    &__object,
                    <Self as ::kbcloud_common::Model>::FIELDS,
                );
                #(#validate)*

                ::core::result::Result::Ok(::kbcloud_common::Decoded::Valid(Self {
                    #(#idents,)*
                    additional_properties,
                }))
            }

            fn to_object(
                &self,
            ) -> ::core::result::Result<::kbcloud_common::UnparsedObject, ::serde_json::Error> {
                let mut __writer = ::kbcloud_common::model::ObjectWriter::new();
                #(#write)*
                ::core::result::Result::Ok(__writer.finish(&self.additional_properties))
            }
        }
    }
}

fn accessors(fields: &[ModelField]) -> TokenStream {
    let (required, optional): (Vec<_>, Vec<_>) = fields.iter().partition(|f| f.required);
    let params = required.iter().map(|f| {
        let ModelField { ident, ty, .. } = f;
        quote!(#ident: #ty)
    });
    let required_idents = required.iter().map(|f| &f.ident);
    let optional_idents = optional.iter().map(|f| &f.ident);

    let methods = fields.iter().map(|f| {
        let ModelField {
            ident,
            ty,
            wire_name,
            ..
        } = f;
        let set = f.method("set_", "");
        let with = f.method("with_", "");
        if f.required {
            let get_doc = format!("Returns the `{wire_name}` field.");
            quote! {
                #[doc = #get_doc]
                pub fn #ident(&self) -> &#ty {
                    &self.#ident
                }

                pub fn #set(&mut self, value: #ty) {
                    self.#ident = value;
                }

                pub fn #with(mut self, value: #ty) -> Self {
                    self.#ident = value;
                    self
                }
            }
        } else {
            let get_doc = format!("Returns the `{wire_name}` field if it is set.");
            let or_default = f.method("", "_or_default");
            let has = f.method("has_", "");
            let unset = f.method("unset_", "");
            quote! {
                #[doc = #get_doc]
                pub fn #ident(&self) -> ::core::option::Option<&#ty> {
                    self.#ident.as_ref()
                }

                pub fn #or_default(&self) -> #ty {
                    self.#ident.clone().unwrap_or_default()
                }

                pub fn #has(&self) -> bool {
                    self.#ident.is_some()
                }

                pub fn #set(&mut self, value: #ty) {
                    self.#ident = ::core::option::Option::Some(value);
                }

                pub fn #with(mut self, value: #ty) -> Self {
                    self.#ident = ::core::option::Option::Some(value);
                    self
                }

                pub fn #unset(&mut self) {
                    self.#ident = ::core::option::Option::None;
                }
            }
        }
    });

    quote! {
        #[allow(clippy::too_many_arguments)]
        pub fn new(#(#params),*) -> Self {
            Self {
                #(#required_idents,)*
                #(#optional_idents: ::core::option::Option::None,)*
                additional_properties: ::core::default::Default::default(),
            }
        }

        #(#methods)*
    }
}

#[cfg(test)]
mod tests {
    use syn::{ImplItem, Item, parse_quote};
    use test_log::test;

    use super::*;

    fn method_names(file: &syn::File) -> Vec<String> {
        file.items
            .iter()
            .filter_map(|item| match item {
                Item::Impl(item) if item.trait_.is_none() => Some(item),
                _ => None,
            })
            .flat_map(|item| item.items.iter())
            .filter_map(|item| match item {
                ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_expand_backup_like_struct() {
        let input: DeriveInput = parse_quote! {
            pub struct Repo {
                name: String,
                storage_provider: String,
                #[model(rename = "default")]
                is_default: Option<bool>,
                r#type: Option<String>,
                pub additional_properties: AdditionalProperties,
            }
        };
        let out = expand(input).unwrap();
        let file: syn::File = syn::parse2(out.clone()).unwrap();

        let names = method_names(&file);
        for expected in [
            "new",
            "name",
            "set_name",
            "with_name",
            "storage_provider",
            "is_default",
            "is_default_or_default",
            "has_is_default",
            "unset_is_default",
            "r#type",
            "has_type",
            "set_type",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected} in {names:?}");
        }
        assert!(!names.iter().any(|n| n == "has_name"));

        let text = out.to_string();
        assert!(text.contains("\"storageProvider\""));
        assert!(text.contains("\"default\""));
        assert!(text.contains("\"type\""));
        assert!(!text.contains("\"isDefault\""));
    }

    #[test]
    fn test_option_detection() {
        let ty: Type = parse_quote!(Option<Vec<String>>);
        let inner: Type = parse_quote!(Vec<String>);
        assert_eq!(option_inner(&ty), Some(&inner));

        let ty: Type = parse_quote!(::core::option::Option<i64>);
        assert!(option_inner(&ty).is_some());

        let ty: Type = parse_quote!(Vec<Option<i64>>);
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_rejects_unsupported_input() {
        let generic: DeriveInput = parse_quote! {
            struct Page<T> { items: Vec<T>, additional_properties: AdditionalProperties }
        };
        expand(generic).unwrap_err();

        let tuple: DeriveInput = parse_quote!(struct Pair(String, String););
        expand(tuple).unwrap_err();

        let no_additional: DeriveInput = parse_quote!(struct Bare { name: String });
        expand(no_additional).unwrap_err();

        let duplicate: DeriveInput = parse_quote! {
            struct Twice {
                page_size: i32,
                #[model(rename = "pageSize")]
                size: i32,
                additional_properties: AdditionalProperties,
            }
        };
        let err = expand(duplicate).unwrap_err();
        assert!(err.to_string().contains("pageSize"));
    }
}
