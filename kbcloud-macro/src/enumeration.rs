use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attrs::ModelAttrs;

pub(crate) fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "StringEnum cannot be derived for generic types",
        ));
    }
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "StringEnum can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "StringEnum needs at least one variant",
        ));
    }

    let mut variants = Vec::new();
    let mut values: Vec<String> = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "StringEnum variants cannot carry data",
            ));
        }
        let value = ModelAttrs::from_attributes(&variant.attrs)?
            .rename
            .unwrap_or_else(|| variant.ident.to_string());
        if values.contains(&value) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("duplicate value `{value}`"),
            ));
        }
        variants.push(&variant.ident);
        values.push(value);
    }

    let name = &input.ident;
    let name_str = name.to_string();

    Ok(quote! {
        impl #name {
            /// Every value the server is known to send.
            pub const ALLOWED_VALUES: &'static [&'static str] = &[#(#values),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(Self::#variants => #values,)*
                }
            }

            pub fn is_valid(value: &str) -> bool {
                Self::ALLOWED_VALUES.contains(&value)
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = ::kbcloud_common::InvalidEnumValue;

            fn from_str(value: &str) -> ::core::result::Result<Self, Self::Err> {
                match value {
                    #(#values => ::core::result::Result::Ok(Self::#variants),)*
                    _ => ::core::result::Result::Err(::kbcloud_common::InvalidEnumValue {
                        enum_name: #name_str,
                        value: value.to_owned(),
                    }),
                }
            }
        }

        impl ::core::fmt::Display for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for #name {
            fn serialize<__S: ::serde::Serializer>(
                &self,
                serializer: __S,
            ) -> ::core::result::Result<__S::Ok, __S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for #name {
            fn deserialize<__D: ::serde::Deserializer<'de>>(
                deserializer: __D,
            ) -> ::core::result::Result<Self, __D::Error> {
                let value = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                value
                    .parse()
                    .map_err(<__D::Error as ::serde::de::Error>::custom)
            }
        }

        impl ::kbcloud_common::Field for #name {
            type Shadow = ::std::string::String;

            fn from_shadow(shadow: Self::Shadow) -> ::core::option::Option<Self> {
                shadow.parse().ok()
            }

            fn to_value(&self) -> ::core::result::Result<::serde_json::Value, ::serde_json::Error> {
                ::core::result::Result::Ok(::serde_json::Value::String(self.as_str().to_owned()))
            }
        }
    })
}
