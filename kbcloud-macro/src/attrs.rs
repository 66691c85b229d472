use quote::ToTokens;
use syn::{
    Attribute, Expr, ExprLit, MetaNameValue,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token::Comma,
};

/// Arguments of `#[model(...)]` on a field or an enum variant.
#[derive(Default, Debug, PartialEq)]
pub(crate) struct ModelAttrs {
    /// JSON key or enum value used on the wire instead of the derived one.
    pub rename: Option<String>,
}

trait ExprInto<T> {
    fn expr_into(&self) -> Option<T>;
}

impl ExprInto<String> for Expr {
    fn expr_into(&self) -> Option<String> {
        if let Expr::Lit(ExprLit {
            attrs: _,
            lit: syn::Lit::Str(lit_str),
        }) = self
        {
            Some(lit_str.value())
        } else {
            None
        }
    }
}

impl Parse for ModelAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = Self::default();

        let kv_pairs = Punctuated::<MetaNameValue, Comma>::parse_terminated(input)?;

        for name_value in kv_pairs {
            let name = name_value.path.to_token_stream().to_string();

            match name.as_str() {
                "rename" => {
                    let rename: String = name_value.value.expr_into().ok_or(syn::Error::new(
                        name_value.span(),
                        "'rename' expects a string literal as argument",
                    ))?;
                    if rename.is_empty() {
                        return Err(syn::Error::new(
                            name_value.span(),
                            "'rename' must not be empty",
                        ));
                    }
                    attrs.rename = Some(rename);
                }
                _ => {
                    return Err(syn::Error::new(
                        name_value.span(),
                        format!("unknown parameter: {}", name),
                    ));
                }
            }
        }

        Ok(attrs)
    }
}

impl ModelAttrs {
    /// Merges every `#[model(...)]` attribute in `attrs`; later ones win.
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut merged = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
            let parsed: Self = attr.parse_args()?;
            if parsed.rename.is_some() {
                merged.rename = parsed.rename;
            }
        }
        Ok(merged)
    }
}
