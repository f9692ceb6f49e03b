//! Procedural macros for bookworm

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<syn::Field>,

    /// Forward `name()` to the single field, itself an `Action`
    #[darling(default)]
    flatten: bool,
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method that returns the variant name as a static string.
///
/// A single-field tuple variant marked `#[action(flatten)]` wraps a nested
/// action enum; its name is the nested action's name.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum UserAction {
///     IncreaseLives,
///     SelectInterest(String),
/// }
///
/// #[derive(Action, Clone, Debug)]
/// enum AppAction {
///     Loading,
///     #[action(flatten)]
///     User(UserAction),
/// }
///
/// assert_eq!(AppAction::Loading.name(), "Loading");
/// assert_eq!(AppAction::User(UserAction::IncreaseLives).name(), "IncreaseLives");
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut name_arms = Vec::with_capacity(variants.len());
    for v in variants.iter() {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();

        if v.flatten {
            if !matches!(v.fields.style, darling::ast::Style::Tuple) || v.fields.len() != 1 {
                return syn::Error::new_spanned(
                    variant_name,
                    "#[action(flatten)] requires a tuple variant with exactly one field",
                )
                .to_compile_error()
                .into();
            }
            name_arms.push(quote! {
                #name::#variant_name(inner) => bookworm::Action::name(inner)
            });
            continue;
        }

        name_arms.push(match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        });
    }

    let expanded = quote! {
        impl bookworm::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Container-level attributes for #[derive(EnumToken)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(token), supports(enum_unit))]
struct TokenOpts {
    ident: syn::Ident,
    data: darling::ast::Data<TokenVariant, ()>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(token))]
struct TokenVariant {
    ident: syn::Ident,

    /// Explicit token instead of the lowercased variant name
    #[darling(default)]
    rename: Option<String>,
}

/// Derive macro for the EnumToken trait
///
/// Builds the static token table for a unit-only enum. Each token is the
/// lowercased variant name unless overridden with `#[token(rename = "...")]`.
/// Tokens that collide ignoring case are rejected at compile time.
///
/// # Example
/// ```ignore
/// #[derive(EnumToken, Clone, Copy, Debug, PartialEq)]
/// enum ChapterType {
///     Challenge,
///     Read,
///     Mixed,
/// }
///
/// assert_eq!(ChapterType::from_token("READ"), Some(ChapterType::Read));
/// assert_eq!(ChapterType::Mixed.token(), "mixed");
/// ```
#[proc_macro_derive(EnumToken, attributes(token))]
pub fn derive_enum_token(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match TokenOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let type_name = name.to_string();

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "EnumToken can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut seen: HashMap<String, &syn::Ident> = HashMap::new();
    let mut idents = Vec::with_capacity(variants.len());
    let mut tokens = Vec::with_capacity(variants.len());

    for v in variants.iter() {
        let token = match &v.rename {
            Some(rename) if rename.is_empty() => {
                return syn::Error::new_spanned(&v.ident, "token rename must not be empty")
                    .to_compile_error()
                    .into();
            }
            Some(rename) => rename.to_lowercase(),
            None => v.ident.to_string().to_lowercase(),
        };

        if let Some(previous) = seen.insert(token.clone(), &v.ident) {
            let message = format!("token `{}` is already used by `{}`", token, previous);
            return syn::Error::new_spanned(&v.ident, message)
                .to_compile_error()
                .into();
        }

        idents.push(&v.ident);
        tokens.push(token);
    }

    let expanded = quote! {
        impl bookworm::EnumToken for #name {
            const TYPE_NAME: &'static str = #type_name;

            fn tokens() -> &'static [(&'static str, Self)] {
                static TOKENS: &[(&str, #name)] = &[#((#tokens, #name::#idents)),*];
                TOKENS
            }

            fn token(&self) -> &'static str {
                match self {
                    #(#name::#idents => #tokens),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
