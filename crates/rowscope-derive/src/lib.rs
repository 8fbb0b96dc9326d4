//! Rowscope Derive Macros: Page-Object Components
//!
//! `#[derive(Component)]` writes the `from_scope` constructor for a
//! page-object struct, so a row type is declared by its layout alone:
//!
//! ```ignore
//! use rowscope::{Component, Element, Scope};
//!
//! #[derive(Component)]
//! struct OrderRow<D> {
//!     #[rowscope(scope)]
//!     scope: Scope<D>,
//!
//!     #[rowscope(css = "td.total")]
//!     total: Element<D>,
//!
//!     #[rowscope(css = "td.status")]
//!     status: Element<D>,
//! }
//! ```
//!
//! # Field Attributes
//!
//! - `#[rowscope(scope)]` - exactly one field of type `Scope<D>`; it receives
//!   the scope the component is built from, and `D` is taken from its type
//! - `#[rowscope(css = "...")]` - child component built from
//!   `scope.child_css("...")`; construction errors propagate
//! - no attribute - initialized with `Default::default()`

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Field, Fields, GenericArgument, Ident,
    LitStr, PathArguments, Type,
};

/// Derive `rowscope::Component` for a struct with named fields.
///
/// See the crate documentation for the field attributes.
#[proc_macro_derive(Component, attributes(rowscope))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// ============================================================================
// Expansion
// ============================================================================

/// How a field is initialized in the generated constructor
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldRole {
    Scope,
    Child(String),
    Default,
}

fn expand_component(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = named_fields(input)?;

    let mut scope_field: Option<(&Ident, Type)> = None;
    let mut children = Vec::new();
    let mut defaults = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

        match field_role(field)? {
            FieldRole::Scope => {
                if scope_field.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "only one field may be marked #[rowscope(scope)]",
                    ));
                }
                scope_field = Some((ident, scope_driver(&field.ty)?));
            }
            FieldRole::Child(css) => children.push((ident, &field.ty, css)),
            FieldRole::Default => defaults.push((ident, &field.ty)),
        }
    }

    let (scope_ident, driver) = scope_field.ok_or_else(|| {
        syn::Error::new_spanned(
            name,
            "#[derive(Component)] requires one field marked #[rowscope(scope)]",
        )
    })?;

    let mut generics = input.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for (_, ty, _) in &children {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::rowscope::Component<#driver>));
        }
        for (_, ty) in &defaults {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::core::default::Default));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let child_inits = children.iter().map(|(ident, ty, css)| {
        quote! {
            #ident: <#ty as ::rowscope::Component<#driver>>::from_scope(
                ::rowscope::Scope::child_css(&scope, #css),
            )?
        }
    });
    let default_inits = defaults.iter().map(|(ident, _)| {
        quote! { #ident: ::core::default::Default::default() }
    });

    Ok(quote! {
        impl #impl_generics ::rowscope::Component<#driver> for #name #ty_generics #where_clause {
            fn from_scope(
                scope: ::rowscope::Scope<#driver>,
            ) -> ::core::result::Result<Self, ::rowscope::BoxError> {
                ::core::result::Result::Ok(Self {
                    #(#child_inits,)*
                    #(#default_inits,)*
                    #scope_ident: scope,
                })
            }

            fn scope(&self) -> &::rowscope::Scope<#driver> {
                &self.#scope_ident
            }
        }
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Named fields of a struct, or a spanned error for any other input
fn named_fields(input: &DeriveInput) -> syn::Result<impl Iterator<Item = &Field>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields.named.iter()),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Component)] requires a struct with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Component)] only supports structs",
        )),
    }
}

/// Parse `#[rowscope(...)]` attributes on a field
fn field_role(field: &Field) -> syn::Result<FieldRole> {
    let mut role = FieldRole::Default;

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("rowscope")) {
        attr.parse_nested_meta(|meta| {
            let parsed = if meta.path.is_ident("scope") {
                FieldRole::Scope
            } else if meta.path.is_ident("css") {
                let css: LitStr = meta.value()?.parse()?;
                if css.value().trim().is_empty() {
                    return Err(meta.error("css selector must not be empty"));
                }
                FieldRole::Child(css.value())
            } else {
                return Err(meta.error("expected `scope` or `css = \"...\"`"));
            };

            if role != FieldRole::Default {
                return Err(meta.error("conflicting rowscope attributes on one field"));
            }
            role = parsed;
            Ok(())
        })?;
    }

    Ok(role)
}

/// Driver type `D` of a `Scope<D>` field type
fn scope_driver(ty: &Type) -> syn::Result<Type> {
    let error = || syn::Error::new_spanned(ty, "#[rowscope(scope)] field must have type Scope<D>");

    let Type::Path(path) = ty else {
        return Err(error());
    };
    let segment = path.path.segments.last().ok_or_else(error)?;
    if segment.ident != "Scope" {
        return Err(error());
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Err(error());
    };

    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(driver), None) => Ok(driver.clone()),
        _ => Err(error()),
    }
}
