use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;

use super::{
  documentation::Documentation,
  types::{TypeRenderer, parse_ident},
};
use crate::{
  generator::{
    error::RenderError,
    model::{FieldKind, NamedType},
  },
  naming::identifiers::{ensure_unique, to_rust_field_name},
};

/// Renders one named type as a serde struct or a type alias.
pub(crate) struct StructGenerator<'a> {
  types: &'a TypeRenderer<'a>,
}

impl<'a> StructGenerator<'a> {
  pub(crate) fn new(types: &'a TypeRenderer<'a>) -> Self {
    Self { types }
  }

  pub(crate) fn generate(&self, named: &NamedType) -> Result<TokenStream, RenderError> {
    let name = parse_ident(&named.name, &named.name)?;
    let docs = Documentation::from_optional(named.description.as_deref());

    if let Some(alias) = &named.alias {
      let target = self.types.field_type(&named.name, alias)?;
      return Ok(quote! {
        #docs
        pub type #name = #target;
      });
    }

    let mut used_names = BTreeSet::new();
    let mut fields = vec![];

    for child in named.children.iter().filter(|child| self.types.is_known(child)) {
      let field_name = ensure_unique(&to_rust_field_name(child), &used_names);
      used_names.insert(field_name.clone());

      let ident = parse_ident(&named.name, &field_name)?;
      let ty = self.types.field_type(&named.name, &FieldKind::Reference(child.clone()))?;
      fields.push(quote! {
        #[serde(flatten)]
        pub #ident: #ty
      });
    }

    for field in named.fields.values() {
      let field_name = ensure_unique(&to_rust_field_name(&field.key), &used_names);
      used_names.insert(field_name.clone());

      let ident = parse_ident(&named.name, &field_name)?;
      let ty = self.types.field_type(&named.name, &field.kind)?;
      let wire = &field.key;

      let field_tokens = if field.required {
        quote! {
          #[serde(rename = #wire)]
          pub #ident: #ty
        }
      } else {
        quote! {
          #[serde(rename = #wire, skip_serializing_if = "Option::is_none")]
          pub #ident: Option<#ty>
        }
      };
      fields.push(field_tokens);
    }

    Ok(quote! {
      #docs
      #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
      pub struct #name {
        #(#fields),*
      }
    })
  }
}
