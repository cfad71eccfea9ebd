use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};
use strum::Display;

use crate::generator::model::ScalarKind;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RouteParseError {
  #[strum(to_string = "unclosed '{{' at position {position} in route '{route}'")]
  UnclosedBrace { route: String, position: usize },
  #[strum(to_string = "empty parameter '{{}}' in route '{route}'")]
  EmptyParameter { route: String },
  #[strum(to_string = "unmatched '}}' at position {position} in route '{route}'")]
  UnmatchedClosingBrace { route: String, position: usize },
  #[strum(to_string = "nested '{{' at position {position} in route '{route}'")]
  NestedBraces { route: String, position: usize },
  #[strum(to_string = "placeholder '{{{name}}}' in route '{route}' has no path parameter")]
  UndeclaredParameter { route: String, name: String },
}

impl std::error::Error for RouteParseError {}

/// Placeholder names of a route template, in order of appearance.
///
/// Malformed braces are skipped; [`RouteExpr::parse`] reports them.
pub(crate) fn template_params(route: &str) -> impl Iterator<Item = &str> {
  TemplateParamIter { rest: route }
}

struct TemplateParamIter<'a> {
  rest: &'a str,
}

impl<'a> Iterator for TemplateParamIter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    let open_pos = self.rest.find('{')?;
    let after_open = &self.rest[open_pos + 1..];
    let close_pos = after_open.find('}')?;
    let param = &after_open[..close_pos];
    self.rest = &after_open[close_pos + 1..];

    if param.is_empty() { self.next() } else { Some(param) }
  }
}

/// A path argument bound to a placeholder.
#[derive(Debug, Clone)]
pub(crate) struct RouteParam<'a> {
  pub key: &'a str,
  pub ident: Ident,
  pub kind: ScalarKind,
}

/// Converts one path argument into a `&str` usable inside a concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stringify {
  Display(Ident),
  WidenInt(Ident),
  Date(Ident),
  DateTime(Ident),
  Boolean(Ident),
  Passthrough(Ident),
}

impl Stringify {
  pub(crate) fn new(ident: Ident, kind: ScalarKind) -> Self {
    match kind {
      ScalarKind::Int64 | ScalarKind::Double | ScalarKind::Float => Self::Display(ident),
      ScalarKind::Int32 => Self::WidenInt(ident),
      ScalarKind::Date => Self::Date(ident),
      ScalarKind::DateTime => Self::DateTime(ident),
      ScalarKind::Boolean => Self::Boolean(ident),
      ScalarKind::String => Self::Passthrough(ident),
    }
  }
}

impl ToTokens for Stringify {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self {
      Self::Display(ident) => quote! { &#ident.to_string() },
      Self::WidenInt(ident) => quote! { &i64::from(#ident).to_string() },
      Self::Date(ident) => quote! { &#ident.format("%Y-%m-%d").to_string() },
      Self::DateTime(ident) => quote! { &#ident.to_rfc3339() },
      Self::Boolean(ident) => quote! { if #ident { "true" } else { "false" } },
      Self::Passthrough(ident) => quote! { #ident },
    };
    tokens.extend(ts);
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoutePiece {
  Literal(String),
  Param(Stringify),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RoutePart<'a> {
  Literal(&'a str),
  Param(&'a str),
}

/// Expression that builds a request path from a route template.
///
/// Literals between placeholders are merged and carry their separators, so
/// `/pets/{petId}/owner` prints as `["/pets/", &pet_id.to_string(), "/owner"].concat()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteExpr(pub Vec<RoutePiece>);

impl RouteExpr {
  pub(crate) fn parse(route: &str, params: &[RouteParam<'_>]) -> Result<Self, RouteParseError> {
    let mut pieces: Vec<RoutePiece> = vec![];
    let mut offset = 0;

    for segment in route.split('/') {
      let start = offset;
      offset += segment.len() + 1;
      if segment.is_empty() {
        continue;
      }

      push_literal(&mut pieces, "/");
      for part in tokenize(route, segment, start)? {
        match part {
          RoutePart::Literal(lit) => push_literal(&mut pieces, lit),
          RoutePart::Param(name) => {
            let param = params
              .iter()
              .find(|param| param.key == name)
              .ok_or_else(|| RouteParseError::UndeclaredParameter {
                route: route.to_string(),
                name: name.to_string(),
              })?;
            pieces.push(RoutePiece::Param(Stringify::new(param.ident.clone(), param.kind)));
          }
        }
      }
    }

    if pieces.is_empty() || route.ends_with('/') {
      push_literal(&mut pieces, "/");
    }

    Ok(Self(pieces))
  }

  #[cfg(test)]
  pub(crate) fn is_literal(&self) -> bool {
    self.0.iter().all(|piece| matches!(piece, RoutePiece::Literal(_)))
  }
}

fn push_literal(pieces: &mut Vec<RoutePiece>, lit: &str) {
  if lit.is_empty() {
    return;
  }
  if let Some(RoutePiece::Literal(last)) = pieces.last_mut() {
    last.push_str(lit);
    return;
  }
  pieces.push(RoutePiece::Literal(lit.to_string()));
}

fn tokenize<'a>(route: &str, segment: &'a str, mut offset: usize) -> Result<Vec<RoutePart<'a>>, RouteParseError> {
  let mut parts = vec![];
  let mut rest = segment;

  while let Some(open_pos) = rest.find('{') {
    if let Some(stray_close) = rest[..open_pos].find('}') {
      return Err(RouteParseError::UnmatchedClosingBrace {
        route: route.to_string(),
        position: offset + stray_close,
      });
    }

    if open_pos > 0 {
      parts.push(RoutePart::Literal(&rest[..open_pos]));
    }

    let after_open = &rest[open_pos + 1..];
    let Some(close_pos) = after_open.find('}') else {
      return Err(RouteParseError::UnclosedBrace {
        route: route.to_string(),
        position: offset + open_pos,
      });
    };

    if let Some(nested) = after_open[..close_pos].find('{') {
      return Err(RouteParseError::NestedBraces {
        route: route.to_string(),
        position: offset + open_pos + 1 + nested,
      });
    }

    let name = &after_open[..close_pos];
    if name.is_empty() {
      return Err(RouteParseError::EmptyParameter {
        route: route.to_string(),
      });
    }
    parts.push(RoutePart::Param(name));

    let consumed = open_pos + 1 + close_pos + 1;
    offset += consumed;
    rest = &rest[consumed..];
  }

  if let Some(stray_close) = rest.find('}') {
    return Err(RouteParseError::UnmatchedClosingBrace {
      route: route.to_string(),
      position: offset + stray_close,
    });
  }

  if !rest.is_empty() {
    parts.push(RoutePart::Literal(rest));
  }

  Ok(parts)
}

impl ToTokens for RouteExpr {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.0.as_slice() {
      [] => quote! { "/" },
      [RoutePiece::Literal(lit)] => quote! { #lit },
      pieces => {
        let items = pieces.iter().map(|piece| match piece {
          RoutePiece::Literal(lit) => quote! { #lit },
          RoutePiece::Param(stringify) => stringify.to_token_stream(),
        });
        quote! { [#(#items),*].concat() }
      }
    };
    tokens.extend(ts);
  }
}
