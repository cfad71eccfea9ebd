use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

use crate::generator::{
  codegen::route::{RouteExpr, RouteParam, RouteParseError, template_params},
  model::ScalarKind,
};

fn param<'a>(key: &'a str, ident: &str, kind: ScalarKind) -> RouteParam<'a> {
  RouteParam {
    key,
    ident: format_ident!("{ident}"),
    kind,
  }
}

fn render(route: &str, params: &[RouteParam<'_>]) -> String {
  RouteExpr::parse(route, params).unwrap().to_token_stream().to_string()
}

#[test]
fn test_template_params() {
  assert_eq!(
    template_params("/pets/{petId}/owner/{ownerName}").collect::<Vec<_>>(),
    vec!["petId", "ownerName"]
  );
  assert_eq!(template_params("/files/{}/{name}.json").collect::<Vec<_>>(), vec!["name"]);
  assert_eq!(template_params("/pets").count(), 0);
}

#[test]
fn test_literal_routes() {
  struct Case {
    route: &'static str,
    expected: &'static str,
  }

  let cases = [
    Case {
      route: "/pets",
      expected: "/pets",
    },
    Case {
      route: "/pets/",
      expected: "/pets/",
    },
    Case {
      route: "//pets//mine",
      expected: "/pets/mine",
    },
    Case {
      route: "/",
      expected: "/",
    },
    Case {
      route: "",
      expected: "/",
    },
  ];

  for case in cases {
    let expr = RouteExpr::parse(case.route, &[]).unwrap();
    assert!(expr.is_literal(), "route: {}", case.route);
    let expected = case.expected;
    assert_eq!(
      expr.to_token_stream().to_string(),
      quote! { #expected }.to_string(),
      "route: {}",
      case.route
    );
  }
}

#[test]
fn test_interpolated_route() {
  let params = [
    param("ownerName", "owner_name", ScalarKind::String),
    param("petId", "pet_id", ScalarKind::Int64),
  ];

  assert_eq!(
    render("/pets/{petId}/owner/{ownerName}", &params),
    quote! { ["/pets/", &pet_id.to_string(), "/owner/", owner_name].concat() }.to_string()
  );
}

#[test]
fn test_placeholder_inside_segment() {
  let params = [param("id", "id", ScalarKind::Int32)];

  assert_eq!(
    render("/files/{id}.json", &params),
    quote! { ["/files/", &i64::from(id).to_string(), ".json"].concat() }.to_string()
  );
}

#[test]
fn test_stringify_by_kind() {
  struct Case {
    kind: ScalarKind,
    expected: TokenStream,
  }

  let cases = [
    Case {
      kind: ScalarKind::Int64,
      expected: quote! { &v.to_string() },
    },
    Case {
      kind: ScalarKind::Double,
      expected: quote! { &v.to_string() },
    },
    Case {
      kind: ScalarKind::Int32,
      expected: quote! { &i64::from(v).to_string() },
    },
    Case {
      kind: ScalarKind::Date,
      expected: quote! { &v.format("%Y-%m-%d").to_string() },
    },
    Case {
      kind: ScalarKind::DateTime,
      expected: quote! { &v.to_rfc3339() },
    },
    Case {
      kind: ScalarKind::Boolean,
      expected: quote! { if v { "true" } else { "false" } },
    },
    Case {
      kind: ScalarKind::String,
      expected: quote! { v },
    },
  ];

  for case in cases {
    let params = [param("v", "v", case.kind)];
    let expected = case.expected;
    assert_eq!(
      render("/x/{v}", &params),
      quote! { ["/x/", #expected].concat() }.to_string(),
      "kind: {}",
      case.kind
    );
  }
}

#[test]
fn test_parse_errors() {
  struct Case {
    route: &'static str,
    expected: RouteParseError,
  }

  let cases = [
    Case {
      route: "/pets/{petId",
      expected: RouteParseError::UnclosedBrace {
        route: "/pets/{petId".to_string(),
        position: 6,
      },
    },
    Case {
      route: "/pets/{}",
      expected: RouteParseError::EmptyParameter {
        route: "/pets/{}".to_string(),
      },
    },
    Case {
      route: "/pets/petId}",
      expected: RouteParseError::UnmatchedClosingBrace {
        route: "/pets/petId}".to_string(),
        position: 11,
      },
    },
    Case {
      route: "/pets/{a{b}",
      expected: RouteParseError::NestedBraces {
        route: "/pets/{a{b}".to_string(),
        position: 8,
      },
    },
    Case {
      route: "/pets/{petId}",
      expected: RouteParseError::UndeclaredParameter {
        route: "/pets/{petId}".to_string(),
        name: "petId".to_string(),
      },
    },
  ];

  for case in cases {
    let err = RouteExpr::parse(case.route, &[]).unwrap_err();
    assert_eq!(err, case.expected, "route: {}", case.route);
  }
}

#[test]
fn test_parse_error_messages() {
  let err = RouteExpr::parse("/pets/{petId}", &[]).unwrap_err();
  assert_eq!(
    err.to_string(),
    "placeholder '{petId}' in route '/pets/{petId}' has no path parameter"
  );

  let err = RouteExpr::parse("/pets/{}", &[]).unwrap_err();
  assert_eq!(err.to_string(), "empty parameter '{}' in route '/pets/{}'");
}
