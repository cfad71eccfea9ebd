use std::collections::BTreeSet;

use http::Method;
use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, format_ident, quote};

use super::{
  documentation::Documentation,
  route::{RouteExpr, RouteParam},
  types::{TypeRenderer, parse_ident},
};
use crate::{
  generator::{
    error::RenderError,
    model::{Endpoint, ResponseShape, ScalarKind},
  },
  naming::identifiers::{ensure_unique, to_rust_field_name},
};

const BODY_ARG: &str = "body";

#[derive(Clone, Debug)]
pub(crate) struct HttpMethodFragment {
  method: Method,
}

impl HttpMethodFragment {
  pub(crate) fn new(entity: &str, method: Method) -> Result<Self, RenderError> {
    let known = [
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::PATCH,
      Method::HEAD,
      Method::OPTIONS,
      Method::TRACE,
      Method::CONNECT,
    ];
    if !known.contains(&method) {
      return Err(RenderError::new(entity, format!("unsupported HTTP method `{method}`")));
    }
    Ok(Self { method })
  }
}

impl ToTokens for HttpMethodFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let name = format_ident!("{}", self.method.as_str());
    tokens.extend(quote! { Method::#name });
  }
}

/// How the request body is passed to the generated method.
#[derive(Clone, Debug)]
pub(crate) enum BodyArgFragment {
  Absent,
  Required(TokenStream),
  Optional(TokenStream),
}

impl BodyArgFragment {
  fn parameter(&self) -> Option<TokenStream> {
    let body = format_ident!("{BODY_ARG}");
    match self {
      Self::Absent => None,
      Self::Required(ty) => Some(quote! { #body: &#ty }),
      Self::Optional(ty) => Some(quote! { #body: Option<&#ty> }),
    }
  }
}

impl ToTokens for BodyArgFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let body = format_ident!("{BODY_ARG}");
    let ts = match self {
      Self::Absent => quote! { None::<&()> },
      Self::Required(_) => quote! { Some(#body) },
      Self::Optional(_) => quote! { #body },
    };
    tokens.extend(ts);
  }
}

/// Statements that send the request and turn the payload into the method result.
#[derive(Clone, Debug)]
pub(crate) struct ResponseHandlingFragment {
  method: HttpMethodFragment,
  body: BodyArgFragment,
  response: Option<(TokenStream, ResponseShape)>,
}

impl ToTokens for ResponseHandlingFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let method = &self.method;
    let body = &self.body;

    let ts = match &self.response {
      None => quote! {
        self.handler.execute(#method, &path, #body).await
      },
      Some((ty, ResponseShape::Sequence)) => quote! {
        let payload: Option<#ty> = self.handler.send(#method, &path, #body).await?;
        Ok(payload.unwrap_or_default())
      },
      Some((ty, ResponseShape::Aggregate)) => quote! {
        let payload: Option<#ty> = self.handler.send(#method, &path, #body).await?;
        payload.ok_or(ApiError::MissingBody)
      },
    };
    tokens.extend(ts);
  }
}

/// One endpoint rendered as a method: signature, docs and body.
#[derive(Clone, Debug)]
pub(crate) struct ClientMethodFragment {
  docs: Documentation,
  name: Ident,
  args: Vec<TokenStream>,
  output: TokenStream,
  route: RouteExpr,
  handling: ResponseHandlingFragment,
}

impl ClientMethodFragment {
  pub(crate) fn new(endpoint: &Endpoint, types: &TypeRenderer<'_>) -> Result<Self, RenderError> {
    let entity = endpoint.name.as_str();
    let name = parse_ident(entity, &endpoint.name)?;

    let mut used_names = BTreeSet::from([BODY_ARG.to_string()]);
    let mut route_params = vec![];
    let mut args = vec![];

    for param in &endpoint.path_parameters {
      let arg_name = ensure_unique(&to_rust_field_name(&param.key), &used_names);
      used_names.insert(arg_name.clone());

      let ident = parse_ident(entity, &arg_name)?;
      let kind = param.scalar_kind();
      let ty = path_arg_type(kind);
      args.push(quote! { #ident: #ty });
      route_params.push(RouteParam {
        key: &param.key,
        ident,
        kind,
      });
    }

    let route = RouteExpr::parse(&endpoint.route, &route_params).map_err(|err| RenderError::new(entity, err))?;

    let body = match &endpoint.request {
      None => BodyArgFragment::Absent,
      Some(request) => {
        let ty = types.payload_type(entity, &request.ty)?;
        if request.required {
          BodyArgFragment::Required(ty)
        } else {
          BodyArgFragment::Optional(ty)
        }
      }
    };
    args.extend(body.parameter());

    let response = endpoint
      .response
      .as_ref()
      .map(|response| Ok::<_, RenderError>((types.payload_type(entity, &response.ty)?, response.shape)))
      .transpose()?;
    let output = response.as_ref().map_or_else(|| quote! { () }, |(ty, _)| ty.clone());

    let mut docs = Documentation::from_optional(endpoint.summary.as_deref());
    if let Some(description) = endpoint.description.as_deref() {
      docs.paragraph(description);
    }
    docs.paragraph(&format!("`{} {}`", endpoint.method, endpoint.route));

    Ok(Self {
      docs,
      name,
      args,
      output,
      route,
      handling: ResponseHandlingFragment {
        method: HttpMethodFragment::new(entity, endpoint.method.clone())?,
        body,
        response,
      },
    })
  }

  fn signature(&self) -> TokenStream {
    let name = &self.name;
    let args = &self.args;
    let output = &self.output;
    quote! { async fn #name(&self, #(#args),*) -> Result<#output, ApiError> }
  }

  pub(crate) fn declaration(&self) -> TokenStream {
    let docs = &self.docs;
    let signature = self.signature();
    quote! {
      #docs
      #signature;
    }
  }

  pub(crate) fn definition(&self) -> TokenStream {
    let signature = self.signature();
    let route = &self.route;
    let handling = &self.handling;
    quote! {
      #signature {
        let path = #route;
        #handling
      }
    }
  }
}

/// Path arguments are passed by value, strings by reference.
fn path_arg_type(scalar: ScalarKind) -> TokenStream {
  match scalar {
    ScalarKind::String => quote! { &str },
    other => other.to_token_stream(),
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiTraitFragment<'a> {
  methods: &'a [ClientMethodFragment],
}

impl<'a> ApiTraitFragment<'a> {
  pub(crate) fn new(methods: &'a [ClientMethodFragment]) -> Self {
    Self { methods }
  }
}

impl ToTokens for ApiTraitFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let declarations = self.methods.iter().map(ClientMethodFragment::declaration);
    tokens.extend(quote! {
      /// Operations exposed by the API.
      #[allow(async_fn_in_trait)]
      pub trait Api {
        #(#declarations)*
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientStructFragment {
  base_url: String,
}

impl ClientStructFragment {
  pub(crate) fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
    }
  }
}

impl ToTokens for ClientStructFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let base_url = &self.base_url;
    tokens.extend(quote! {
      /// HTTP client for the API.
      #[derive(Debug, Clone)]
      pub struct Client {
        handler: RequestHandler,
      }

      impl Client {
        /// Server URL declared by the API description.
        pub const DEFAULT_BASE_URL: &'static str = #base_url;

        #[must_use]
        pub fn new() -> Self {
          Self::with_base_url(Self::DEFAULT_BASE_URL)
        }

        #[must_use]
        pub fn with_base_url(base_url: impl Into<String>) -> Self {
          Self::with_handler(RequestHandler::new(base_url))
        }

        #[must_use]
        pub fn with_handler(handler: RequestHandler) -> Self {
          Self { handler }
        }
      }

      impl Default for Client {
        fn default() -> Self {
          Self::new()
        }
      }
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct ClientImplFragment<'a> {
  methods: &'a [ClientMethodFragment],
}

impl<'a> ClientImplFragment<'a> {
  pub(crate) fn new(methods: &'a [ClientMethodFragment]) -> Self {
    Self { methods }
  }
}

impl ToTokens for ClientImplFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let definitions = self.methods.iter().map(ClientMethodFragment::definition);
    tokens.extend(quote! {
      impl Api for Client {
        #(#definitions)*
      }
    });
  }
}
