use std::collections::BTreeSet;

use http::Method;
use oas3::{
  Spec,
  spec::{MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem, Schema},
};
use serde_json::Value;

use super::{
  codegen::route::template_params,
  error::GenerateError,
  model::{
    Endpoint, FieldKind, FieldLocation, FieldSpec, RequestBodyRef, ResponseRef, ResponseShape, ScalarKind, TypeRef,
    is_array_schema,
  },
  resolver::{ModelResolver, json_media_type},
  type_graph::TypeGraph,
};
use crate::{
  naming::identifiers::{derive_operation_name, ensure_unique, to_rust_field_name, to_type_ident},
  utils::component_ref_name,
};

/// Success statuses that can carry the typed response, most preferred first.
pub(crate) const SUCCESS_STATUS_PREFERENCE: [&str; 6] = ["200", "201", "202", "203", "206", "2XX"];

/// Walks every path and verb of a document into [`Endpoint`] records.
///
/// Inline request and response bodies are registered in the type graph as
/// they are found, so extraction needs mutable access to it.
pub(crate) struct EndpointExtractor<'a> {
  spec: &'a Spec,
  resolver: ModelResolver<'a>,
}

impl<'a> EndpointExtractor<'a> {
  pub(crate) fn new(spec: &'a Spec) -> Self {
    Self {
      spec,
      resolver: ModelResolver::new(spec),
    }
  }

  /// Returns endpoints sorted by name, then route, then verb.
  pub(crate) fn extract(&self, graph: &mut TypeGraph) -> Result<Vec<Endpoint>, GenerateError> {
    let Some(paths) = &self.spec.paths else {
      return Ok(vec![]);
    };

    let mut used_names = BTreeSet::new();
    let mut endpoints = vec![];

    for (route, path_item) in paths {
      let mut methods: Vec<_> = path_item.methods().into_iter().collect();
      methods.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

      for (method, operation) in methods {
        let base_name = operation.operation_id.as_deref().map_or_else(
          || derive_operation_name(method.as_str(), route),
          to_rust_field_name,
        );
        let name = ensure_unique(&base_name, &used_names);
        used_names.insert(name.clone());

        let endpoint = self.extract_operation(graph, name, method.clone(), route, path_item, operation)?;
        endpoints.push(endpoint);
      }
    }

    endpoints.sort_by(|a, b| {
      a.name
        .cmp(&b.name)
        .then_with(|| a.route.cmp(&b.route))
        .then_with(|| a.method.as_str().cmp(b.method.as_str()))
    });

    Ok(endpoints)
  }

  fn extract_operation(
    &self,
    graph: &mut TypeGraph,
    name: String,
    method: Method,
    route: &str,
    path_item: &PathItem,
    operation: &Operation,
  ) -> Result<Endpoint, GenerateError> {
    let parameters = self.collect_parameters(path_item, operation);
    let type_stem = to_type_ident(&name);
    let pointer = format!("#/paths/{}/{}", escape_pointer(route), method.as_str().to_lowercase());

    let mut path_parameters: Vec<FieldSpec> = parameters
      .iter()
      .filter(|param| param.location == ParameterIn::Path)
      .map(|param| {
        let (kind, format) = self.parameter_kind(param);
        FieldSpec::new(&param.name, kind)
          .with_format(format)
          .with_location(FieldLocation::Path)
          .required(true)
      })
      .collect();

    let route_order: Vec<&str> = template_params(route).collect();
    path_parameters.sort_by_key(|param| {
      route_order
        .iter()
        .position(|placeholder| *placeholder == param.key)
        .unwrap_or(usize::MAX)
    });

    let query_parameters = parameters
      .iter()
      .filter(|param| param.location == ParameterIn::Query)
      .map(|param| {
        let (kind, format) = self.parameter_kind(param);
        FieldSpec::new(&param.name, kind)
          .with_format(format)
          .with_location(FieldLocation::Query)
          .required(param.required.unwrap_or(false))
      })
      .collect();

    let (request, request_example) = self.extract_request(graph, &type_stem, &pointer, operation)?;
    let (response, response_example) = self.extract_response(graph, &type_stem, &pointer, operation)?;

    Ok(Endpoint {
      name,
      method,
      route: route.to_string(),
      summary: operation.summary.clone(),
      description: operation.description.clone(),
      path_parameters,
      query_parameters,
      request,
      response,
      request_example,
      response_example,
    })
  }

  /// Path-item parameters followed by operation parameters; an operation
  /// parameter replaces a path-item one with the same name and location.
  fn collect_parameters(&self, path_item: &PathItem, operation: &Operation) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = path_item
      .parameters
      .iter()
      .filter_map(|param| param.resolve(self.spec).ok())
      .collect();

    for param in operation.parameters.iter().filter_map(|param| param.resolve(self.spec).ok()) {
      params.retain(|existing| existing.location != param.location || existing.name != param.name);
      params.push(param);
    }

    params
  }

  fn parameter_kind(&self, param: &Parameter) -> (FieldKind, Option<String>) {
    let Some(schema) = param.schema.as_ref().and_then(|schema| schema.resolve(self.spec).ok()) else {
      return (FieldKind::Scalar(ScalarKind::String), None);
    };

    if is_array_schema(&schema) {
      let item = match schema.items.as_deref() {
        Some(Schema::Object(items)) => items
          .resolve(self.spec)
          .ok()
          .and_then(|items| ScalarKind::from_schema(&items)),
        Some(Schema::Boolean(_)) | None => None,
      };
      let item = FieldKind::Scalar(item.unwrap_or(ScalarKind::String));
      return (FieldKind::Array(Box::new(item)), None);
    }

    let scalar = ScalarKind::from_schema(&schema).unwrap_or(ScalarKind::String);
    (FieldKind::Scalar(scalar), schema.format.clone())
  }

  fn extract_request(
    &self,
    graph: &mut TypeGraph,
    type_stem: &str,
    pointer: &str,
    operation: &Operation,
  ) -> Result<(Option<RequestBodyRef>, Option<Value>), GenerateError> {
    let Some(body) = operation
      .request_body
      .as_ref()
      .and_then(|body| body.resolve(self.spec).ok())
    else {
      return Ok((None, None));
    };

    let Some(media) = json_media_type(&body.content) else {
      return Ok((None, None));
    };
    let example = media_example(media);

    let Some(schema_ref) = media.schema.as_ref() else {
      return Ok((None, example));
    };

    let ty = self.resolver.register_inline(
      graph,
      &format!("{type_stem}Request"),
      &format!("{pointer}/requestBody"),
      schema_ref,
    )?;

    let request = RequestBodyRef {
      ty,
      required: body.required.unwrap_or(false),
    };
    Ok((Some(request), example.or_else(|| self.schema_example(schema_ref))))
  }

  fn extract_response(
    &self,
    graph: &mut TypeGraph,
    type_stem: &str,
    pointer: &str,
    operation: &Operation,
  ) -> Result<(Option<ResponseRef>, Option<Value>), GenerateError> {
    let Some(responses) = operation.responses.as_ref() else {
      return Ok((None, None));
    };

    let Some((status, response_ref)) = SUCCESS_STATUS_PREFERENCE
      .iter()
      .find_map(|status| responses.get(*status).map(|response| (*status, response)))
    else {
      return Ok((None, None));
    };

    let Ok(response) = response_ref.resolve(self.spec) else {
      return Ok((None, None));
    };
    let Some(media) = json_media_type(&response.content) else {
      return Ok((None, None));
    };
    let example = media_example(media);
    let Some(schema_ref) = media.schema.as_ref() else {
      return Ok((None, example));
    };

    let shape = if self.is_array(schema_ref) {
      ResponseShape::Sequence
    } else {
      ResponseShape::Aggregate
    };

    let ty = match component_ref_name(response_ref) {
      // Component responses are registered by the resolver under their own name,
      // unless they merely point at the schema of the same name.
      Some(component) => match component_ref_name(schema_ref) {
        Some(target) if to_type_ident(&target) == to_type_ident(&component) => TypeRef::Named(to_type_ident(&target)),
        _ => TypeRef::Named(to_type_ident(&component)),
      },
      None => self.resolver.register_inline(
        graph,
        &format!("{type_stem}Response"),
        &format!("{pointer}/responses/{status}"),
        schema_ref,
      )?,
    };

    let response = ResponseRef {
      status: status.to_string(),
      ty,
      shape,
    };
    Ok((Some(response), example.or_else(|| self.schema_example(schema_ref))))
  }

  fn is_array(&self, schema_ref: &ObjectOrReference<ObjectSchema>) -> bool {
    schema_ref
      .resolve(self.spec)
      .is_ok_and(|schema| is_array_schema(&schema))
  }

  fn schema_example(&self, schema_ref: &ObjectOrReference<ObjectSchema>) -> Option<Value> {
    schema_ref.resolve(self.spec).ok().and_then(|schema| schema.example)
  }
}

/// Reads the `example` of a media type, or the value of its first `examples` entry.
fn media_example(media: &MediaType) -> Option<Value> {
  let serialized = serde_json::to_value(media).ok()?;
  if let Some(example) = serialized.get("example").filter(|example| !example.is_null()) {
    return Some(example.clone());
  }
  serialized
    .get("examples")
    .and_then(Value::as_object)
    .and_then(|examples| examples.values().next())
    .and_then(|entry| entry.get("value"))
    .cloned()
}

fn escape_pointer(segment: &str) -> String {
  segment.replace('~', "~0").replace('/', "~1")
}
