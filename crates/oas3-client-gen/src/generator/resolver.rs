use std::collections::BTreeMap;

use oas3::{
  Spec,
  spec::{MediaType, ObjectOrReference, ObjectSchema, Schema},
};

use super::{
  error::GenerateError,
  model::{FieldKind, FieldSpec, NamedType, ScalarKind, TypeRef, is_array_schema},
  type_graph::TypeGraph,
};
use crate::{naming::identifiers::to_type_ident, utils::component_ref_name};

const SCHEMAS_POINTER: &str = "#/components/schemas";
const RESPONSES_POINTER: &str = "#/components/responses";

/// Picks the JSON media type of a content map: `application/json` first,
/// then any other `+json`/`json` flavour in declaration order.
pub(crate) fn json_media_type(content: &BTreeMap<String, MediaType>) -> Option<&MediaType> {
  content
    .get("application/json")
    .or_else(|| content.iter().find(|(mime, _)| mime.contains("json")).map(|(_, media)| media))
}

/// Builds the [`TypeGraph`] from the component schemas and responses of a
/// document, promoting anonymous inline objects to named types.
pub(crate) struct ModelResolver<'a> {
  spec: &'a Spec,
}

impl<'a> ModelResolver<'a> {
  pub(crate) fn new(spec: &'a Spec) -> Self {
    Self { spec }
  }

  pub(crate) fn resolve(&self) -> Result<TypeGraph, GenerateError> {
    let mut graph = TypeGraph::new();

    let Some(components) = &self.spec.components else {
      return Ok(graph);
    };

    for (name, response_ref) in &components.responses {
      let Ok(response) = response_ref.resolve(self.spec) else {
        continue;
      };
      let Some(schema_ref) = json_media_type(&response.content).and_then(|media| media.schema.as_ref()) else {
        continue;
      };
      self.register_component(&mut graph, name, &format!("{RESPONSES_POINTER}/{name}"), schema_ref)?;
    }

    for (name, schema_ref) in &components.schemas {
      self.register_component(&mut graph, name, &format!("{SCHEMAS_POINTER}/{name}"), schema_ref)?;
    }

    Ok(graph)
  }

  /// Resolves an endpoint body schema, registering it under `name` when it
  /// is an anonymous object.
  pub(crate) fn register_inline(
    &self,
    graph: &mut TypeGraph,
    name: &str,
    key: &str,
    schema_ref: &ObjectOrReference<ObjectSchema>,
  ) -> Result<TypeRef, GenerateError> {
    let kind = self.resolve_kind(graph, name, key, schema_ref)?;
    Ok(TypeRef::from(&kind))
  }

  fn register_component(
    &self,
    graph: &mut TypeGraph,
    name: &str,
    key: &str,
    schema_ref: &ObjectOrReference<ObjectSchema>,
  ) -> Result<(), GenerateError> {
    let type_name = to_type_ident(name);

    match schema_ref {
      ObjectOrReference::Ref { .. } => {
        let Some(target) = component_ref_name(schema_ref).map(|target| to_type_ident(&target)) else {
          return Ok(());
        };
        // A response that merely points at the schema of the same name is that schema.
        if target == type_name {
          return Ok(());
        }
        let mut named = NamedType::new(type_name, key);
        named.alias = Some(FieldKind::Reference(target));
        graph.register(named)
      }
      ObjectOrReference::Object(schema) => self.register_schema(graph, &type_name, key, schema),
    }
  }

  fn register_schema(
    &self,
    graph: &mut TypeGraph,
    name: &str,
    key: &str,
    schema: &ObjectSchema,
  ) -> Result<(), GenerateError> {
    match graph.owner_of(name) {
      Some(owner) if owner == key => return Ok(()),
      Some(owner) => {
        return Err(GenerateError::TypeNameCollision {
          name: name.to_string(),
          existing: owner.to_string(),
          incoming: key.to_string(),
        });
      }
      None => {}
    }

    let mut named = NamedType::new(name, key);
    named.description.clone_from(&schema.description);

    if is_object_like(schema) {
      self.collect_object(graph, &mut named, schema)?;
    } else if is_array_schema(schema) {
      let items = self.items_kind(graph, name, key, schema)?;
      named.alias = Some(FieldKind::Array(Box::new(items)));
    } else if let Some(scalar) = ScalarKind::from_schema(schema) {
      named.alias = Some(FieldKind::Scalar(scalar));
    } else {
      named.alias = Some(FieldKind::Any);
    }

    graph.register(named)
  }

  fn collect_object(
    &self,
    graph: &mut TypeGraph,
    named: &mut NamedType,
    schema: &ObjectSchema,
  ) -> Result<(), GenerateError> {
    for member in &schema.all_of {
      match member {
        ObjectOrReference::Ref { .. } => {
          if let Some(parent) = component_ref_name(member) {
            named.children.insert(to_type_ident(&parent));
          }
        }
        ObjectOrReference::Object(inline) => self.collect_object(graph, named, inline)?,
      }
    }

    for (property, property_ref) in &schema.properties {
      let nested_name = format!("{}{}", named.name, to_type_ident(property));
      let nested_key = format!("{}/properties/{property}", named.key);
      let kind = self.resolve_kind(graph, &nested_name, &nested_key, property_ref)?;
      let format = match property_ref {
        ObjectOrReference::Object(inline) => inline.format.clone(),
        ObjectOrReference::Ref { .. } => None,
      };
      named
        .fields
        .insert(property.clone(), FieldSpec::new(property, kind).with_format(format));
    }

    // Only keys listed explicitly are required; names without a matching property are ignored.
    for required in &schema.required {
      if let Some(field) = named.fields.get_mut(required) {
        field.required = true;
      }
    }

    Ok(())
  }

  /// Resolves the shape of a schema in order: array, named reference, inline
  /// object, scalar. `name` and `key` are used only when an anonymous object
  /// has to be promoted to a named type.
  fn resolve_kind(
    &self,
    graph: &mut TypeGraph,
    name: &str,
    key: &str,
    schema_ref: &ObjectOrReference<ObjectSchema>,
  ) -> Result<FieldKind, GenerateError> {
    let schema = match schema_ref {
      ObjectOrReference::Ref { .. } => {
        return Ok(
          component_ref_name(schema_ref).map_or(FieldKind::Any, |target| FieldKind::Reference(to_type_ident(&target))),
        );
      }
      ObjectOrReference::Object(schema) => schema,
    };

    if is_array_schema(schema) {
      let items = self.items_kind(graph, name, key, schema)?;
      return Ok(FieldKind::Array(Box::new(items)));
    }

    if let Some(parent) = single_composed_ref(schema) {
      return Ok(FieldKind::Reference(to_type_ident(&parent)));
    }

    if is_object_like(schema) {
      self.register_schema(graph, name, key, schema)?;
      return Ok(FieldKind::Reference(name.to_string()));
    }

    Ok(ScalarKind::from_schema(schema).map_or(FieldKind::Any, FieldKind::Scalar))
  }

  fn items_kind(
    &self,
    graph: &mut TypeGraph,
    name: &str,
    key: &str,
    array_schema: &ObjectSchema,
  ) -> Result<FieldKind, GenerateError> {
    match array_schema.items.as_deref() {
      Some(Schema::Object(items_ref)) => {
        self.resolve_kind(graph, &format!("{name}Item"), &format!("{key}/items"), items_ref)
      }
      Some(Schema::Boolean(_)) | None => Ok(FieldKind::Any),
    }
  }
}

fn is_object_like(schema: &ObjectSchema) -> bool {
  !schema.properties.is_empty() || !schema.all_of.is_empty()
}

/// `allOf: [{$ref}]` with nothing else is the usual way to annotate a reference.
fn single_composed_ref(schema: &ObjectSchema) -> Option<String> {
  match schema.all_of.as_slice() {
    [only @ ObjectOrReference::Ref { .. }] if schema.properties.is_empty() => component_ref_name(only),
    _ => None,
  }
}
