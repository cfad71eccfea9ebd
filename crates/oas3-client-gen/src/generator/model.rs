//! Language-neutral model shared by the resolver, the endpoint extractor and
//! the templates.

use std::collections::{BTreeMap, BTreeSet};

use http::Method;
use oas3::spec::{ObjectSchema, SchemaType, SchemaTypeSet};
use strum::Display;

/// Primitive value kinds, derived from an OpenAPI `type`/`format` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum ScalarKind {
  Int64,
  Int32,
  Double,
  Float,
  Date,
  DateTime,
  Boolean,
  String,
}

impl ScalarKind {
  /// Maps a schema's primitive type and format onto a scalar kind.
  ///
  /// Returns `None` for objects, arrays and untyped schemas.
  pub fn from_schema(schema: &ObjectSchema) -> Option<Self> {
    let schema_type = primitive_type(schema.schema_type.as_ref()?)?;
    Some(Self::from_type_and_format(schema_type, schema.format.as_deref()))
  }

  pub fn from_type_and_format(schema_type: SchemaType, format: Option<&str>) -> Self {
    match (schema_type, format) {
      (SchemaType::Integer, Some("int32")) => Self::Int32,
      (SchemaType::Integer, _) => Self::Int64,
      (SchemaType::Number, Some("float")) => Self::Float,
      (SchemaType::Number, _) => Self::Double,
      (SchemaType::Boolean, _) => Self::Boolean,
      (SchemaType::String, Some("date-time")) => Self::DateTime,
      (SchemaType::String, Some("date")) => Self::Date,
      _ => Self::String,
    }
  }
}

/// Returns the single primitive type of a type set, ignoring a `null` member.
fn primitive_type(type_set: &SchemaTypeSet) -> Option<SchemaType> {
  let candidate = match type_set {
    SchemaTypeSet::Single(single) => *single,
    SchemaTypeSet::Multiple(types) => {
      let mut non_null = types.iter().filter(|t| **t != SchemaType::Null);
      let first = *non_null.next()?;
      if non_null.next().is_some() {
        return None;
      }
      first
    }
  };

  match candidate {
    SchemaType::Integer | SchemaType::Number | SchemaType::Boolean | SchemaType::String => Some(candidate),
    SchemaType::Array | SchemaType::Object | SchemaType::Null => None,
  }
}

/// Returns true when the schema declares `type: array`.
pub(crate) fn is_array_schema(schema: &ObjectSchema) -> bool {
  match &schema.schema_type {
    Some(SchemaTypeSet::Single(single)) => *single == SchemaType::Array,
    Some(SchemaTypeSet::Multiple(types)) => types.contains(&SchemaType::Array),
    None => false,
  }
}

/// Semantic kind of a field, parameter or body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
  Scalar(ScalarKind),
  Reference(String),
  Array(Box<FieldKind>),
  /// Free-form value: an object without properties or an untyped schema.
  Any,
}

impl FieldKind {
  /// Name of the named type this kind points at, looking through arrays.
  pub fn referenced_type(&self) -> Option<&str> {
    match self {
      Self::Reference(name) => Some(name),
      Self::Array(inner) => inner.referenced_type(),
      Self::Scalar(_) | Self::Any => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldLocation {
  #[default]
  Body,
  Path,
  Query,
}

/// A property of a named type or a parameter of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
  pub key: String,
  pub kind: FieldKind,
  pub format: Option<String>,
  pub required: bool,
  pub location: FieldLocation,
}

impl FieldSpec {
  pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
    Self {
      key: key.into(),
      kind,
      format: None,
      required: false,
      location: FieldLocation::Body,
    }
  }

  #[must_use]
  pub fn with_format(mut self, format: Option<String>) -> Self {
    self.format = format;
    self
  }

  #[must_use]
  pub fn with_location(mut self, location: FieldLocation) -> Self {
    self.location = location;
    self
  }

  #[must_use]
  pub fn required(mut self, required: bool) -> Self {
    self.required = required;
    self
  }

  /// Scalar kind used when this field is rendered into a route.
  pub fn scalar_kind(&self) -> ScalarKind {
    match &self.kind {
      FieldKind::Scalar(kind) => *kind,
      _ => ScalarKind::String,
    }
  }
}

/// A type of the type graph.
///
/// `name` is the identifier used in generated code; `key` is the unique
/// document path the type was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
  pub name: String,
  pub key: String,
  pub description: Option<String>,
  pub fields: BTreeMap<String, FieldSpec>,
  /// Composed parent types, embedded rather than flattened into `fields`.
  pub children: BTreeSet<String>,
  /// Set when the type is a named array, reference or scalar rather than an object.
  pub alias: Option<FieldKind>,
}

impl NamedType {
  pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      key: key.into(),
      description: None,
      fields: BTreeMap::new(),
      children: BTreeSet::new(),
      alias: None,
    }
  }

  /// Named types referenced by fields or the alias target.
  pub fn references(&self) -> BTreeSet<&str> {
    self
      .fields
      .values()
      .filter_map(|field| field.kind.referenced_type())
      .chain(self.alias.as_ref().and_then(FieldKind::referenced_type))
      .collect()
  }

  /// Every outgoing edge: composed children plus field references.
  pub fn dependencies(&self) -> BTreeSet<&str> {
    let mut deps = self.references();
    deps.extend(self.children.iter().map(String::as_str));
    deps
  }
}

/// Reference from an endpoint to a request or response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
  Named(String),
  Sequence(Box<TypeRef>),
  Scalar(ScalarKind),
  Any,
}

impl TypeRef {
  /// The named type at the root of this reference, looking through sequences.
  pub fn named_root(&self) -> Option<&str> {
    match self {
      Self::Named(name) => Some(name),
      Self::Sequence(inner) => inner.named_root(),
      Self::Scalar(_) | Self::Any => None,
    }
  }
}

impl From<&FieldKind> for TypeRef {
  fn from(kind: &FieldKind) -> Self {
    match kind {
      FieldKind::Scalar(scalar) => Self::Scalar(*scalar),
      FieldKind::Reference(name) => Self::Named(name.clone()),
      FieldKind::Array(inner) => Self::Sequence(Box::new(Self::from(inner.as_ref()))),
      FieldKind::Any => Self::Any,
    }
  }
}

/// How the absence of a payload is represented for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResponseShape {
  /// Absence is an empty sequence.
  Sequence,
  /// Absence is an error.
  Aggregate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyRef {
  pub ty: TypeRef,
  pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRef {
  pub status: String,
  pub ty: TypeRef,
  pub shape: ResponseShape,
}

/// One HTTP operation, ready to become a client method.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
  pub name: String,
  pub method: Method,
  pub route: String,
  pub summary: Option<String>,
  pub description: Option<String>,
  /// Path parameters in route order.
  pub path_parameters: Vec<FieldSpec>,
  /// Recorded for documentation; not part of the generated call signature.
  pub query_parameters: Vec<FieldSpec>,
  pub request: Option<RequestBodyRef>,
  pub response: Option<ResponseRef>,
  pub request_example: Option<serde_json::Value>,
  pub response_example: Option<serde_json::Value>,
}

impl Endpoint {
  /// Named types this endpoint needs, request first.
  pub fn type_roots(&self) -> impl Iterator<Item = &str> {
    self
      .request
      .as_ref()
      .and_then(|body| body.ty.named_root())
      .into_iter()
      .chain(self.response.as_ref().and_then(|resp| resp.ty.named_root()))
  }
}
