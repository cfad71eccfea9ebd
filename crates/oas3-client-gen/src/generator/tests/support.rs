use oas3::Spec;
use serde_json::{Value, json};

use crate::generator::{
  endpoints::EndpointExtractor, model::Endpoint, resolver::ModelResolver, type_graph::TypeGraph,
};

pub(super) const SERVER_URL: &str = "https://petstore.test/v1";

pub(super) fn parse_spec(document: Value) -> Spec {
  serde_json::from_value(document).expect("document should deserialize")
}

/// A document with one server, the given paths and the given component schemas.
pub(super) fn document(paths: Value, schemas: Value) -> Spec {
  parse_spec(json!({
    "openapi": "3.1.0",
    "info": { "title": "Petstore", "version": "1.0.0" },
    "servers": [{ "url": SERVER_URL }],
    "paths": paths,
    "components": { "schemas": schemas },
  }))
}

pub(super) fn resolve(spec: &Spec) -> TypeGraph {
  ModelResolver::new(spec).resolve().expect("resolve should succeed")
}

pub(super) fn extract(spec: &Spec) -> (TypeGraph, Vec<Endpoint>) {
  let mut graph = resolve(spec);
  let endpoints = EndpointExtractor::new(spec)
    .extract(&mut graph)
    .expect("extract should succeed");
  (graph, endpoints)
}

pub(super) fn json_content(schema: Value) -> Value {
  json!({ "application/json": { "schema": schema } })
}

pub(super) fn schema_ref(name: &str) -> Value {
  json!({ "$ref": format!("#/components/schemas/{name}") })
}

/// Pets with an owner, plus one schema no endpoint uses.
pub(super) fn petstore() -> Spec {
  document(
    json!({
      "/pets": {
        "get": {
          "operationId": "listPets",
          "parameters": [
            { "name": "limit", "in": "query", "schema": { "type": "integer", "format": "int32" } }
          ],
          "responses": {
            "200": {
              "description": "all pets",
              "content": json_content(json!({ "type": "array", "items": schema_ref("Pet") }))
            }
          }
        },
        "post": {
          "operationId": "createPet",
          "requestBody": { "required": true, "content": json_content(schema_ref("Pet")) },
          "responses": {
            "201": { "description": "created", "content": json_content(schema_ref("Pet")) }
          }
        }
      },
      "/pets/{petId}": {
        "get": {
          "operationId": "showPetById",
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
          ],
          "responses": {
            "200": { "description": "one pet", "content": json_content(schema_ref("Pet")) }
          }
        },
        "delete": {
          "parameters": [
            { "name": "petId", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
          ],
          "responses": { "204": { "description": "deleted" } }
        }
      }
    }),
    json!({
      "Pet": {
        "type": "object",
        "description": "A pet in the store.",
        "required": ["id", "name"],
        "properties": {
          "id": { "type": "integer", "format": "int64" },
          "name": { "type": "string" },
          "owner": schema_ref("Owner"),
          "bornOn": { "type": "string", "format": "date" }
        }
      },
      "Owner": {
        "type": "object",
        "properties": {
          "name": { "type": "string" }
        }
      },
      "Inventory": {
        "type": "object",
        "properties": {
          "count": { "type": "integer" }
        }
      }
    }),
  )
}

/// List endpoints whose payloads reach an array through inline schemas,
/// component schemas and component responses.
pub(super) fn kennel() -> Spec {
  parse_spec(json!({
    "openapi": "3.1.0",
    "info": { "title": "Kennel", "version": "1.0.0" },
    "servers": [{ "url": SERVER_URL }],
    "paths": {
      "/pets": {
        "get": {
          "operationId": "listPets",
          "responses": {
            "200": {
              "description": "inline array",
              "content": json_content(json!({ "type": "array", "items": schema_ref("Pet") }))
            }
          }
        }
      },
      "/herds": {
        "get": {
          "operationId": "listHerds",
          "responses": {
            "200": { "description": "array schema", "content": json_content(schema_ref("Herd")) }
          }
        }
      },
      "/litters": {
        "get": {
          "operationId": "listLitters",
          "responses": { "200": { "$ref": "#/components/responses/Litter" } }
        }
      },
      "/tags": {
        "get": {
          "operationId": "listTags",
          "responses": { "200": { "$ref": "#/components/responses/Tags" } }
        }
      }
    },
    "components": {
      "schemas": {
        "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
        "Herd": { "type": "array", "items": schema_ref("Pet") }
      },
      "responses": {
        "Litter": { "description": "aliased array", "content": json_content(schema_ref("Herd")) },
        "Tags": {
          "description": "inline array",
          "content": json_content(json!({ "type": "array", "items": { "type": "string" } }))
        }
      }
    }
  }))
}
