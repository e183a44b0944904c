//! OpenAPI document and Swagger UI page served alongside the REST routes.
//!
//! Component schemas are generated from the Rust request/response types with `schemars`, so the
//! published contract cannot drift from what the handlers actually (de)serialize.

use crate::api::{ApiAck, ApiData, ApiFailure};
use crate::employees::{Employee, EmployeePayload};
use axum::{Json, response::Html};
use schemars::r#gen::SchemaSettings;
use serde_json::{Value, json};

/// Title published in the OpenAPI `info` block.
pub const API_TITLE: &str = "Employee Registry API";
/// Version published in the OpenAPI `info` block.
pub const API_VERSION: &str = "1.0.0";

const SWAGGER_UI_PAGE: &str = r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Employee Registry API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
      window.onload = () => {
        window.ui = SwaggerUIBundle({ url: "/doc", dom_id: "#swagger-ui" });
      };
    </script>
  </body>
</html>
"##;

/// `GET /doc`
pub(crate) async fn document() -> Json<Value> {
    Json(build_document())
}

/// `GET /ui`
pub(crate) async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// Assemble the OpenAPI 3.0 document for the employee routes.
pub fn build_document() -> Value {
    let mut generator = SchemaSettings::openapi3().into_generator();
    let payload = generator.subschema_for::<EmployeePayload>();
    let created = generator.subschema_for::<ApiData<Employee>>();
    let listed = generator.subschema_for::<ApiData<Vec<Employee>>>();
    let ack = generator.subschema_for::<ApiAck>();
    let failure = generator.subschema_for::<ApiFailure>();
    let schemas = generator.take_definitions();

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
        },
        "paths": {
            "/api/employees": {
                "post": {
                    "description": "Add a new employee",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": payload } },
                    },
                    "responses": {
                        "201": json_response("Employee added successfully", &created),
                        "400": json_response("Invalid request body", &failure),
                        "409": json_response("Employee already exists", &failure),
                    },
                },
                "get": {
                    "description": "Get all employees",
                    "responses": {
                        "200": json_response("List of all employees", &listed),
                    },
                },
            },
            "/api/employees/{id}": {
                "delete": {
                    "description": "Delete an employee",
                    "parameters": [{
                        "name": "id",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string", "minLength": 3 },
                    }],
                    "responses": {
                        "200": json_response("Employee deleted successfully", &ack),
                        "400": json_response("Invalid employee id", &failure),
                        "404": json_response("Employee not found", &failure),
                    },
                },
            },
        },
        "components": { "schemas": schemas },
    })
}

fn json_response(description: &str, schema: &impl serde::Serialize) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } },
    })
}
