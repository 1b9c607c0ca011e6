//! Minimal OpenAPI document per role.

use serde_json::{json, Value};

use crate::config::schema::Role;

fn question_operation(summary: &str) -> Value {
    json!({
        "summary": summary,
        "security": [{ "bearer": [] }],
        "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pregunta" } } }
        },
        "responses": {
            "200": { "description": "Answer", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Respuesta" } } } },
            "401": { "description": "Missing or invalid token" },
            "422": { "description": "Malformed body" }
        }
    })
}

/// OpenAPI 3 document describing `role`'s endpoints.
pub fn document(role: Role) -> Value {
    let mut paths = serde_json::Map::new();
    paths.insert(
        "/health".to_string(),
        json!({ "get": { "summary": "Liveness probe", "responses": { "200": { "description": "OK" } } } }),
    );

    match role {
        Role::Orchestrator => {
            paths.insert(
                "/token".to_string(),
                json!({ "post": { "summary": "Obtain the access token", "responses": { "200": { "description": "Token" } } } }),
            );
            let mut consulta = question_operation("Route a banking question");
            consulta["responses"]["502"] = json!({ "description": "Downstream service unavailable" });
            paths.insert("/consulta".to_string(), json!({ "post": consulta }));
        }
        _ => {
            paths.insert(
                "/respuesta".to_string(),
                json!({ "post": question_operation("Answer a banking question") }),
            );
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": format!("banking-agent {}", role),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": paths,
        "components": {
            "securitySchemes": { "bearer": { "type": "http", "scheme": "bearer" } },
            "schemas": {
                "Pregunta": {
                    "type": "object",
                    "required": ["pregunta"],
                    "properties": { "pregunta": { "type": "string" } }
                },
                "Respuesta": {
                    "type": "object",
                    "properties": { "respuesta": { "type": "string" } }
                }
            }
        }
    })
}
