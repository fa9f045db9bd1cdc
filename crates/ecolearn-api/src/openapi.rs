// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};

use crate::API_ERROR_CODES;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiErrorEnvelope"}}}
    })
}

fn json_body(schema: Value) -> Value {
    json!({"required": true, "content": {"application/json": {"schema": schema}}})
}

fn lang_header() -> Value {
    json!({"name": "accept-language", "in": "header", "schema": {"type": "string"}})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let error_codes: Vec<&str> = API_ERROR_CODES.iter().map(|code| code.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "EcoLearn India carbon API",
        "version": env!("CARGO_PKG_VERSION"),
        "x-api-contract-version": "v1"
      },
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/v1/version": {"get": {"responses": {"200": {"description": "service version metadata"}}}},
        "/v1/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}},
        "/missions": {"get": {"responses": {"200": {"description": "static mission catalog"}}}},
        "/missions/generate": {
          "post": {
            "parameters": [lang_header()],
            "requestBody": json_body(json!({"$ref": "#/components/schemas/MissionGenerateRequest"})),
            "responses": {
              "200": {"description": "generated missions"},
              "400": error_response("invalid request"),
              "502": error_response("language model failure")
            }
          }
        },
        "/points/calc": {
          "post": {
            "requestBody": json_body(json!({
              "type": "object",
              "required": ["completed_missions"],
              "properties": {"completed_missions": {"type": "array", "items": {"type": "string"}}}
            })),
            "responses": {"200": {"description": "awarded points"}, "400": error_response("invalid request")}
          }
        },
        "/analyze": {
          "post": {
            "parameters": [lang_header()],
            "requestBody": json_body(json!({"$ref": "#/components/schemas/ActivityRecord"})),
            "responses": {"200": {"description": "carbon analysis"}, "400": error_response("invalid activity record")}
          }
        },
        "/logs/analyze": {
          "post": {
            "parameters": [lang_header()],
            "requestBody": json_body(json!({
              "type": "object",
              "required": ["text"],
              "properties": {
                "text": {"type": "string", "minLength": 3, "maxLength": 1000},
                "lang": {"type": "string"}
              }
            })),
            "responses": {"200": {"description": "analysis with coaching"}, "400": error_response("invalid log text")}
          }
        },
        "/explain": {
          "post": {
            "parameters": [lang_header()],
            "requestBody": json_body(json!({
              "type": "object",
              "required": ["question"],
              "properties": {"question": {"type": "string"}, "lang": {"type": "string"}}
            })),
            "responses": {
              "200": {"description": "tutor answer"},
              "400": error_response("invalid request"),
              "502": error_response("language model failure")
            }
          }
        },
        "/data/india/temp": {
          "get": {
            "parameters": [
              {"name": "variable", "in": "query", "schema": {"type": "string", "enum": ["tas", "tasmax"], "default": "tasmax"}},
              {"name": "scenario", "in": "query", "schema": {"type": "string", "enum": ["historical", "ssp126", "ssp245", "ssp370", "ssp585"], "default": "historical"}},
              {"name": "model_hint", "in": "query", "schema": {"type": "string", "pattern": "^[A-Za-z0-9_-]{1,64}$", "default": "MIROC6"}},
              {"name": "min_year", "in": "query", "schema": {"type": "integer", "minimum": 1850, "maximum": 2100, "default": 1980}},
              {"name": "max_year", "in": "query", "schema": {"type": "integer", "minimum": 1850, "maximum": 2200, "default": 2014}}
            ],
            "responses": {
              "200": {"description": "India annual mean temperature series"},
              "400": error_response("invalid query parameter"),
              "404": error_response("no matching series or years")
            }
          }
        },
        "/agent": {
          "post": {
            "parameters": [lang_header()],
            "requestBody": json_body(json!({
              "type": "object",
              "required": ["task"],
              "properties": {
                "task": {"type": "string"},
                "lang": {"type": "string"},
                "emissions": {"$ref": "#/components/schemas/ActivityRecord"},
                "completed_missions": {"type": "array", "items": {"type": "string"}}
              }
            })),
            "responses": {
              "200": {"description": "agent reply"},
              "400": error_response("invalid request"),
              "502": error_response("language model failure")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiErrorCode": {"type": "string", "enum": error_codes},
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object"}
            }
          },
          "ApiErrorEnvelope": {
            "type": "object",
            "required": ["error"],
            "properties": {"error": {"$ref": "#/components/schemas/ApiError"}}
          },
          "ActivityRecord": {
            "type": "object",
            "properties": {
              "mode": {"type": "string", "enum": ["petrol_car", "bus", "walk_cycle", "electric_car"], "nullable": true},
              "distance_km": {"type": "number", "default": 0},
              "meat_meals": {"type": "integer", "minimum": 0, "default": 0},
              "veg_meals": {"type": "integer", "minimum": 0, "default": 0},
              "electricity_kwh": {"type": "number", "minimum": 0, "default": 0},
              "lpg_kg": {"type": "number", "minimum": 0, "default": 0},
              "waste_kg": {"type": "number", "minimum": 0, "default": 0},
              "period": {"type": "string", "default": "day"},
              "lang": {"type": "string"}
            }
          },
          "MissionGenerateRequest": {
            "type": "object",
            "properties": {
              "n": {"type": "integer", "minimum": 1, "maximum": 20, "default": 5},
              "categories": {"type": "array", "items": {"type": "string"}},
              "difficulty": {"type": "string", "default": "easy"},
              "lang": {"type": "string"}
            }
          }
        }
      }
    })
}
