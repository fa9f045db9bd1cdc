// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use ecolearn_model::TemperatureQuery;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::accounting::AccountingEngine;
use crate::climate::TemperatureSeriesSource;
use crate::collaborator::{ToolCall, ToolSpec};
use crate::missions::{mission_catalog, points_calc};
use crate::normalize::normalize_activity_value;

pub const TOOL_MISSIONS_CATALOG: &str = "missions_catalog";
pub const TOOL_POINTS_CALC: &str = "points_calc";
pub const TOOL_ANALYZE_CO2E: &str = "analyze_co2e";
pub const TOOL_INDIA_TEMP_SERIES: &str = "india_temp_series";

fn no_arguments() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

/// Function tools offered to the model on the first round.
#[must_use]
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: TOOL_MISSIONS_CATALOG,
            description: "Return the static EcoLearn missions list.",
            parameters: no_arguments(),
        },
        ToolSpec {
            name: TOOL_POINTS_CALC,
            description: "Compute eco points from completed mission ids.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "completed_missions": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["completed_missions"],
            }),
        },
        ToolSpec {
            name: TOOL_ANALYZE_CO2E,
            description: "Calculate CO2e and threat level from daily activity quantities.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "mode": {"type": "string", "enum": ["petrol_car", "bus", "walk_cycle", "electric_car"]},
                    "distance_km": {"type": "number"},
                    "meat_meals": {"type": "integer"},
                    "veg_meals": {"type": "integer"},
                    "electricity_kwh": {"type": "number"},
                    "lpg_kg": {"type": "number"},
                    "waste_kg": {"type": "number"},
                    "period": {"type": "string"},
                },
                "required": [],
            }),
        },
        ToolSpec {
            name: TOOL_INDIA_TEMP_SERIES,
            description: "Return the India annual mean temperature series for charts.",
            parameters: no_arguments(),
        },
    ]
}

fn error_value(message: impl Into<String>) -> Value {
    json!({"error": message.into()})
}

fn to_tool_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| error_value(e.to_string()))
}

/// Executes tool calls against the local engines. Never fails: problems become
/// `{"error": ...}` results the model can read.
#[derive(Clone)]
pub struct AgentToolbox {
    engine: Arc<AccountingEngine>,
    climate: Arc<dyn TemperatureSeriesSource>,
}

impl AgentToolbox {
    #[must_use]
    pub fn new(engine: Arc<AccountingEngine>, climate: Arc<dyn TemperatureSeriesSource>) -> Self {
        Self { engine, climate }
    }

    pub async fn dispatch(&self, call: &ToolCall) -> Value {
        let arguments = serde_json::from_str::<Value>(&call.arguments)
            .ok()
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({}));
        debug!(tool = %call.name, call_id = %call.id, "dispatching tool call");
        match call.name.as_str() {
            TOOL_MISSIONS_CATALOG => json!({"missions": mission_catalog()}),
            TOOL_POINTS_CALC => {
                let completed: Vec<&str> = arguments
                    .get("completed_missions")
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                to_tool_value(&points_calc(&completed))
            }
            TOOL_ANALYZE_CO2E => match normalize_activity_value(&arguments) {
                Ok(record) => to_tool_value(&self.engine.analyze(&record)),
                Err(err) => error_value(err.to_string()),
            },
            TOOL_INDIA_TEMP_SERIES => match self.climate.fetch(&TemperatureQuery::default()).await {
                Ok(series) => to_tool_value(&series),
                Err(err) => error_value(err.to_string()),
            },
            _ => error_value("unknown tool"),
        }
    }
}
