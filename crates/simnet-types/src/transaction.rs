//! Raw call results as returned by the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::value::ClarityValue;

/// Result of one read-only or public call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransactionResult {
    pub result: ClarityValue,
    #[serde(default)]
    pub events: Vec<TransactionEvent>,
}

impl ParsedTransactionResult {
    pub fn new(result: ClarityValue) -> Self {
        Self {
            result,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: TransactionEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// An event emitted during a call (print, token transfer, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    /// Event kind, e.g. `print_event` or `stx_transfer_event`.
    pub event: String,
    pub data: EventData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ClarityValue>,
    /// Event-specific fields (`contract_identifier`, `amount`, ...).
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl TransactionEvent {
    pub fn new(event: &str, data: EventData) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    /// A `print_event` emitted by `contract_identifier`.
    pub fn print(contract_identifier: &str, value: ClarityValue) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            "contract_identifier".to_string(),
            serde_json::Value::String(contract_identifier.to_string()),
        );
        fields.insert(
            "topic".to_string(),
            serde_json::Value::String("print".to_string()),
        );
        Self::new(
            "print_event",
            EventData {
                raw_value: None,
                value: Some(value),
                fields,
            },
        )
    }

    /// Trace form: the event kind plus the pretty-printed value, if any.
    pub fn trace_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert(
            "event".to_string(),
            serde_json::Value::String(self.event.clone()),
        );
        if let Some(value) = &self.data.value {
            obj.insert(
                "data".to_string(),
                serde_json::Value::String(value.pretty_print()),
            );
        }
        serde_json::Value::Object(obj)
    }
}
