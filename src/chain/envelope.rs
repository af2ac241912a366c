//! Uniform response envelope.
//!
//! Every response, success or failure, carries the service identity and a
//! minute:second timestamp; exactly one of `data`/`error` is populated.
//! This normalizes the historically divergent plain-string and structured
//! response shapes into a single type.

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub service: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Builds envelopes stamped with this node's identity.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    service: String,
}

impl MessageFormatter {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn success(&self, data: Value) -> ResponseEnvelope {
        ResponseEnvelope {
            service: self.service.clone(),
            timestamp: stamp(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(&self, error: impl std::fmt::Display) -> ResponseEnvelope {
        ResponseEnvelope {
            service: self.service.clone(),
            timestamp: stamp(),
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// The original replied `<id> -> unavailable` for injected faults.
    pub fn unavailable(&self) -> ResponseEnvelope {
        self.error(format!("{} unavailable", self.service))
    }
}

fn stamp() -> String {
    let now = Local::now();
    format!("{:02}:{:02}", now.minute(), now.second())
}
