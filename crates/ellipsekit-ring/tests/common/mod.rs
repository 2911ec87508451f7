//! Shared fixtures for ring tests

#![allow(dead_code)]

use async_trait::async_trait;
use ellipsekit_core::program::{Variable, VariableValueType};
use ellipsekit_core::{Error, Result, SymbolError, SymbolService};
use parking_lot::Mutex;

/// Symbol service that echoes the suggested name and records every call
#[derive(Default)]
pub struct RecordingSymbols {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingSymbols {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SymbolService for RecordingSymbols {
    async fn generate_variable(
        &self,
        suggested: &str,
        value_type: VariableValueType,
    ) -> Result<Variable> {
        self.calls.lock().push(suggested.to_string());
        if self.fail {
            return Err(Error::from(SymbolError::GenerationFailed {
                suggested: suggested.to_string(),
                reason: "namespace locked".to_string(),
            }));
        }
        Ok(Variable {
            name: suggested.to_string(),
            value_type,
        })
    }
}
