//! Sequential symbol service

use async_trait::async_trait;
use ellipsekit_core::program::{Variable, VariableValueType};
use ellipsekit_core::{Result, SymbolError, SymbolService};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Issues unique names: `<suggested>`, then `<suggested>_1`, `<suggested>_2`...
#[derive(Debug, Default)]
pub struct SequentialSymbolService {
    issued: Mutex<HashSet<String>>,
    requests: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl SequentialSymbolService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following request fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Suggested names received so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.lock().contains(name)
    }
}

#[async_trait]
impl SymbolService for SequentialSymbolService {
    async fn generate_variable(
        &self,
        suggested: &str,
        value_type: VariableValueType,
    ) -> Result<Variable> {
        self.requests.lock().push(suggested.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(SymbolError::GenerationFailed {
                suggested: suggested.to_string(),
                reason: "symbol table unavailable".to_string(),
            }
            .into());
        }

        let mut issued = self.issued.lock();
        let mut name = suggested.to_string();
        let mut n = 0;
        while issued.contains(&name) {
            n += 1;
            name = format!("{}_{}", suggested, n);
        }
        issued.insert(name.clone());

        Ok(Variable { name, value_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unique_names() {
        let symbols = SequentialSymbolService::new();
        let mut names = Vec::new();
        for _ in 0..3 {
            let v = symbols
                .generate_variable("EllipsePoint0", VariableValueType::Waypoint)
                .await
                .unwrap();
            names.push(v.name);
        }
        assert_eq!(names, vec!["EllipsePoint0", "EllipsePoint0_1", "EllipsePoint0_2"]);
        assert!(symbols.is_issued("EllipsePoint0_1"));
    }

    #[tokio::test]
    async fn test_failing() {
        let symbols = SequentialSymbolService::new();
        symbols.set_failing(true);
        let err = symbols
            .generate_variable("p", VariableValueType::Pose)
            .await
            .unwrap_err();
        assert!(err.is_symbol_error());
        assert!(!symbols.is_issued("p"));
        assert_eq!(symbols.requests(), vec!["p"]);
    }
}
