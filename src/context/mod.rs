//! Render context
//!
//! The set of named variables and named template functions visible to a
//! fragment during rendering. Captured once per run and immutable for the
//! whole render pass; the core never reads process-global state, so the CLI
//! layer is responsible for collecting variables from flags and
//! configuration before the pipeline starts.

pub mod functions;

pub use functions::{BuiltinFunction, FunctionRegistry};

use std::collections::BTreeMap;

/// Variables and functions available to fragments during rendering
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
    functions: FunctionRegistry,
}

impl RenderContext {
    /// Context with the given variables and the standard function registry
    pub fn new(variables: BTreeMap<String, String>) -> Self {
        Self {
            variables,
            functions: FunctionRegistry::standard(),
        }
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_standard_registry() {
        let ctx = RenderContext::new(BTreeMap::new());
        assert!(ctx.functions().contains("mixin"));
        assert!(ctx.functions().contains("unique_op_id"));
    }

    #[test]
    fn test_variables_accessible() {
        let mut vars = BTreeMap::new();
        vars.insert("host".to_string(), "api.example.com".to_string());
        let ctx = RenderContext::new(vars);
        assert_eq!(
            ctx.variables().get("host").map(String::as_str),
            Some("api.example.com")
        );
    }
}
