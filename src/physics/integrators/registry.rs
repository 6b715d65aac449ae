//! Name lookup for the built-in integrators
//!
//! Each integrator describes itself (canonical name, aliases, convergence
//! order). The registry reads that metadata once and builds a table from
//! every accepted spelling to the [`IntegratorKind`] that a parameter
//! snapshot carries.

use super::{Integrator, IntegratorKind};
use std::collections::{BTreeSet, HashMap};

/// Registry mapping canonical names and aliases to integrator kinds
#[derive(Debug, Clone)]
pub struct IntegratorRegistry {
    kinds: HashMap<String, IntegratorKind>,
}

impl IntegratorRegistry {
    /// Create an empty registry without any pre-registered integrators.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Register every built-in integrator.
    ///
    /// Returns self for method chaining.
    pub fn with_standard_integrators(mut self) -> Self {
        for kind in IntegratorKind::ALL {
            self.register(kind);
        }
        self
    }

    /// Register a single integrator kind.
    ///
    /// Returns self for method chaining.
    pub fn with_kind(mut self, kind: IntegratorKind) -> Self {
        self.register(kind);
        self
    }

    pub fn register(&mut self, kind: IntegratorKind) {
        let integrator = kind.integrator();

        self.kinds.insert(integrator.name().to_string(), kind);
        for alias in integrator.aliases() {
            self.kinds.insert(alias.to_string(), kind);
        }
    }

    /// Resolve a canonical name or alias
    pub fn resolve(&self, name: &str) -> Result<IntegratorKind, String> {
        self.kinds.get(name).copied().ok_or_else(|| {
            let alias_names: Vec<String> = self
                .list_aliases()
                .into_iter()
                .map(|(alias, _)| alias)
                .collect();
            format!(
                "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                name,
                self.list_available().join(", "),
                alias_names.join(", ")
            )
        })
    }

    /// Resolve a name and box a fresh instance of the integrator
    pub fn create(&self, name: &str) -> Result<Box<dyn Integrator>, String> {
        self.resolve(name).map(|kind| kind.integrator().clone_box())
    }

    /// Sorted canonical names
    pub fn list_available(&self) -> Vec<String> {
        self.kinds
            .values()
            .map(|kind| kind.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted `(alias, canonical)` pairs
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .kinds
            .iter()
            .filter(|(key, kind)| key.as_str() != kind.name())
            .map(|(key, kind)| (key.clone(), kind.name().to_string()))
            .collect();

        aliases.sort_by(|a, b| a.0.cmp(&b.0));
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
