use std::sync::Arc;

use thiserror::Error;

use walbench_domain::StrategyKind;

use crate::ports::UpdateProcedure;

/// Named mapping from strategy to executable update procedure.
///
/// Constructed once at process start and passed by handle; registration
/// order is the report order. Tests may register any subset.
#[derive(Default)]
pub struct StrategyRegistry {
    entries: Vec<(StrategyKind, Arc<dyn UpdateProcedure>)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registration-time programmer error; fails fast, never at run time.
    #[error("strategy already registered: {0}")]
    Duplicate(StrategyKind),
    #[error("unknown strategy: {0}")]
    Unknown(String),
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: StrategyKind,
        procedure: Arc<dyn UpdateProcedure>,
    ) -> Result<(), RegistryError> {
        if self.entries.iter().any(|(existing, _)| *existing == kind) {
            return Err(RegistryError::Duplicate(kind));
        }
        self.entries.push((kind, procedure));
        Ok(())
    }

    /// Resolve a strategy name. Checked before any timing starts, so an
    /// invalid name never opens a measurement window.
    pub fn lookup(
        &self,
        name: &str,
    ) -> Result<(StrategyKind, Arc<dyn UpdateProcedure>), RegistryError> {
        self.entries
            .iter()
            .find(|(kind, _)| kind.name() == name)
            .map(|(kind, procedure)| (*kind, Arc::clone(procedure)))
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))
    }

    /// Registered strategies in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
