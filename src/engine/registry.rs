use super::{EngineHandle, SolverEngine};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Name under which the reference engine is conventionally registered.
pub const DEFAULT_ALGORITHM: &str = "khovratovich";

/// Immutable mapping from algorithm name to engine.
///
/// Built once at startup with [`EngineRegistryBuilder`] and shared behind an `Arc`;
/// there is no runtime registration.
#[derive(Clone, Debug)]
pub struct EngineRegistry {
    engines: BTreeMap<Arc<str>, EngineHandle>,
    default: Arc<str>,
}

impl EngineRegistry {
    pub fn builder() -> EngineRegistryBuilder {
        EngineRegistryBuilder::default()
    }

    /// Registry holding a single engine under `name`, which is also the default.
    pub fn single(name: &str, engine: Arc<dyn SolverEngine>) -> Result<Self> {
        Self::builder().register(name, engine).default_algorithm(name).build()
    }

    /// Resolve `name`, or the default engine when no name is given.
    pub fn select(&self, name: Option<&str>) -> Result<EngineHandle> {
        let wanted = name.unwrap_or(&*self.default);
        self.engines.get(wanted).cloned().ok_or_else(|| {
            debug!(algorithm = wanted, "rejecting unknown algorithm");
            Error::UnknownAlgorithm(wanted.to_owned())
        })
    }

    pub fn default_algorithm(&self) -> &str {
        &self.default
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(|name| &**name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.engines.contains_key(name)
    }
}

#[derive(Default)]
pub struct EngineRegistryBuilder {
    engines: Vec<(String, Arc<dyn SolverEngine>)>,
    default: Option<String>,
}

impl EngineRegistryBuilder {
    pub fn register(mut self, name: impl Into<String>, engine: Arc<dyn SolverEngine>) -> Self {
        self.engines.push((name.into(), engine));
        self
    }

    /// Name resolved when callers do not pick an algorithm. Defaults to
    /// [`DEFAULT_ALGORITHM`].
    pub fn default_algorithm(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.engines.is_empty() {
            return Err(Error::InvalidRegistry(
                "at least one engine must be registered".into(),
            ));
        }
        let mut names: Vec<&str> = self.engines.iter().map(|(n, _)| n.as_str()).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(Error::InvalidRegistry("engine names must be non-empty".into()));
        }
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::InvalidRegistry(format!(
                "engine {:?} registered twice",
                dup[0]
            )));
        }
        let default = self.default.as_deref().unwrap_or(DEFAULT_ALGORITHM);
        if !names.contains(&default) {
            return Err(Error::InvalidRegistry(format!(
                "default algorithm {default:?} is not registered"
            )));
        }
        Ok(())
    }

    pub fn build(self) -> Result<EngineRegistry> {
        self.validate()?;
        let default: Arc<str> = Arc::from(self.default.as_deref().unwrap_or(DEFAULT_ALGORITHM));
        let engines = self
            .engines
            .into_iter()
            .map(|(name, engine)| {
                let name: Arc<str> = Arc::from(name);
                (name.clone(), EngineHandle::new(name, engine))
            })
            .collect();
        Ok(EngineRegistry { engines, default })
    }
}
