use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::Serialize;

use crate::error::Result;
use crate::error::SelectorError;
use crate::instance::SelectorInstance;

/// Host-supplied identifier of one node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Any non-empty string is a valid id, including whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(SelectorError::EmptyInstanceId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared handle to an instance owned by an [`InstanceRegistry`].
#[derive(Debug, Clone, Default)]
pub struct InstanceHandle {
    inner: Arc<Mutex<SelectorInstance>>,
}

impl InstanceHandle {
    /// Locks the instance for the duration of one resolution call.
    pub fn lock(&self) -> MutexGuard<'_, SelectorInstance> {
        // Every mutation leaves the instance consistent, so a panic elsewhere
        // does not invalidate it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &InstanceHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Maps instance ids to their state. Instances are created on first use and
/// live as long as the registry.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    instances: Arc<RwLock<HashMap<InstanceId, InstanceHandle>>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&self, id: &InstanceId) -> InstanceHandle {
        if let Some(handle) = self.get(id) {
            return handle;
        }
        let mut guard = self
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(id.clone()).or_default().clone()
    }

    /// Looks up an existing instance without creating one.
    pub fn get(&self, id: &InstanceId) -> Option<InstanceHandle> {
        let guard = self
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
