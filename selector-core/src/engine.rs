use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::error::Result;
use crate::mode::ReplaceMode;
use crate::observer::SelectorObserver;
use crate::observer::TracingObserver;
use crate::registry::InstanceId;
use crate::registry::InstanceRegistry;
use crate::word_list::load_word_list;

/// Returned instead of a sentence when either word list has no entries.
pub const EMPTY_WORD_LIST_MESSAGE: &str = "替换对象或目标对象文件为空";

/// Inputs of one node execution, named as the editor names them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub node_id: String,
    #[serde(default)]
    pub prompt_pairs: String,
    #[serde(default)]
    pub selected_key: String,
    #[serde(default)]
    pub replace_mode: ReplaceMode,
    #[serde(default)]
    pub manual_input: String,
    #[serde(default)]
    pub source_word_file: String,
    #[serde(default)]
    pub target_word_file: String,
}

/// Resolution entry point: owns the instance registry and the injected
/// observer and clock.
#[derive(Clone)]
pub struct SelectorEngine {
    registry: InstanceRegistry,
    observer: Arc<dyn SelectorObserver>,
    clock: Arc<dyn Clock>,
}

impl Default for SelectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorEngine {
    pub fn new() -> Self {
        Self::with_parts(
            InstanceRegistry::new(),
            Arc::new(TracingObserver),
            Arc::new(SystemClock),
        )
    }

    pub fn with_parts(
        registry: InstanceRegistry,
        observer: Arc<dyn SelectorObserver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            observer,
            clock,
        }
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    /// Produces the output string for one execution of the node.
    ///
    /// Precedence: non-blank manual input, then the selected mode. The
    /// mapping is reparsed first in every case so the key list stays current.
    pub fn resolve(&self, request: &ResolveRequest) -> Result<String> {
        let id = InstanceId::new(request.node_id.as_str())?;
        let handle = self.registry.get_or_create(&id);
        let mut instance = handle.lock();
        let observer = self.observer.as_ref();

        instance.reparse(&request.prompt_pairs, observer);

        let manual = request.manual_input.trim();
        if !manual.is_empty() {
            observer.on_info(&format!("node {id}: using manual input {manual:?}"));
            return Ok(self.stamp(manual));
        }

        let value = instance.resolve_value(&request.selected_key, observer);
        match request.replace_mode {
            ReplaceMode::RawValue => {
                observer.on_info(&format!("node {id}: returning selected value {value:?}"));
                Ok(self.stamp(&value))
            }
            ReplaceMode::FixedSubstitution => {
                let source_words = self.load_words(&request.source_word_file);
                let target_words = self.load_words(&request.target_word_file);
                match instance.substitute(&source_words, &target_words, observer) {
                    Some(substitution) => {
                        observer.on_info(&format!(
                            "node {id}: substitution output {:?}",
                            substitution.sentence
                        ));
                        Ok(format!(
                            "{} [idx={}]",
                            substitution.sentence, substitution.index
                        ))
                    }
                    None => {
                        observer.on_warning(&format!(
                            "node {id}: source or target word list is empty"
                        ));
                        Ok(EMPTY_WORD_LIST_MESSAGE.to_string())
                    }
                }
            }
        }
    }

    /// Current keys of an existing instance, in authored order.
    pub fn keys(&self, id: &InstanceId) -> Option<Vec<String>> {
        self.registry.get(id).map(|handle| handle.lock().keys())
    }

    fn stamp(&self, text: &str) -> String {
        format!("{text} [time={}]", self.clock.epoch_seconds())
    }

    fn load_words(&self, path: &str) -> Vec<String> {
        match load_word_list(path) {
            Ok(words) => {
                self.observer
                    .on_info(&format!("loaded {} words from {path}", words.len()));
                words
            }
            Err(err) => {
                self.observer.on_warning(&err.to_string());
                Vec::new()
            }
        }
    }
}
