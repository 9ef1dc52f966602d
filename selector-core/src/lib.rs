//! Prompt selector node state: per-node prompt tables, key resolution and
//! round-robin substitution from paired word lists.
#![deny(clippy::print_stdout, clippy::print_stderr)]

mod clock;
mod descriptor;
mod engine;
mod error;
mod instance;
mod mapping;
mod mode;
mod observer;
mod registry;
mod word_list;

pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use descriptor::CATEGORY;
pub use descriptor::DISPLAY_NAME;
pub use descriptor::HiddenInput;
pub use descriptor::InputKind;
pub use descriptor::InputSpec;
pub use descriptor::NODE_TYPE;
pub use descriptor::NodeDescriptor;
pub use descriptor::default_prompt_pairs;
pub use descriptor::node_descriptor;
pub use engine::EMPTY_WORD_LIST_MESSAGE;
pub use engine::ResolveRequest;
pub use engine::SelectorEngine;
pub use error::Result;
pub use error::SelectorError;
pub use instance::SelectorInstance;
pub use instance::Substitution;
pub use mapping::DEFAULT_PAIRS;
pub use mapping::MappingParse;
pub use mapping::PromptTable;
pub use mapping::default_table;
pub use mapping::parse_mapping;
pub use mode::ReplaceMode;
pub use observer::SelectorObserver;
pub use observer::TracingObserver;
pub use registry::InstanceHandle;
pub use registry::InstanceId;
pub use registry::InstanceRegistry;
pub use word_list::load_word_list;
