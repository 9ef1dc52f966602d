//! Input schema advertised to the workflow editor.

use serde::Serialize;

use crate::mapping::DEFAULT_PAIRS;
use crate::mode::ReplaceMode;

pub const NODE_TYPE: &str = "PromptSelector";
pub const DISPLAY_NAME: &str = "提示词选择器";
pub const CATEGORY: &str = "Prompt Selector";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub function: &'static str,
    pub return_types: Vec<&'static str>,
    pub required: Vec<InputSpec>,
    pub hidden: Vec<HiddenInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: InputKind,
    pub default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    String { multiline: bool },
    Choice { options: Vec<String> },
}

/// Value the host fills in on its own, such as the node's unique id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenInput {
    pub name: &'static str,
    pub binding: &'static str,
}

impl InputSpec {
    fn string(name: &'static str, default: String, label: Option<&'static str>) -> Self {
        Self {
            name,
            kind: InputKind::String { multiline: false },
            default,
            label,
        }
    }
}

/// JSON text of the default mapping shown in a freshly added node.
pub fn default_prompt_pairs() -> String {
    let pairs: Vec<String> = DEFAULT_PAIRS
        .iter()
        .map(|(key, value)| format!("\"{key}\": \"{value}\""))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

pub fn node_descriptor() -> NodeDescriptor {
    let default_keys: Vec<String> = DEFAULT_PAIRS
        .iter()
        .map(|(key, _)| (*key).to_string())
        .collect();
    let default_key = default_keys.first().cloned().unwrap_or_default();

    NodeDescriptor {
        node_type: NODE_TYPE,
        display_name: DISPLAY_NAME,
        category: CATEGORY,
        function: "process",
        return_types: vec!["STRING"],
        required: vec![
            InputSpec {
                name: "prompt_pairs",
                kind: InputKind::String { multiline: true },
                default: default_prompt_pairs(),
                label: None,
            },
            InputSpec {
                name: "selected_key",
                kind: InputKind::Choice {
                    options: default_keys,
                },
                default: default_key,
                label: None,
            },
            InputSpec {
                name: "replace_mode",
                kind: InputKind::Choice {
                    options: ReplaceMode::ALL
                        .iter()
                        .map(|mode| mode.label().to_string())
                        .collect(),
                },
                default: ReplaceMode::default().label().to_string(),
                label: None,
            },
            InputSpec::string("manual_input", String::new(), Some("手动输入词语")),
            InputSpec::string("source_word_file", String::new(), Some("替换对象文件路径")),
            InputSpec::string("target_word_file", String::new(), Some("目标对象文件路径")),
        ],
        hidden: vec![HiddenInput {
            name: "node_id",
            binding: "UNIQUE_ID",
        }],
    }
}
