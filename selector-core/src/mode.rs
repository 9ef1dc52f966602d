use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;
use crate::error::SelectorError;

const RAW_VALUE_LABEL: &str = "原始值";
const FIXED_SUBSTITUTION_LABEL: &str = "固定句式: 把图片中的[替换对象]替换成[目标对象]";

/// How the selected entry is turned into output text.
///
/// On the wire a mode is written as the label the editor shows, but the
/// snake_case names are accepted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ReplaceMode {
    /// Return the mapped value for the selected key.
    #[default]
    RawValue,
    /// Fill the fixed sentence template from the paired word lists.
    FixedSubstitution,
}

impl ReplaceMode {
    pub const ALL: [ReplaceMode; 2] = [ReplaceMode::RawValue, ReplaceMode::FixedSubstitution];

    pub fn label(self) -> &'static str {
        match self {
            ReplaceMode::RawValue => RAW_VALUE_LABEL,
            ReplaceMode::FixedSubstitution => FIXED_SUBSTITUTION_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Result<Self> {
        match label.trim() {
            RAW_VALUE_LABEL | "raw_value" => Ok(ReplaceMode::RawValue),
            FIXED_SUBSTITUTION_LABEL | "fixed_substitution" => Ok(ReplaceMode::FixedSubstitution),
            _ => Err(SelectorError::UnknownReplaceMode {
                label: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReplaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for ReplaceMode {
    type Error = SelectorError;

    fn try_from(label: String) -> Result<Self> {
        ReplaceMode::from_label(&label)
    }
}

impl From<ReplaceMode> for &'static str {
    fn from(mode: ReplaceMode) -> Self {
        mode.label()
    }
}
