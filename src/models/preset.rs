//! 摘要长度预设
//!
//! 预设只影响提示词中的措辞，不约束实际输出长度。

use crate::error::PipelineError;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 摘要长度预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLengthPreset {
    Flash,
    Detailed,
    Extra,
}

/// 预设键 → (预设, 长度描述)
static PRESET_TABLE: phf::Map<&'static str, (SummaryLengthPreset, &'static str)> = phf_map! {
    "flash" => (SummaryLengthPreset::Flash, "~1 page (500 words)"),
    "detailed" => (SummaryLengthPreset::Detailed, "~5 pages (2500 words)"),
    "extra" => (SummaryLengthPreset::Extra, "~15 pages (7500 words)"),
};

impl SummaryLengthPreset {
    pub const ALL: [SummaryLengthPreset; 3] = [
        SummaryLengthPreset::Flash,
        SummaryLengthPreset::Detailed,
        SummaryLengthPreset::Extra,
    ];

    /// 解析预设键，未识别的键返回 `InvalidPreset`
    pub fn parse(key: &str) -> Result<Self, PipelineError> {
        PRESET_TABLE
            .get(key)
            .map(|(preset, _)| *preset)
            .ok_or_else(|| PipelineError::InvalidPreset {
                preset: key.to_string(),
            })
    }

    pub fn key(&self) -> &'static str {
        match self {
            SummaryLengthPreset::Flash => "flash",
            SummaryLengthPreset::Detailed => "detailed",
            SummaryLengthPreset::Extra => "extra",
        }
    }

    /// 提示词中使用的长度描述
    pub fn descriptor(&self) -> &'static str {
        PRESET_TABLE
            .get(self.key())
            .map(|(_, descriptor)| *descriptor)
            .unwrap_or_default()
    }
}

impl FromStr for SummaryLengthPreset {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SummaryLengthPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
