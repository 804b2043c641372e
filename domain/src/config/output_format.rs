//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished debate is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round's responses, scores, and disagreements
    Full,
    /// Only the assembled solution and consensus summary
    #[default]
    Solution,
    /// The whole result as JSON
    Json,
}
