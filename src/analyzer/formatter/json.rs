//! JSON formatter.

use crate::analyzer::types::AnalysisResult;
use crate::error::Result;

/// Format an analysis result as JSON.
pub fn format(result: &AnalysisResult, pretty: bool) -> Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(output)
}
