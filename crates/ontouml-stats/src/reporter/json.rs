//! JSON reporter for run summaries

use anyhow::Result;

use crate::pipeline::RunSummary;

pub struct JsonReporter;

impl JsonReporter {
    /// Serialize a summary, pretty-printed when `pretty` is set.
    ///
    /// Metrics that are not available serialize as `null`.
    pub fn format(summary: &RunSummary, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(summary)?
        } else {
            serde_json::to_string(summary)?
        };
        Ok(output)
    }
}
