use rmcp::model::{CallToolResult, Content, ErrorData};
use serde_json::{Value, json};

use crate::server::errors::internal_error;

/// Wrap a JSON value as a single pretty-printed text item.
pub(crate) fn json_text_result(value: &Value) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value).map_err(|error| {
        internal_error(
            "SERIALIZATION_FAILED",
            format!("failed to serialize tool result: {error}"),
            json!({}),
            "Retry the call; report the issue if it persists.",
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Wrap a markdown report as a single text item.
pub(crate) fn markdown_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Text of the first content item.
#[cfg(test)]
pub(crate) fn first_text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.clone())
        .expect("text content")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_results_are_pretty_printed_text() {
        let result = json_text_result(&json!({"total": 1})).expect("result");
        assert_eq!(result.content.len(), 1);
        assert_eq!(first_text(&result), "{\n  \"total\": 1\n}");
    }
}
