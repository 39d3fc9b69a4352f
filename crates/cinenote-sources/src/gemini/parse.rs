//! Pulling JSON out of free-form model output.

/// Remove markdown code fences the model adds despite being told not to
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// The span from the first `[` to the last `]`, or `[]` when there is none.
///
/// Grounded answers wrap the array in prose and citations.
pub fn extract_json_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => "[]",
    }
}
