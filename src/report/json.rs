use crate::report::comparison::RadarComparison;

/// Non-finite values serialize as `null`.
pub fn comparison_json(cmp: &RadarComparison) -> serde_json::Result<String> {
    serde_json::to_string_pretty(cmp)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
