use anyhow::{Context, Result};
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing output as JSON")
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::dataset::fixtures::ten_executives;
    use crate::scenario::{default_best_scenario, ScenarioReport};

    #[test]
    fn scenario_report_serializes_with_slug_attributes_and_occurrence() {
        let dataset = ten_executives();
        let report =
            ScenarioReport::new(&dataset, default_best_scenario(&dataset).unwrap()).unwrap();
        let json = render_json(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = &parsed["scenario"]["entries"];
        assert_eq!(entries[0]["attribute"], "major");
        assert_eq!(entries[0]["kind"], "categorical");
        assert_eq!(entries[0]["value"], "Law");
        assert_eq!(entries[4]["value"], 19);
        assert_eq!(parsed["occurrence_percentage"], 0.0);
    }
}
