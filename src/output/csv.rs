use anyhow::Result;

use crate::dataset::options::AttributeOptions;
use crate::estimator::MatchReport;
use crate::overview::Distribution;
use crate::scenario::ScenarioReport;

pub fn match_to_csv(report: &MatchReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["attribute", "value", "matched", "total", "percentage"])?;
    for m in &report.attribute_matches {
        writer.write_record([
            m.attribute.to_string(),
            m.value.to_string(),
            m.matched_records.to_string(),
            report.total_records.to_string(),
            format!("{:.4}", m.percentage),
        ])?;
    }
    writer.write_record([
        "overall".to_string(),
        String::new(),
        report.matched_records.to_string(),
        report.total_records.to_string(),
        format!("{:.4}", report.overall_percentage),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn scenario_to_csv(report: &ScenarioReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["attribute", "kind", "value"])?;
    for entry in &report.scenario.entries {
        writer.write_record([
            entry.attribute.to_string(),
            format!("{:?}", entry.kind).to_lowercase(),
            entry.value.to_string(),
        ])?;
    }
    writer.write_record([
        "occurrence_percentage".to_string(),
        String::new(),
        format!("{:.4}", report.occurrence_percentage),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn overview_to_csv(distributions: &[Distribution]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["attribute", "value", "count", "percentage"])?;
    for dist in distributions {
        for bucket in &dist.buckets {
            writer.write_record([
                dist.attribute.to_string(),
                bucket.value.to_string(),
                bucket.count.to_string(),
                format!("{:.4}", bucket.percentage),
            ])?;
        }
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn options_to_csv(options: &[AttributeOptions]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["attribute", "kind", "value", "default", "min", "max"])?;
    for opt in options {
        let default = opt
            .default
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let (min, max) = opt
            .range
            .map(|r| (r.min.to_string(), r.max.to_string()))
            .unwrap_or_default();
        for value in &opt.values {
            writer.write_record([
                opt.attribute.to_string(),
                format!("{:?}", opt.kind).to_lowercase(),
                value.to_string(),
                default.clone(),
                min.clone(),
                max.clone(),
            ])?;
        }
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
