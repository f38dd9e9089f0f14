use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::dataset::options::AttributeOptions;
use crate::dataset::AttributeValue;
use crate::estimator::MatchReport;
use crate::i18n::Translations;
use crate::overview::Distribution;
use crate::scenario::ScenarioReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_match_table(report: &MatchReport, tr: &Translations) -> String {
    let mut table = new_table();
    table.set_header(vec![
        tr.translate("Attribute"),
        tr.translate("Value"),
        tr.translate("Matches"),
        tr.translate("Percentage"),
    ]);
    for m in &report.attribute_matches {
        table.add_row(vec![
            tr.translate(m.attribute.label()).to_string(),
            m.value.to_string(),
            format!("{}/{}", m.matched_records, report.total_records),
            format!("{:.2}%", m.percentage),
        ]);
    }

    let chance_cell = if report.matched_records > 0 {
        Cell::new(format!("{:.2}%", report.overall_percentage)).fg(Color::Green)
    } else {
        Cell::new(format!("{:.2}%", report.overall_percentage)).fg(Color::Red)
    };
    table.add_row(Row::from(vec![
        Cell::new(tr.translate("Chance to be CEO")),
        Cell::new("-"),
        Cell::new(format!(
            "{}/{}",
            report.matched_records, report.total_records
        )),
        chance_cell,
    ]));
    table.add_row(vec![
        tr.translate("Others").to_string(),
        "-".to_string(),
        format!(
            "{}/{}",
            report.total_records - report.matched_records,
            report.total_records
        ),
        format!("{:.2}%", report.others_percentage()),
    ]);

    let mut out = table.to_string();
    if let Some(rarest) = report.rarest_choice() {
        out.push_str(&format!(
            "\n{}: {} = {} ({:.2}%)",
            tr.translate("Rarest choice"),
            tr.translate(rarest.attribute.label()),
            rarest.value,
            rarest.percentage
        ));
    }
    out
}

pub fn render_scenario_table(report: &ScenarioReport, tr: &Translations) -> String {
    let mut table = new_table();
    table.set_header(vec![tr.translate("Attribute"), tr.translate("Value")]);
    for entry in &report.scenario.entries {
        table.add_row(vec![
            tr.translate(entry.attribute.label()).to_string(),
            entry.value.to_string(),
        ]);
    }
    format!(
        "{table}\n{}: {:.2}%",
        tr.translate("Profiles matching the whole scenario"),
        report.occurrence_percentage
    )
}

pub fn render_distribution_tables(distributions: &[Distribution], tr: &Translations) -> String {
    let mut sections = Vec::with_capacity(distributions.len());
    for dist in distributions {
        let mut table = new_table();
        table.set_header(vec![
            tr.translate(dist.attribute.label()),
            tr.translate("Count"),
            tr.translate("Percentage"),
        ]);
        for bucket in &dist.buckets {
            table.add_row(vec![
                bucket.value.to_string(),
                bucket.count.to_string(),
                format!("{:.2}%", bucket.percentage),
            ]);
        }
        sections.push(table.to_string());
    }
    sections.join("\n\n")
}

pub fn render_options_table(options: &[AttributeOptions], tr: &Translations) -> String {
    let mut table = new_table();
    table.set_header(vec![
        tr.translate("Attribute"),
        tr.translate("Default"),
        tr.translate("Range"),
        tr.translate("Options"),
    ]);
    for opt in options {
        let values = opt
            .values
            .iter()
            .map(|v| match v {
                AttributeValue::Text(text) => tr.translate(text).to_string(),
                AttributeValue::Count(count) => count.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            tr.translate(opt.attribute.label()).to_string(),
            opt.default
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            opt.range
                .map(|r| format!("{}..={}", r.min, r.max))
                .unwrap_or_else(|| "-".to_string()),
            values,
        ]);
    }
    table.to_string()
}
