use crate::dataset::{Attribute, AttributeValue, Dataset, Record};
use crate::error::EstimateError;
use crate::estimator::{AttributeMatch, ConstraintSet, MatchReport};

pub fn overall_match_percentage(
    dataset: &Dataset,
    constraints: &ConstraintSet,
) -> Result<f64, EstimateError> {
    let total = dataset.ensure_not_empty()?;
    let predicates = constraints.predicates();
    let matched = count_where(dataset, |record| predicates.iter().all(|p| p.matches(record)));
    Ok(percentage(matched, total))
}

pub fn per_attribute_match_percentage(
    dataset: &Dataset,
    attribute: &Attribute,
    value: &AttributeValue,
) -> Result<f64, EstimateError> {
    let total = dataset.ensure_not_empty()?;
    let matched = count_where(dataset, |record| record.has_value(attribute, value));
    Ok(percentage(matched, total))
}

/// Joint match plus one marginal match per constraint.
pub fn match_report(
    dataset: &Dataset,
    constraints: &ConstraintSet,
) -> Result<MatchReport, EstimateError> {
    let total = dataset.ensure_not_empty()?;
    let matched = count_where(dataset, |record| constraints.matches(record));

    let attribute_matches = constraints
        .iter()
        .map(|(attribute, value)| {
            let matched_records = count_where(dataset, |record| record.has_value(attribute, value));
            AttributeMatch {
                attribute: attribute.clone(),
                value: value.clone(),
                matched_records,
                percentage: percentage(matched_records, total),
            }
        })
        .collect();

    Ok(MatchReport {
        total_records: total,
        matched_records: matched,
        overall_percentage: percentage(matched, total),
        attribute_matches,
    })
}

fn count_where(dataset: &Dataset, predicate: impl Fn(&Record) -> bool) -> usize {
    dataset.iter().filter(|&record| predicate(record)).count()
}

pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    (part as f64 * 100.0) / total as f64
}
