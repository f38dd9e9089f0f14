use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, AttributeValue, Dataset};
use crate::error::EstimateError;
use crate::estimator::evaluator::percentage;
use crate::scenario::stats::tally;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Distribution {
    pub attribute: Attribute,
    pub total_records: usize,
    pub buckets: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionBucket {
    pub value: AttributeValue,
    pub count: usize,
    pub percentage: f64,
}

/// Largest bucket first, equal counts in first-seen order. Percentages are of
/// all records; records lacking a custom attribute only add to the total.
pub fn distribution(dataset: &Dataset, attribute: &Attribute) -> Result<Distribution, EstimateError> {
    let total = dataset.ensure_not_empty()?;
    let mut counts = tally(dataset.values(attribute));
    if counts.is_empty() {
        return Err(EstimateError::UnknownAttribute(attribute.clone()));
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(Distribution {
        attribute: attribute.clone(),
        total_records: total,
        buckets: counts
            .into_iter()
            .map(|(value, count)| DistributionBucket {
                value,
                count,
                percentage: percentage(count, total),
            })
            .collect(),
    })
}

pub fn overview(dataset: &Dataset, attributes: &[Attribute]) -> Result<Vec<Distribution>, EstimateError> {
    if attributes.is_empty() {
        return Attribute::CORE
            .iter()
            .map(|attribute| distribution(dataset, attribute))
            .collect();
    }
    attributes
        .iter()
        .map(|attribute| distribution(dataset, attribute))
        .collect()
}
