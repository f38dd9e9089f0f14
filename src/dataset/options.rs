use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, AttributeKind, AttributeValue, Dataset};
use crate::error::EstimateError;
use crate::scenario::stats::tally;

/// Catch-all choice offered for open-ended attributes. It never occurs in the
/// data, so selecting it matches nothing.
pub const OTHER_OPTION: &str = "Others";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeOptions {
    pub attribute: Attribute,
    pub kind: AttributeKind,
    pub values: Vec<AttributeValue>,
    pub default: Option<AttributeValue>,
    pub range: Option<NumericRange>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumericRange {
    pub min: u32,
    pub max: u32,
}

pub fn attribute_options(
    dataset: &Dataset,
    attribute: &Attribute,
    include_other: bool,
    max_years: u32,
) -> Result<AttributeOptions, EstimateError> {
    dataset.ensure_not_empty()?;
    let mut values = tally(dataset.values(attribute))
        .into_iter()
        .map(|(value, _)| value)
        .collect::<Vec<_>>();
    if values.is_empty() {
        return Err(EstimateError::UnknownAttribute(attribute.clone()));
    }

    let kind = attribute.kind();
    let (default, range) = match kind {
        AttributeKind::Numeric => {
            let counts = values
                .iter()
                .filter_map(AttributeValue::as_count)
                .collect::<Vec<_>>();
            let observed_max = counts.iter().copied().max().unwrap_or(0);
            let default = truncated_mean(dataset, attribute).map(AttributeValue::Count);
            (
                default,
                Some(NumericRange {
                    min: 0,
                    max: max_years.max(observed_max),
                }),
            )
        }
        AttributeKind::Categorical => (values.first().cloned(), None),
    };

    if include_other && kind == AttributeKind::Categorical {
        let other = AttributeValue::text(OTHER_OPTION);
        if !values.contains(&other) {
            values.push(other);
        }
    }

    Ok(AttributeOptions {
        attribute: attribute.clone(),
        kind,
        values,
        default,
        range,
    })
}

fn truncated_mean(dataset: &Dataset, attribute: &Attribute) -> Option<u32> {
    let counts = dataset
        .iter()
        .filter_map(|r| r.count(attribute))
        .collect::<Vec<_>>();
    if counts.is_empty() {
        return None;
    }
    let sum: u64 = counts.iter().map(|v| u64::from(*v)).sum();
    u32::try_from(sum / counts.len() as u64).ok()
}

#[cfg(test)]
mod tests {
    use super::{attribute_options, OTHER_OPTION};
    use crate::dataset::fixtures::ten_executives;
    use crate::dataset::{Attribute, AttributeValue, Dataset};
    use crate::error::EstimateError;

    #[test]
    fn lists_distinct_values_in_first_seen_order() {
        let options = attribute_options(&ten_executives(), &Attribute::Major, false, 50)
            .expect("options");
        let labels = options
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["Law", "Accounting", "Finance", "Engineering", "Computer Science"]
        );
        assert_eq!(options.default, Some(AttributeValue::text("Law")));
        assert!(options.range.is_none());
    }

    #[test]
    fn appends_other_choice_when_requested() {
        let options = attribute_options(&ten_executives(), &Attribute::Sector, true, 50)
            .expect("options");
        assert_eq!(options.values.last(), Some(&AttributeValue::text(OTHER_OPTION)));
    }

    #[test]
    fn numeric_options_default_to_truncated_mean() {
        // years: 20,18,15,22,25,19,12,30,27,10 -> mean 19.8
        let options =
            attribute_options(&ten_executives(), &Attribute::YearsBeforeAppointment, true, 50)
                .expect("options");
        assert_eq!(options.default, Some(AttributeValue::Count(19)));
        let range = options.range.expect("numeric range");
        assert_eq!((range.min, range.max), (0, 50));
        assert!(!options.values.contains(&AttributeValue::text(OTHER_OPTION)));
    }

    #[test]
    fn errors_on_empty_and_unknown() {
        assert_eq!(
            attribute_options(&Dataset::default(), &Attribute::Major, false, 50),
            Err(EstimateError::EmptyDataset)
        );
        let board = Attribute::Custom("board".into());
        assert_eq!(
            attribute_options(&ten_executives(), &board, false, 50),
            Err(EstimateError::UnknownAttribute(board))
        );
    }
}
