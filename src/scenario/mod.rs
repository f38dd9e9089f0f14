pub mod stats;

use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, AttributeKind, AttributeValue, Dataset};
use crate::error::EstimateError;
use crate::estimator::evaluator::overall_match_percentage;
use crate::estimator::ConstraintSet;
use crate::scenario::stats::{lower_median, mode};

/// Per-attribute aggregates; the combination need not exist in the data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioRecord {
    pub entries: Vec<ScenarioEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioEntry {
    pub attribute: Attribute,
    pub kind: AttributeKind,
    pub value: AttributeValue,
}

impl ScenarioRecord {
    pub fn get(&self, attribute: &Attribute) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|e| e.attribute == *attribute)
            .map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_constraints(&self) -> ConstraintSet {
        self.entries
            .iter()
            .map(|e| (e.attribute.clone(), e.value.clone()))
            .collect()
    }
}

/// A scenario with the share of real records matching all of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioReport {
    pub scenario: ScenarioRecord,
    pub occurrence_percentage: f64,
}

impl ScenarioReport {
    pub fn new(dataset: &Dataset, scenario: ScenarioRecord) -> Result<Self, EstimateError> {
        let occurrence_percentage = overall_match_percentage(dataset, &scenario.to_constraints())?;
        Ok(Self {
            scenario,
            occurrence_percentage,
        })
    }
}

/// Entries come back categorical first, then numeric, each in the order
/// requested.
pub fn best_scenario(
    dataset: &Dataset,
    categorical: &[Attribute],
    numeric: &[Attribute],
) -> Result<ScenarioRecord, EstimateError> {
    dataset.ensure_not_empty()?;
    if let Some(both) = categorical.iter().find(|a| numeric.contains(a)) {
        return Err(EstimateError::OverlappingAttribute(both.clone()));
    }

    let mut entries = Vec::with_capacity(categorical.len() + numeric.len());
    for attribute in categorical {
        entries.push(ScenarioEntry {
            attribute: attribute.clone(),
            kind: AttributeKind::Categorical,
            value: mode_of(dataset, attribute)?,
        });
    }
    for attribute in numeric {
        entries.push(ScenarioEntry {
            attribute: attribute.clone(),
            kind: AttributeKind::Numeric,
            value: median_of(dataset, attribute)?,
        });
    }
    Ok(ScenarioRecord { entries })
}

pub fn default_best_scenario(dataset: &Dataset) -> Result<ScenarioRecord, EstimateError> {
    let (numeric, categorical): (Vec<Attribute>, Vec<Attribute>) = Attribute::CORE
        .into_iter()
        .partition(|a| a.kind() == AttributeKind::Numeric);
    let mut scenario = best_scenario(dataset, &categorical, &numeric)?;
    scenario
        .entries
        .sort_by(|a, b| a.attribute.cmp(&b.attribute));
    Ok(scenario)
}

fn mode_of(dataset: &Dataset, attribute: &Attribute) -> Result<AttributeValue, EstimateError> {
    mode(dataset.values(attribute)).ok_or_else(|| EstimateError::UnknownAttribute(attribute.clone()))
}

fn median_of(dataset: &Dataset, attribute: &Attribute) -> Result<AttributeValue, EstimateError> {
    let mut counts = Vec::with_capacity(dataset.len());
    for value in dataset.values(attribute) {
        match value {
            AttributeValue::Count(v) => counts.push(v),
            AttributeValue::Text(_) => {
                return Err(EstimateError::NotNumeric {
                    attribute: attribute.clone(),
                })
            }
        }
    }
    lower_median(&counts)
        .map(AttributeValue::Count)
        .ok_or_else(|| EstimateError::UnknownAttribute(attribute.clone()))
}

#[cfg(test)]
mod tests {
    use super::{best_scenario, default_best_scenario};
    use crate::dataset::fixtures::{record, ten_executives};
    use crate::dataset::{Attribute, AttributeValue, Dataset};
    use crate::error::EstimateError;
    use crate::estimator::evaluator::overall_match_percentage;

    #[test]
    fn picks_mode_for_categorical_attributes() {
        let dataset = Dataset::new(vec![
            record("A", "Finance", 1),
            record("A", "Finance", 2),
            record("B", "Tech", 3),
        ]);
        let scenario = best_scenario(&dataset, &[Attribute::Major], &[]).expect("scenario");
        assert_eq!(
            scenario.get(&Attribute::Major),
            Some(&AttributeValue::text("A"))
        );
    }

    #[test]
    fn picks_lower_median_for_even_counts() {
        let dataset = Dataset::new(vec![
            record("A", "Finance", 1),
            record("A", "Finance", 2),
            record("B", "Tech", 3),
            record("B", "Tech", 4),
        ]);
        let scenario = best_scenario(&dataset, &[], &[Attribute::YearsBeforeAppointment])
            .expect("scenario");
        assert_eq!(
            scenario.get(&Attribute::YearsBeforeAppointment),
            Some(&AttributeValue::Count(2))
        );
    }

    #[test]
    fn mode_tie_goes_to_first_record() {
        let dataset = Dataset::new(vec![
            record("Law", "Tech", 1),
            record("Accounting", "Finance", 2),
            record("Accounting", "Tech", 3),
            record("Law", "Finance", 4),
        ]);
        let scenario =
            best_scenario(&dataset, &[Attribute::Major, Attribute::Sector], &[]).expect("scenario");
        assert_eq!(scenario.get(&Attribute::Major), Some(&AttributeValue::text("Law")));
        assert_eq!(scenario.get(&Attribute::Sector), Some(&AttributeValue::text("Tech")));
    }

    #[test]
    fn default_scenario_covers_core_attributes_in_column_order() {
        let scenario = default_best_scenario(&ten_executives()).expect("scenario");
        let order = scenario
            .entries
            .iter()
            .map(|e| e.attribute.clone())
            .collect::<Vec<_>>();
        assert_eq!(order, Attribute::CORE.to_vec());
        assert_eq!(scenario.get(&Attribute::Sector), Some(&AttributeValue::text("Finance")));
        assert_eq!(scenario.get(&Attribute::Major), Some(&AttributeValue::text("Law")));
        // sorted: 10,12,15,18,19,20,22,25,27,30 -> lower middle 19
        assert_eq!(
            scenario.get(&Attribute::YearsBeforeAppointment),
            Some(&AttributeValue::Count(19))
        );
    }

    #[test]
    fn composite_scenario_may_not_exist_in_data() {
        let dataset = Dataset::new(vec![
            record("Law", "Tech", 1),
            record("Law", "Energy", 1),
            record("Accounting", "Finance", 1),
            record("Finance", "Finance", 1),
        ]);
        let scenario = best_scenario(&dataset, &[Attribute::Major, Attribute::Sector], &[])
            .expect("scenario");
        let pct = overall_match_percentage(&dataset, &scenario.to_constraints()).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn reports_empty_unknown_and_misclassified_attributes() {
        assert_eq!(
            best_scenario(&Dataset::default(), &[Attribute::Major], &[]),
            Err(EstimateError::EmptyDataset)
        );

        let board = Attribute::Custom("board".into());
        assert_eq!(
            best_scenario(&ten_executives(), &[board.clone()], &[]),
            Err(EstimateError::UnknownAttribute(board))
        );
        assert_eq!(
            best_scenario(&ten_executives(), &[], &[Attribute::Sector]),
            Err(EstimateError::NotNumeric {
                attribute: Attribute::Sector
            })
        );
        assert_eq!(
            best_scenario(
                &ten_executives(),
                &[Attribute::Sector],
                &[Attribute::Sector]
            ),
            Err(EstimateError::OverlappingAttribute(Attribute::Sector))
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let dataset = ten_executives();
        assert_eq!(
            default_best_scenario(&dataset),
            default_best_scenario(&dataset)
        );
    }
}
