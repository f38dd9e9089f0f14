pub mod constraints;
pub mod evaluator;

use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, AttributeValue};

pub use constraints::{parse_assignment, ConstraintParseError, ConstraintSet, Predicate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchReport {
    pub total_records: usize,
    pub matched_records: usize,
    pub overall_percentage: f64,
    pub attribute_matches: Vec<AttributeMatch>,
}

impl MatchReport {
    pub fn others_percentage(&self) -> f64 {
        100.0 - self.overall_percentage
    }

    pub fn rarest_choice(&self) -> Option<&AttributeMatch> {
        self.attribute_matches
            .iter()
            .min_by(|a, b| a.percentage.total_cmp(&b.percentage))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeMatch {
    pub attribute: Attribute,
    pub value: AttributeValue,
    pub matched_records: usize,
    pub percentage: f64,
}
