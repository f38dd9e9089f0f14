use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{Attribute, AttributeParseError, AttributeValue, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub attribute: Attribute,
    pub value: AttributeValue,
}

impl Predicate {
    pub fn new(attribute: Attribute, value: AttributeValue) -> Self {
        Self { attribute, value }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.has_value(&self.attribute, &self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    constraints: BTreeMap<Attribute, AttributeValue>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: Attribute, value: AttributeValue) -> Option<AttributeValue> {
        self.constraints.insert(attribute, value)
    }

    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.insert(attribute, value.into());
        self
    }

    pub fn get(&self, attribute: &Attribute) -> Option<&AttributeValue> {
        self.constraints.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &AttributeValue)> {
        self.constraints.iter()
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        self.constraints
            .iter()
            .map(|(attribute, value)| Predicate::new(attribute.clone(), value.clone()))
            .collect()
    }

    // short-circuits; an empty set matches every record
    pub fn matches(&self, record: &Record) -> bool {
        self.constraints
            .iter()
            .all(|(attribute, value)| record.has_value(attribute, value))
    }

    pub fn from_named<I, K>(pairs: I) -> Result<Self, AttributeParseError>
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: AsRef<str>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            set.insert(name.as_ref().parse()?, value);
        }
        Ok(set)
    }
}

impl FromIterator<(Attribute, AttributeValue)> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = (Attribute, AttributeValue)>>(iter: T) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConstraintParseError {
    #[error("expected attribute=value, got `{0}`")]
    MissingSeparator(String),
    #[error(transparent)]
    Attribute(#[from] AttributeParseError),
}

pub fn parse_assignment(raw: &str) -> Result<(Attribute, AttributeValue), ConstraintParseError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ConstraintParseError::MissingSeparator(raw.to_string()))?;
    let attribute: Attribute = name.parse()?;
    let value = AttributeValue::coerce(&attribute, value);
    Ok((attribute, value))
}

#[cfg(test)]
mod tests {
    use super::{parse_assignment, ConstraintParseError, ConstraintSet, Predicate};
    use crate::dataset::fixtures::record;
    use crate::dataset::{Attribute, AttributeValue};

    #[test]
    fn one_value_per_attribute() {
        let mut set = ConstraintSet::new().with(Attribute::Sector, "Finance");
        let previous = set.insert(Attribute::Sector, AttributeValue::text("Tech"));
        assert_eq!(previous, Some(AttributeValue::text("Finance")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&Attribute::Sector), Some(&AttributeValue::text("Tech")));
    }

    #[test]
    fn matches_is_conjunction_of_predicates() {
        let rec = record("Law", "Finance", 20);
        let set = ConstraintSet::new()
            .with(Attribute::Major, "Law")
            .with(Attribute::YearsBeforeAppointment, 20u32);
        assert!(set.matches(&rec));
        assert!(set.predicates().iter().all(|p| p.matches(&rec)));

        let set = set.with(Attribute::Sector, "Tech");
        assert!(!set.matches(&rec));
        assert!(ConstraintSet::new().matches(&rec));
        assert!(!Predicate::new(Attribute::Custom("board".into()), "Yes".into()).matches(&rec));
    }

    #[test]
    fn builds_from_named_pairs() {
        let set = ConstraintSet::from_named([
            ("sector", AttributeValue::text("Finance")),
            ("Major", AttributeValue::text("Law")),
        ])
        .expect("names should parse");
        assert_eq!(set.get(&Attribute::Major), Some(&AttributeValue::text("Law")));
        assert!(ConstraintSet::from_named([(" ", AttributeValue::text("x"))]).is_err());
    }

    #[test]
    fn serializes_as_slug_keyed_map() {
        let set = ConstraintSet::new()
            .with(Attribute::Sector, "Finance")
            .with(Attribute::YearsInSameEntity, 4u32);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"years_in_same_entity": 4, "sector": "Finance"})
        );
        let back: ConstraintSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn parses_assignments() {
        let (attribute, value) = parse_assignment("years-before-appointment=12").unwrap();
        assert_eq!(attribute, Attribute::YearsBeforeAppointment);
        assert_eq!(value, AttributeValue::Count(12));

        let (attribute, value) = parse_assignment("board_seats=3").unwrap();
        assert_eq!(attribute, Attribute::Custom("board_seats".into()));
        assert_eq!(value, AttributeValue::text("3"));

        assert!(matches!(
            parse_assignment("sector"),
            Err(ConstraintParseError::MissingSeparator(_))
        ));
    }
}
