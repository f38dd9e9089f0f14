pub mod loader;
pub mod options;
pub mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

pub use schema::{Attribute, AttributeKind, AttributeParseError, AttributeValue};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub major: String,
    pub university: String,
    pub graduation_country: String,
    pub highest_qualification: String,
    pub years_before_appointment: u32,
    pub years_in_same_entity: u32,
    pub organization_type: String,
    pub sector: String,
    pub first_ceo_appointment: String,
    pub first_organization: String,
    pub longest_organization: String,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    pub fn value(&self, attribute: &Attribute) -> Option<AttributeValue> {
        if let Some(count) = self.count(attribute) {
            return Some(AttributeValue::Count(count));
        }
        self.text(attribute)
            .map(|text| AttributeValue::Text(text.to_string()))
    }

    pub fn has_value(&self, attribute: &Attribute, expected: &AttributeValue) -> bool {
        match expected {
            AttributeValue::Count(v) => self.count(attribute) == Some(*v),
            AttributeValue::Text(v) => self.text(attribute) == Some(v.as_str()),
        }
    }

    pub fn count(&self, attribute: &Attribute) -> Option<u32> {
        match attribute {
            Attribute::YearsBeforeAppointment => Some(self.years_before_appointment),
            Attribute::YearsInSameEntity => Some(self.years_in_same_entity),
            _ => None,
        }
    }

    pub fn text(&self, attribute: &Attribute) -> Option<&str> {
        let text = match attribute {
            Attribute::Major => &self.major,
            Attribute::University => &self.university,
            Attribute::GraduationCountry => &self.graduation_country,
            Attribute::HighestQualification => &self.highest_qualification,
            Attribute::OrganizationType => &self.organization_type,
            Attribute::Sector => &self.sector,
            Attribute::FirstCeoAppointment => &self.first_ceo_appointment,
            Attribute::FirstOrganization => &self.first_organization,
            Attribute::LongestOrganization => &self.longest_organization,
            Attribute::Custom(name) => return self.extra.get(name).map(String::as_str),
            Attribute::YearsBeforeAppointment | Attribute::YearsInSameEntity => return None,
        };
        Some(text.as_str())
    }

    pub fn set_text(&mut self, attribute: &Attribute, value: impl Into<String>) -> bool {
        let value = value.into();
        match attribute {
            Attribute::Major => self.major = value,
            Attribute::University => self.university = value,
            Attribute::GraduationCountry => self.graduation_country = value,
            Attribute::HighestQualification => self.highest_qualification = value,
            Attribute::OrganizationType => self.organization_type = value,
            Attribute::Sector => self.sector = value,
            Attribute::FirstCeoAppointment => self.first_ceo_appointment = value,
            Attribute::FirstOrganization => self.first_organization = value,
            Attribute::LongestOrganization => self.longest_organization = value,
            Attribute::Custom(name) => {
                self.extra.insert(name.clone(), value);
            }
            Attribute::YearsBeforeAppointment | Attribute::YearsInSameEntity => return false,
        }
        true
    }

    pub fn set_count(&mut self, attribute: &Attribute, value: u32) -> bool {
        match attribute {
            Attribute::YearsBeforeAppointment => self.years_before_appointment = value,
            Attribute::YearsInSameEntity => self.years_in_same_entity = value,
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ensure_not_empty(&self) -> Result<usize, EstimateError> {
        if self.records.is_empty() {
            return Err(EstimateError::EmptyDataset);
        }
        Ok(self.records.len())
    }

    pub fn values<'a>(
        &'a self,
        attribute: &'a Attribute,
    ) -> impl Iterator<Item = AttributeValue> + 'a {
        self.records.iter().filter_map(move |r| r.value(attribute))
    }
}
