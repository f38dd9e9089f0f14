use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unrecognised columns are kept as `Custom`, keyed by their normalized header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Attribute {
    Major,
    University,
    GraduationCountry,
    HighestQualification,
    YearsBeforeAppointment,
    YearsInSameEntity,
    OrganizationType,
    Sector,
    FirstCeoAppointment,
    FirstOrganization,
    LongestOrganization,
    Custom(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Categorical,
    Numeric,
}

impl Attribute {
    pub const CORE: [Attribute; 11] = [
        Attribute::Major,
        Attribute::University,
        Attribute::GraduationCountry,
        Attribute::HighestQualification,
        Attribute::YearsBeforeAppointment,
        Attribute::YearsInSameEntity,
        Attribute::OrganizationType,
        Attribute::Sector,
        Attribute::FirstCeoAppointment,
        Attribute::FirstOrganization,
        Attribute::LongestOrganization,
    ];

    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::YearsBeforeAppointment | Self::YearsInSameEntity => AttributeKind::Numeric,
            _ => AttributeKind::Categorical,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Self::Major => "major",
            Self::University => "university",
            Self::GraduationCountry => "graduation_country",
            Self::HighestQualification => "highest_qualification",
            Self::YearsBeforeAppointment => "years_before_appointment",
            Self::YearsInSameEntity => "years_in_same_entity",
            Self::OrganizationType => "organization_type",
            Self::Sector => "sector",
            Self::FirstCeoAppointment => "first_ceo_appointment",
            Self::FirstOrganization => "first_organization",
            Self::LongestOrganization => "longest_organization",
            Self::Custom(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Major => "Major",
            Self::University => "University",
            Self::GraduationCountry => "Graduation Country",
            Self::HighestQualification => "Highest Qualification",
            Self::YearsBeforeAppointment => "Years Before Appointment",
            Self::YearsInSameEntity => "Years Before Appointment in the Same Entity",
            Self::OrganizationType => "Organization Type",
            Self::Sector => "Sector",
            Self::FirstCeoAppointment => "First Appointment as CEO?",
            Self::FirstOrganization => "First Organization",
            Self::LongestOrganization => "Longest Duration in an Organization",
            Self::Custom(name) => name,
        }
    }

    /// Column header used by the published spreadsheet.
    pub fn source_header(&self) -> Option<&'static str> {
        let header = match self {
            Self::Major => "التخصص",
            Self::University => "الجامعة",
            Self::GraduationCountry => "دولة التخرج",
            Self::HighestQualification => "آخر مؤهل",
            Self::YearsBeforeAppointment => "السنوات قبل التعيين",
            Self::YearsInSameEntity => "السنوات قبل التعيين في نفس الجهة",
            Self::OrganizationType => "النوع",
            Self::Sector => "القطاع",
            Self::FirstCeoAppointment => "اول تعيين له كرئيس تنفيذي؟",
            Self::FirstOrganization => "اول جهة يعمل بها",
            Self::LongestOrganization => "أطول مدة جهة يعمل بها",
            Self::Custom(_) => return None,
        };
        Some(header)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute: {0}")]
pub struct AttributeParseError(pub String);

impl FromStr for Attribute {
    type Err = AttributeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(core) = Attribute::CORE
            .iter()
            .find(|a| a.source_header() == Some(trimmed))
        {
            return Ok(core.clone());
        }

        let normalized = trimmed
            .to_lowercase()
            .replace(['-', ' '], "_")
            .replace('?', "");
        let attribute = match normalized.as_str() {
            "major" | "education_field" => Attribute::Major,
            "university" => Attribute::University,
            "graduation_country" => Attribute::GraduationCountry,
            "highest_qualification" | "qualification" => Attribute::HighestQualification,
            "years_before_appointment" => Attribute::YearsBeforeAppointment,
            "years_in_same_entity"
            | "years_before_appointment_in_same_entity"
            | "years_before_appointment_in_the_same_entity" => Attribute::YearsInSameEntity,
            "organization_type" => Attribute::OrganizationType,
            "sector" => Attribute::Sector,
            "first_ceo_appointment" | "first_appointment_as_ceo" => {
                Attribute::FirstCeoAppointment
            }
            "first_organization" => Attribute::FirstOrganization,
            "longest_organization"
            | "longest_duration_organization"
            | "longest_duration_in_an_organization" => Attribute::LongestOrganization,
            _ => {
                if normalized.is_empty() {
                    return Err(AttributeParseError(s.to_string()));
                }
                Attribute::Custom(normalized)
            }
        };
        Ok(attribute)
    }
}

impl TryFrom<String> for Attribute {
    type Error = AttributeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Attribute> for String {
    fn from(value: Attribute) -> Self {
        value.slug().to_string()
    }
}

/// A single cell value. Equality is exact: `Text("12")` never equals
/// `Count(12)` and text comparison is case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum AttributeValue {
    Count(u32),
    Text(String),
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn coerce(attribute: &Attribute, raw: &str) -> Self {
        if attribute.kind() == AttributeKind::Numeric {
            if let Ok(count) = raw.trim().parse::<u32>() {
                return Self::Count(count);
            }
        }
        Self::Text(raw.to_string())
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            Self::Count(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Count(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
