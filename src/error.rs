use thiserror::Error;

use crate::dataset::Attribute;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("dataset contains no records")]
    EmptyDataset,
    #[error("attribute `{0}` is not present on any record")]
    UnknownAttribute(Attribute),
    #[error("attribute `{attribute}` holds non-numeric values and has no median")]
    NotNumeric { attribute: Attribute },
    #[error("attribute `{0}` was requested as both categorical and numeric")]
    OverlappingAttribute(Attribute),
}
