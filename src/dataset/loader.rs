use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::dataset::{Attribute, AttributeKind, Dataset, Record};

pub trait RecordSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Dataset>;
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load(&self) -> Result<Dataset> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed opening dataset: {}", self.path.display()))?;
        read_csv(BufReader::new(file))
            .with_context(|| format!("failed reading dataset: {}", self.path.display()))
    }
}

#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load(&self) -> Result<Dataset> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed opening dataset: {}", self.path.display()))?;
        read_json(BufReader::new(file))
            .with_context(|| format!("failed parsing JSON dataset: {}", self.path.display()))
    }
}

pub fn source_for_path(path: &Path) -> Result<Box<dyn RecordSource>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSource::new(path))),
        "json" => Ok(Box::new(JsonSource::new(path))),
        other => Err(anyhow!(
            "unsupported dataset format `{other}` for {} (expected .csv or .json)",
            path.display()
        )),
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let source = source_for_path(path)?;
    let dataset = source.load()?;
    if dataset.is_empty() {
        warn!("dataset {} contains no records", source.describe());
    } else {
        info!(
            "loaded {} executive records from {}",
            dataset.len(),
            source.describe()
        );
    }
    Ok(dataset)
}

/// Reads a headered CSV table. Every core column must be present; extra
/// columns are kept as custom attributes.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut columns: Vec<Option<Attribute>> = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let column = match header.parse::<Attribute>() {
            Ok(attribute) => {
                if columns.iter().flatten().any(|seen| *seen == attribute) {
                    bail!("column `{header}` maps to `{attribute}` more than once");
                }
                Some(attribute)
            }
            Err(_) => {
                warn!("ignoring dataset column with empty header");
                None
            }
        };
        columns.push(column);
    }

    let missing = Attribute::CORE
        .iter()
        .filter(|core| !columns.iter().flatten().any(|c| c == *core))
        .map(|core| core.slug().to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!("dataset is missing required columns: {}", missing.join(", "));
    }
    debug!("dataset columns: {:?}", columns);

    let mut records = Vec::new();
    for (idx, row) in csv_reader.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let row = row.with_context(|| format!("malformed CSV row at line {line}"))?;
        let mut record = Record::default();
        for (cell, column) in row.iter().zip(&columns) {
            let Some(attribute) = column else {
                continue;
            };
            match attribute.kind() {
                AttributeKind::Numeric => {
                    let count = parse_count(cell).ok_or_else(|| {
                        anyhow!("line {line}: `{attribute}` expects a whole number of years, got `{cell}`")
                    })?;
                    record.set_count(attribute, count);
                }
                AttributeKind::Categorical => {
                    record.set_text(attribute, cell);
                }
            }
        }
        records.push(record);
    }
    Ok(Dataset::new(records))
}

/// Reads an array of records keyed by slug. Extra keys are re-keyed the way CSV
/// headers are, so `"Board Seats"` lands under `board_seats`.
pub fn read_json<R: Read>(reader: R) -> Result<Dataset> {
    let raw: Vec<Record> = serde_json::from_reader(reader)?;
    let mut records = Vec::with_capacity(raw.len());
    for (idx, mut record) in raw.into_iter().enumerate() {
        let extra = std::mem::take(&mut record.extra);
        for (key, value) in extra {
            let Ok(attribute) = key.parse::<Attribute>() else {
                warn!("record {idx}: ignoring field with empty name");
                continue;
            };
            match attribute {
                Attribute::Custom(name) => {
                    if record.extra.contains_key(&name) {
                        bail!("record {idx}: field `{key}` maps to `{name}` more than once");
                    }
                    record.extra.insert(name, value);
                }
                core => bail!("record {idx}: field `{key}` maps to `{core}` more than once"),
            }
        }
        records.push(record);
    }
    Ok(Dataset::new(records))
}

/// Accepts `12` as well as spreadsheet exports such as `12.0`.
pub fn parse_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<u32>() {
        return Some(v);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX) {
        Some(float as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{load_dataset, parse_count, read_csv, read_json, source_for_path};
    use crate::dataset::{Attribute, AttributeValue};
    use crate::estimator::evaluator::per_attribute_match_percentage;

    const HEADER: &str = "major,university,graduation_country,highest_qualification,years_before_appointment,years_in_same_entity,organization_type,sector,first_ceo_appointment,first_organization,longest_organization";

    #[test]
    fn reads_core_and_custom_columns() {
        let data = format!(
            "{HEADER},Board Seats\nLaw,KSU,Saudi Arabia,Master,20,5.0,Private,Finance,Yes,SABIC,SABIC,3\n"
        );
        let dataset = read_csv(data.as_bytes()).expect("csv should parse");
        assert_eq!(dataset.len(), 1);
        let rec = &dataset.records()[0];
        assert_eq!(rec.years_in_same_entity, 5);
        assert_eq!(
            rec.value(&Attribute::Custom("board_seats".into())),
            Some(AttributeValue::text("3"))
        );
    }

    #[test]
    fn accepts_source_spreadsheet_headers() {
        let header = Attribute::CORE
            .iter()
            .map(|a| a.source_header().unwrap())
            .collect::<Vec<_>>()
            .join(",");
        let data = format!("{header}\nقانون,جامعة الملك سعود,السعودية,ماجستير,20,5,خاص,المالية,نعم,سابك,سابك\n");
        let dataset = read_csv(data.as_bytes()).expect("csv should parse");
        assert_eq!(dataset.records()[0].sector, "المالية");
        assert_eq!(dataset.records()[0].years_before_appointment, 20);
    }

    #[test]
    fn rejects_missing_required_columns() {
        let err = read_csv("major,sector\nLaw,Finance\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing required columns"));
        assert!(err.to_string().contains("university"));
    }

    #[test]
    fn reports_line_of_bad_year_count() {
        let data = format!("{HEADER}\nLaw,KSU,SA,Master,twenty,5,Private,Finance,Yes,A,B\n");
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    fn json_record(extra: &str) -> String {
        format!(
            r#"[{{"major":"Law","university":"KSU","graduation_country":"SA","highest_qualification":"Master","years_before_appointment":20,"years_in_same_entity":5,"organization_type":"Private","sector":"Finance","first_ceo_appointment":"Yes","first_organization":"A","longest_organization":"B"{extra}}}]"#
        )
    }

    #[test]
    fn json_custom_fields_use_normalized_names() {
        let data = json_record(r#","Board Seats":"3""#);
        let dataset = read_json(data.as_bytes()).expect("json should parse");
        let board: Attribute = "Board Seats".parse().unwrap();
        assert_eq!(
            dataset.records()[0].value(&board),
            Some(AttributeValue::text("3"))
        );
        let pct = per_attribute_match_percentage(&dataset, &board, &AttributeValue::text("3"))
            .expect("marginal");
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn json_rejects_fields_that_collide_after_normalizing() {
        let data = json_record(r#","Board Seats":"3","board-seats":"4""#);
        let err = read_json(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let data = json_record(r#","Sector":"Energy""#);
        let err = read_json(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`sector`"));
    }

    #[test]
    fn parses_integral_counts_only() {
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn loads_from_file_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Law,KSU,SA,Master,20,5,Private,Finance,Yes,A,B").unwrap();
        writeln!(file, "Law,KSU,SA,Master,10,2,Public,Energy,No,A,B").unwrap();
        file.flush().unwrap();

        let dataset = load_dataset(file.path()).expect("dataset should load");
        assert_eq!(dataset.len(), 2);
        assert!(source_for_path(std::path::Path::new("ceos.xlsx")).is_err());
    }
}
