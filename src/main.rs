use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use ceo_predictor::config::{Config, ConfigOverrides};
use ceo_predictor::dataset::loader::load_dataset;
use ceo_predictor::dataset::options::{attribute_options, AttributeOptions};
use ceo_predictor::dataset::{Attribute, AttributeValue, Dataset};
use ceo_predictor::estimator::evaluator::match_report;
use ceo_predictor::estimator::{parse_assignment, ConstraintSet, MatchReport};
use ceo_predictor::i18n::{Language, Translations};
use ceo_predictor::output::csv::{match_to_csv, options_to_csv, overview_to_csv, scenario_to_csv};
use ceo_predictor::output::json::render_json;
use ceo_predictor::output::table::{
    render_distribution_tables, render_match_table, render_options_table, render_scenario_table,
};
use ceo_predictor::overview::{overview, Distribution};
use ceo_predictor::scenario::{best_scenario, default_best_scenario, ScenarioReport};
use ceo_predictor::server::run_server;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "ceo-predictor",
    about = "Estimate how common a career profile is among appointed CEOs"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    dataset: Option<String>,
    #[arg(short, long)]
    lang: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(flatten)]
    constraints: ConstraintArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ConstraintArgs {
    #[arg(long)]
    major: Option<String>,
    #[arg(long)]
    university: Option<String>,
    #[arg(long = "graduation-country")]
    graduation_country: Option<String>,
    #[arg(long = "highest-qualification")]
    highest_qualification: Option<String>,
    #[arg(long = "years-before-appointment")]
    years_before_appointment: Option<u32>,
    #[arg(long = "years-in-same-entity")]
    years_in_same_entity: Option<u32>,
    #[arg(long = "organization-type")]
    organization_type: Option<String>,
    #[arg(long)]
    sector: Option<String>,
    #[arg(long = "first-ceo-appointment")]
    first_ceo_appointment: Option<String>,
    #[arg(long = "first-organization")]
    first_organization: Option<String>,
    #[arg(long = "longest-organization")]
    longest_organization: Option<String>,
    /// Extra `attribute=value` constraints, e.g. for custom dataset columns.
    #[arg(long = "where", value_name = "ATTR=VALUE")]
    assignments: Vec<String>,
}

impl ConstraintArgs {
    fn into_constraints(self) -> Result<ConstraintSet> {
        let mut set = ConstraintSet::new();
        let text = [
            (Attribute::Major, self.major),
            (Attribute::University, self.university),
            (Attribute::GraduationCountry, self.graduation_country),
            (Attribute::HighestQualification, self.highest_qualification),
            (Attribute::OrganizationType, self.organization_type),
            (Attribute::Sector, self.sector),
            (Attribute::FirstCeoAppointment, self.first_ceo_appointment),
            (Attribute::FirstOrganization, self.first_organization),
            (Attribute::LongestOrganization, self.longest_organization),
        ];
        for (attribute, value) in text {
            if let Some(value) = value {
                set.insert(attribute, AttributeValue::text(value));
            }
        }
        let counts = [
            (Attribute::YearsBeforeAppointment, self.years_before_appointment),
            (Attribute::YearsInSameEntity, self.years_in_same_entity),
        ];
        for (attribute, value) in counts {
            if let Some(value) = value {
                set.insert(attribute, AttributeValue::Count(value));
            }
        }
        for raw in &self.assignments {
            let (attribute, value) = parse_assignment(raw)?;
            if let Some(previous) = set.insert(attribute.clone(), value) {
                warn!("--where {raw} replaces earlier value {previous} for {attribute}");
            }
        }
        Ok(set)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Joint and per-attribute share of executives matching the constraints.
    Chance,
    /// Mode of every categorical and median of every numeric attribute.
    Best {
        /// Comma-separated attributes aggregated by mode.
        #[arg(long)]
        categorical: Option<String>,
        /// Comma-separated attributes aggregated by median.
        #[arg(long)]
        numeric: Option<String>,
    },
    Overview {
        #[arg(long)]
        attribute: Vec<String>,
    },
    Options {
        #[arg(long)]
        attribute: Vec<String>,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        dataset_path: cli.dataset.clone(),
        language: cli.lang.as_deref().map(Language::from_str).transpose()?,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let dataset = load_dataset(&config.resolved_dataset_path())?;

    if let Commands::Serve { host, port } = &cli.command {
        let host = host.clone().unwrap_or_else(|| config.server.host.clone());
        let port = port.unwrap_or(config.server.port);
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, dataset, addr).await;
    }

    let tr = Translations::load(
        config.display.language,
        config.resolved_translations_dir().as_deref(),
    )?;

    match &cli.command {
        Commands::Chance => {
            let constraints = cli.constraints.clone().into_constraints()?;
            if constraints.is_empty() {
                info!("no constraints given, every profile matches");
            }
            let report = match_report(&dataset, &constraints)?;
            print_chance(&report, &tr, cli.output)?;
        }
        Commands::Best {
            categorical,
            numeric,
        } => {
            let scenario = if categorical.is_none() && numeric.is_none() {
                default_best_scenario(&dataset)?
            } else {
                let categorical = parse_attribute_list(categorical.as_deref())?;
                let numeric = parse_attribute_list(numeric.as_deref())?;
                best_scenario(&dataset, &categorical, &numeric)?
            };
            let report = ScenarioReport::new(&dataset, scenario)?;
            print_scenario(&report, &tr, cli.output)?;
        }
        Commands::Overview { attribute } => {
            let attributes = parse_attributes(attribute)?;
            let distributions = overview(&dataset, &attributes)?;
            print_overview(&distributions, &tr, cli.output)?;
        }
        Commands::Options { attribute } => {
            let options = collect_options(&dataset, &config, &parse_attributes(attribute)?)?;
            print_options(&options, &tr, cli.output)?;
        }
        Commands::Config { .. } => {}
        Commands::Serve { .. } => unreachable!("serve command handled before dispatch"),
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn parse_attributes(raw: &[String]) -> Result<Vec<Attribute>> {
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        out.push(Attribute::from_str(name)?);
    }
    Ok(out)
}

fn parse_attribute_list(raw: Option<&str>) -> Result<Vec<Attribute>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for piece in raw.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let attribute = Attribute::from_str(trimmed)?;
        if !out.contains(&attribute) {
            out.push(attribute);
        }
    }
    Ok(out)
}

fn collect_options(
    dataset: &Dataset,
    config: &Config,
    attributes: &[Attribute],
) -> Result<Vec<AttributeOptions>> {
    let attributes = if attributes.is_empty() {
        Attribute::CORE.to_vec()
    } else {
        attributes.to_vec()
    };
    let mut out = Vec::with_capacity(attributes.len());
    for attribute in &attributes {
        out.push(attribute_options(
            dataset,
            attribute,
            config.offers_other_option(attribute),
            config.predictor.max_years,
        )?);
    }
    Ok(out)
}

fn print_chance(report: &MatchReport, tr: &Translations, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_match_table(report, tr)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", match_to_csv(report)?),
    }
    Ok(())
}

fn print_scenario(report: &ScenarioReport, tr: &Translations, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_scenario_table(report, tr)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => println!("{}", scenario_to_csv(report)?),
    }
    Ok(())
}

fn print_overview(
    distributions: &[Distribution],
    tr: &Translations,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_distribution_tables(distributions, tr)),
        OutputFormat::Json => println!("{}", render_json(distributions)?),
        OutputFormat::Csv => println!("{}", overview_to_csv(distributions)?),
    }
    Ok(())
}

fn print_options(
    options: &[AttributeOptions],
    tr: &Translations,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_options_table(options, tr)),
        OutputFormat::Json => println!("{}", render_json(options)?),
        OutputFormat::Csv => println!("{}", options_to_csv(options)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_attribute_list, Cli, Commands, ConstraintArgs};
    use ceo_predictor::dataset::{Attribute, AttributeValue};
    use clap::Parser;

    #[test]
    fn flags_and_where_clauses_build_one_constraint_set() {
        let args = ConstraintArgs {
            major: Some("Law".to_string()),
            years_before_appointment: Some(20),
            assignments: vec!["board_seats=3".to_string()],
            ..ConstraintArgs::default()
        };
        let set = args.into_constraints().expect("constraints");
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(&Attribute::Major), Some(&AttributeValue::text("Law")));
        assert_eq!(
            set.get(&Attribute::YearsBeforeAppointment),
            Some(&AttributeValue::Count(20))
        );
        assert_eq!(
            set.get(&Attribute::Custom("board_seats".to_string())),
            Some(&AttributeValue::text("3"))
        );
    }

    #[test]
    fn malformed_where_clause_is_rejected() {
        let args = ConstraintArgs {
            assignments: vec!["sector".to_string()],
            ..ConstraintArgs::default()
        };
        assert!(args.into_constraints().is_err());
    }

    #[test]
    fn attribute_lists_skip_blanks_and_duplicates() {
        let parsed = parse_attribute_list(Some("major, sector,,major")).expect("list");
        assert_eq!(parsed, vec![Attribute::Major, Attribute::Sector]);
        assert!(parse_attribute_list(None).expect("none").is_empty());
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "ceo-predictor",
            "--lang",
            "ar",
            "--sector",
            "Finance",
            "best",
            "--numeric",
            "years_before_appointment",
        ])
        .expect("cli");
        assert_eq!(cli.lang.as_deref(), Some("ar"));
        assert_eq!(cli.constraints.sector.as_deref(), Some("Finance"));
        assert!(matches!(cli.command, Commands::Best { .. }));
    }
}
