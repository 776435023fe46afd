mod prompt;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use hdp_core::{
    resolve_model_dir, CoreConfig, DomainSchema, FieldKind, ModelBundle, PredictionService,
    RawInputs, SchemaRegistry,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::prompt::Prompter;

#[derive(Parser)]
#[command(name = "hdp")]
#[command(about = "Health disease prediction from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the prediction domains
    Domains,
    /// Show the fields a domain asks for
    Schema {
        /// Domain name (heart, diabetes or cancer)
        domain: String,
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load every model and check it against its schema
    Check {
        /// Model directory (overrides HDP_MODEL_DIR)
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
    /// Prompt for a domain's fields and print the prediction
    Predict {
        /// Domain name (heart, diabetes or cancer)
        domain: String,
        /// Model directory (overrides HDP_MODEL_DIR)
        #[arg(long)]
        model_dir: Option<PathBuf>,
        /// Supply a field up front instead of being prompted (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {arg:?}"))?;
    if name.trim().is_empty() {
        return Err(format!("missing field name in {arg:?}"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hdp=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = SchemaRegistry::standard()?;

    match cli.command {
        Some(Commands::Domains) => {
            for schema in registry.schemas() {
                println!("{:<10} {}", schema.domain.slug(), schema.title);
            }
        }
        Some(Commands::Schema { domain, json }) => {
            let schema = registry.schema_by_name(&domain)?;
            if json {
                println!("{}", serde_json::to_string_pretty(schema)?);
            } else {
                print_schema(schema);
            }
        }
        Some(Commands::Check { model_dir }) => {
            let models = load_models(model_dir, &registry)?;
            for domain in models.domains() {
                let gateway = models.gateway(domain)?;
                println!(
                    "{domain}: ok ({} layout, {} features)",
                    gateway.layout(),
                    gateway.feature_names().len()
                );
            }
        }
        Some(Commands::Predict {
            domain,
            model_dir,
            set,
        }) => {
            let schema = registry.schema_by_name(&domain)?;
            let domain = schema.domain;
            let preset: RawInputs = set.into_iter().collect();

            let models = load_models(model_dir, &registry)?;

            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            let raw = prompter.collect(schema, &preset)?;

            let service = PredictionService::new(Arc::new(registry), Arc::new(models));
            let presentation = service.predict(domain, &raw).map_err(|e| {
                tracing::error!(%domain, error = %e, "prediction failed");
                anyhow!(e)
            })?;

            match &presentation.label {
                Some(label) => println!(
                    "{} ({label}): {}",
                    presentation.message, presentation.severity
                ),
                None => println!("{}: {}", presentation.message, presentation.severity),
            }
        }
        None => {
            println!("Use 'hdp --help' for commands");
        }
    }

    Ok(())
}

fn load_models(
    model_dir: Option<PathBuf>,
    registry: &SchemaRegistry,
) -> anyhow::Result<ModelBundle> {
    let override_dir =
        model_dir.or_else(|| std::env::var("HDP_MODEL_DIR").ok().map(PathBuf::from));
    let cfg = CoreConfig::new(resolve_model_dir(override_dir)?)?;
    ModelBundle::load(&cfg, registry)
        .with_context(|| format!("loading models from {}", cfg.model_dir().display()))
}

fn print_schema(schema: &DomainSchema) {
    println!("{} ({})", schema.title, schema.domain);
    for field in &schema.fields {
        match &field.kind {
            FieldKind::Numeric(spec) => {
                let default = spec
                    .default
                    .map(|d| format!(", default {d}"))
                    .unwrap_or_default();
                println!(
                    "  {:<24} {} [{} to {}, step {}{default}]",
                    field.name, field.label, spec.min, spec.max, spec.step
                );
            }
            FieldKind::Choice { options } => {
                let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
                println!("  {:<24} {} [{}]", field.name, field.label, labels.join(" | "));
            }
        }
    }
    println!("Outcomes:");
    for outcome in &schema.outcomes {
        println!("  {} {} ({})", outcome.code, outcome.message, outcome.severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("smoking_history=No Info"),
            Ok(("smoking_history".into(), "No Info".into()))
        );
        assert_eq!(parse_assignment("bmi=27=5").unwrap().1, "27=5");
        assert!(parse_assignment("bmi").is_err());
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_set() {
        let cli = Cli::try_parse_from([
            "hdp", "predict", "heart", "--set", "age=63", "--set", "sex=Male",
        ])
        .unwrap();
        let Some(Commands::Predict { domain, set, .. }) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(domain, "heart");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
