//! helmchart-helper - Helm chart scaffolding from the command line

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use colored::Colorize;
use helmchart_core::version::{DEFAULT_APP_VERSION, DEFAULT_CHART_VERSION};
use helmchart_core::{
    generate_chart, EmbeddedCatalog, FsStore, GenerationError, GenerationReport, ParameterSet,
    ResourceKind,
};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "helmchart-helper")]
#[command(about = "CLI for scaffolding Helm charts")]
#[command(version)]
pub struct Args {
    /// Chart name
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Directory the chart is written to
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<String>,

    /// Chart version (semver)
    #[arg(long = "chart-version", value_name = "VERSION", default_value = DEFAULT_CHART_VERSION)]
    pub chart_version: String,

    /// Version of the packaged application
    #[arg(long = "app-version", value_name = "VERSION", default_value = DEFAULT_APP_VERSION)]
    pub app_version: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Add a Deployment
    #[arg(long)]
    pub deploy: bool,

    /// Add a StatefulSet
    #[arg(long)]
    pub sts: bool,

    /// Add a DaemonSet
    #[arg(long)]
    pub ds: bool,

    /// Add a CronJob
    #[arg(long)]
    pub cj: bool,

    /// Add a ConfigMap
    #[arg(long)]
    pub cm: bool,

    /// Add a Service (and a connection test)
    #[arg(long)]
    pub svc: bool,

    /// Add a ServiceAccount
    #[arg(long)]
    pub sa: bool,

    /// Add an Ingress
    #[arg(long)]
    pub ing: bool,

    /// Add volume and volumeMount settings to the workloads
    #[arg(long)]
    pub pv: bool,

    /// Add a HorizontalPodAutoscaler
    #[arg(long)]
    pub hpa: bool,
}

impl Args {
    /// Resource kinds selected on the command line
    fn kinds(&self) -> Vec<ResourceKind> {
        [
            (self.deploy, ResourceKind::Deployment),
            (self.sts, ResourceKind::StatefulSet),
            (self.ds, ResourceKind::DaemonSet),
            (self.cj, ResourceKind::CronJob),
            (self.cm, ResourceKind::ConfigMap),
            (self.svc, ResourceKind::Service),
            (self.sa, ResourceKind::ServiceAccount),
            (self.ing, ResourceKind::Ingress),
            (self.pv, ResourceKind::Volumes),
            (self.hpa, ResourceKind::HorizontalAutoscaler),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }

    /// Validate flags into generation parameters and the output directory
    fn resolve(&self) -> Result<(ParameterSet, PathBuf), GenerationError> {
        let params = self
            .kinds()
            .into_iter()
            .fold(
                ParameterSet::builder(self.name.clone().unwrap_or_default())
                    .chart_version(self.chart_version.as_str())
                    .app_version(self.app_version.as_str()),
                |builder, kind| builder.enable(kind),
            )
            .build()?;

        let output = self.output.as_deref().unwrap_or_default().trim();
        if output.is_empty() {
            return Err(
                GenerationError::validation("validate-config", "chart path is required")
                    .with_flag("-o"),
            );
        }
        Ok((params, PathBuf::from(output)))
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init()
        .ok();
}

fn run(args: &Args) -> Result<()> {
    let (params, root) = args.resolve()?;
    debug!("Parameters: {:?}", params);

    let report = generate_chart(&EmbeddedCatalog::new(), &mut FsStore::new(), &params, &root)
        .with_context(|| format!("could not generate chart '{}'", params.name()))?;

    print_summary(&params, &root, &report);
    Ok(())
}

fn print_summary(params: &ParameterSet, root: &Path, report: &GenerationReport) {
    println!(
        "{} chart '{}' in {}",
        "Created".green().bold(),
        params.name().cyan(),
        root.display()
    );
    let kinds: Vec<String> = params.enabled_kinds().map(|k| k.to_string()).collect();
    if !kinds.is_empty() {
        println!("  {} {}", "Resources:".bold(), kinds.join(", "));
    }
    for file in &report.files {
        println!("  {} {}", "+".green(), file.display());
    }

    println!();
    println!("{}", "Next steps:".bold());
    println!("  helm lint {}", root.display());
    println!("  helm install {} {}", params.name(), root.display());
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(&args.log_level);
    debug!("helmchart-helper {}", CLI_VERSION);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmchart_core::ErrorKind;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("helmchart-helper").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_flags_map_to_kinds() {
        let args = parse(&["-n", "web", "-o", "out", "--svc", "--deploy", "--hpa"]);
        assert_eq!(
            args.kinds(),
            vec![
                ResourceKind::Deployment,
                ResourceKind::Service,
                ResourceKind::HorizontalAutoscaler
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-n", "web", "-o", "out"]);
        assert!(args.kinds().is_empty());
        assert_eq!(args.chart_version, DEFAULT_CHART_VERSION);
        assert_eq!(args.app_version, DEFAULT_APP_VERSION);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_missing_name_is_validation_error() {
        let err = parse(&["-o", "out"]).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("chart name is required"));
    }

    #[test]
    fn test_missing_path_is_validation_error() {
        let err = parse(&["-n", "web"]).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("chart path is required"));

        let err = parse(&["-n", "web", "-o", "  "]).resolve().unwrap_err();
        assert!(err.to_string().contains("(flag -o)"));
    }

    #[test]
    fn test_name_checked_before_path() {
        let err = parse(&[]).resolve().unwrap_err();
        assert!(err.to_string().contains("chart name is required"));
    }

    #[test]
    fn test_resolve_carries_versions() {
        let (params, root) = parse(&[
            "-n",
            "web",
            "-o",
            "charts/web",
            "--chart-version",
            "2.0.0",
            "--app-version",
            "3.1",
        ])
        .resolve()
        .unwrap();
        assert_eq!(params.chart_version(), "2.0.0");
        assert_eq!(params.app_version(), "3.1");
        assert_eq!(root, PathBuf::from("charts/web"));
    }
}
