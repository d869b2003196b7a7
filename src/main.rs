//! `folio`: find the articles of an archival unit.

mod error;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand, ValueEnum};
use exn::ResultExt;
use folio_articles::{MetadataTarget, Purpose};
use folio_config::{BUILTIN_PREFIX, Builtins, PluginDefinition, Settings};
use folio_store::{ArchivalUnit, AuParams, MemoryStore};
use std::path::PathBuf;
use std::process::ExitCode;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

/// Reconstructs articles from the URLs of a crawled archival unit.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file to use instead of the per-user one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every article found in an AU's URL manifest
    Articles {
        /// Plugin definition: a file, `builtin:<name>`, or a name in the plugin directories
        #[arg(long)]
        plugin: String,

        /// Tab-separated manifest of the AU's stored URLs
        #[arg(long)]
        manifest: PathBuf,

        /// AU parameter, as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// What the articles are wanted for
        #[arg(long, value_enum, default_value_t = PurposeArg::Metadata)]
        purpose: PurposeArg,

        /// Only count URLs of this MIME type as article candidates
        #[arg(long)]
        format: Option<String>,

        /// Skip URLs not modified after this RFC 3339 instant
        #[arg(long, value_parser = parse_instant)]
        changed_after: Option<OffsetDateTime>,
    },

    /// Load and compile a plugin definition, reporting any problem
    Validate {
        /// Plugin definition: a file, `builtin:<name>`, or a name in the plugin directories
        #[arg(long)]
        plugin: String,

        /// AU parameter, as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// List the builtin plugin definitions
    Plugins,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PurposeArg {
    Article,
    Metadata,
    Any,
}
impl From<PurposeArg> for Purpose {
    fn from(purpose: PurposeArg) -> Self {
        match purpose {
            PurposeArg::Article => Self::Article,
            PurposeArg::Metadata => Self::Metadata,
            PurposeArg::Any => Self::Any,
        }
    }
}

fn parse_param(value: &str) -> std::result::Result<(String, String), String> {
    AuParams::parse_pair(value).map_err(|err| (*err).to_string())
}

fn parse_instant(value: &str) -> std::result::Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|err| err.to_string())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings> {
    let settings = match config {
        Some(file) => Settings::load_from(Some(file.as_path())),
        None => Settings::load(),
    };
    settings.or_raise(|| ErrorKind::Settings)
}

fn load_plugin(reference: &str, settings: &Settings) -> Result<PluginDefinition> {
    PluginDefinition::resolve(reference, settings).or_raise(|| ErrorKind::Plugin(reference.to_string()))
}

fn articles(
    settings: &Settings,
    plugin: &str,
    manifest: PathBuf,
    params: Vec<(String, String)>,
    target: MetadataTarget,
) -> Result<()> {
    let definition = load_plugin(plugin, settings)?;
    let mut au = MemoryStore::from_manifest(&manifest).or_raise(|| ErrorKind::Manifest(manifest.clone()))?;
    for (key, value) in params {
        au.params_mut().insert(key, value);
    }
    let table = definition.compile(au.params()).or_raise(|| ErrorKind::Plugin(plugin.to_string()))?;

    let mut iter = table.iterator(&au, target);
    let mut count = 0usize;
    for af in &mut iter {
        count += 1;
        println!("{}", af.pretty());
    }
    let stats = iter.stats();
    tracing::info!(
        au = au.name(),
        visited = stats.visited,
        deferred = stats.deferred,
        duplicates = stats.duplicates,
        "done"
    );
    println!("{count} articles");
    Ok(())
}

fn validate(settings: &Settings, plugin: &str, params: Vec<(String, String)>) -> Result<()> {
    let definition = load_plugin(plugin, settings)?;
    let params: AuParams = params.into_iter().collect();
    let table = definition.compile(&params).or_raise(|| ErrorKind::Plugin(plugin.to_string()))?;
    definition.cook_table().or_raise(|| ErrorKind::Plugin(plugin.to_string()))?;
    let major = table.aspects().iter().filter(|aspect| aspect.is_major()).count();
    println!("{}: ok ({} aspects, {major} major)", definition.name, table.aspects().len());
    for root in table.roots() {
        println!("  root: {root}");
    }
    Ok(())
}

fn plugins(settings: &Settings) {
    for name in Builtins::list() {
        println!("{BUILTIN_PREFIX}{name}");
    }
    for dir in &settings.plugin_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        let mut paths: Vec<_> = entries.filter_map(|entry| entry.ok().map(|entry| entry.path())).collect();
        paths.sort();
        for path in paths.into_iter().filter(|path| folio_config::Syntax::from_path(path).is_some()) {
            println!("{}", path.display());
        }
    }
}

fn run(cli: Cli, settings: &Settings) -> Result<()> {
    match cli.command {
        Command::Articles { plugin, manifest, params, purpose, format, changed_after } => {
            let mut target = MetadataTarget::new(purpose.into());
            if let Some(format) = format {
                target = target.with_format(format);
            }
            if let Some(instant) = changed_after {
                target = target.with_changed_after(instant);
            }
            articles(settings, &plugin, manifest, params, target)
        },
        Command::Validate { plugin, params } => validate(settings, &plugin, params),
        Command::Plugins => {
            plugins(settings);
            Ok(())
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match load_settings(cli.config.as_ref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err:?}");
            return ExitCode::FAILURE;
        },
    };
    init_logging(cli.verbose.saturating_add(settings.verbosity));

    match run(cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}
