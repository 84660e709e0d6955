use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rewire_cli::config::{
	CONFIG_FILE_NAME, MergedConfig, Stage, discover_configs, init_template, load_config_file,
	load_merged_config, user_config_path,
};
use rewire_cli::context::{Gate, RunContext};
use rewire_cli::document::{Document, read_document};
use rewire_cli::pipeline::override_dev_server;
use rewire_cli::transforms::file_factory;

#[derive(Parser)]
#[command(name = "rewire")]
#[command(
	author,
	version,
	about = "Composable overrides for build-tool configuration documents"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .rewire.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .rewire.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Apply the build pipeline to a JSON configuration document
	Apply {
		#[command(flatten)]
		run: RunArgs,
	},
	/// Apply the dev-server pipeline through a (proxy, allowed host) factory
	DevServer {
		#[command(flatten)]
		run: RunArgs,

		/// Proxy setting as JSON (a bare string is taken literally)
		#[arg(long)]
		proxy: Option<String>,

		/// Host the dev server accepts requests for
		#[arg(long, default_value = "localhost")]
		allowed_host: String,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Args)]
struct RunArgs {
	/// Base configuration document (JSON)
	document: PathBuf,

	/// Use this pipeline file instead of the .rewire.toml cascade
	#[arg(long, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Write the result here instead of stdout
	#[arg(long, short, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Arguments of the build invocation, visible to gates (e.g. --analyze)
	#[arg(last = true, allow_hyphen_values = true)]
	run_args: Vec<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display merged effective configuration with source annotations
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	// A subscriber may already be installed by an embedding process
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Apply { run } => handle_apply(&run),
			Commands::DevServer {
				run,
				proxy,
				allowed_host,
			} => handle_dev_server(&run, proxy.as_deref(), allowed_host),
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(),
				ConfigAction::Validate => handle_config_validate(),
			},
		};
	}

	// No command specified - this shouldn't happen due to arg_required_else_help
	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn load_pipeline_config(explicit: Option<&Path>, ctx: &RunContext) -> Result<MergedConfig> {
	match explicit {
		Some(path) => load_config_file(path)
			.with_context(|| format!("Failed to load pipeline file {}", path.display())),
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd, ctx).context("Failed to load configuration")
		}
	}
}

fn write_output(doc: &Document, output: Option<&Path>) -> Result<()> {
	let rendered = serde_json::to_string_pretty(doc).context("Failed to serialize document")?;

	match output {
		Some(path) => std::fs::write(path, rendered + "\n")
			.with_context(|| format!("Failed to write {}", path.display())),
		None => {
			println!("{rendered}");
			Ok(())
		}
	}
}

fn handle_apply(run: &RunArgs) -> Result<ExitCode> {
	let ctx = RunContext::from_env_with_args(run.run_args.clone());
	let config = load_pipeline_config(run.config.as_deref(), &ctx)?;
	let pipeline = config.build_pipeline();
	tracing::info!(pipeline = pipeline.name(), "applying");

	let doc = read_document(&run.document).context("Failed to load document")?;

	let doc = pipeline
		.apply(doc, &ctx)
		.with_context(|| format!("Failed to apply pipeline to {}", run.document.display()))?;

	write_output(&doc, run.output.as_deref())?;
	Ok(ExitCode::SUCCESS)
}

fn handle_dev_server(run: &RunArgs, proxy: Option<&str>, allowed_host: String) -> Result<ExitCode> {
	let ctx = RunContext::from_env_with_args(run.run_args.clone());
	let config = load_pipeline_config(run.config.as_deref(), &ctx)?;
	let pipeline = config.dev_server_pipeline();
	tracing::info!(pipeline = pipeline.name(), "applying to dev server");

	let proxy = proxy.map(|raw| {
		serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
	});

	let run_args = run.run_args.clone();
	let factory = override_dev_server(
		pipeline,
		move || RunContext::from_env_with_args(run_args.clone()),
		file_factory(run.document.clone()),
	);

	let doc = factory(proxy, allowed_host).with_context(|| {
		format!(
			"Failed to build dev server config from {}",
			run.document.display()
		)
	})?;

	write_output(&doc, run.output.as_deref())?;
	Ok(ExitCode::SUCCESS)
}

fn print_stage(index: usize, stage: &Stage) {
	println!("  Stage {}: {}", index + 1, stage.kind.key());
	if !stage.enabled {
		println!("    enabled: false");
	}
	if stage.when != Gate::Always {
		println!("    when: {}", stage.when);
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd, &RunContext::from_process())
		.context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		println!("# stages: {}", loaded.config.stages.len());
		println!("# dev-server: {}", loaded.config.dev_server.len());
		println!();

		for (i, stage) in loaded.config.stages.iter().enumerate() {
			print_stage(i, stage);
		}
		if !loaded.config.dev_server.is_empty() {
			println!("  [dev-server]");
			for (i, stage) in loaded.config.dev_server.iter().enumerate() {
				print_stage(i, stage);
			}
		}
		println!();
	}

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd, &RunContext::from_process()) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} stages, {} dev-server stages)",
						loaded.path.display(),
						loaded.config.stages.len(),
						loaded.config.dev_server.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
