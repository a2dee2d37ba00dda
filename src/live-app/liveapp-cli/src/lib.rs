//! CLI for live-app: scaffold a new live app from a bundled template.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use liveapp_manifest::{
    Bundler, MANIFEST_JSON, ManifestOptions, PACKAGE_JSON, PackageOptions,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub mod materialize;
pub mod prompt;

pub use materialize::{CopySummary, copy_template};
pub use prompt::{Prompter, ScriptedPrompter, TermPrompter, collect_options};

/// Environment variable holding the log filter (`tracing_subscriber` syntax).
pub const LOG_ENV: &str = "LIVE_APP_LOG";

#[derive(Parser)]
#[command(name = "live-app")]
#[command(version, about = "Create live apps from templates", long_about = None)]
pub struct Cli {
    /// Print debug logging to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new live app in a directory named after its package
    Init {
        /// Print what would be created and merged without writing anything
        #[arg(long, short = 'd', hide = true)]
        dry_run: bool,

        /// Only create a local app
        #[arg(long, short = 'n')]
        no_create: bool,

        /// Override the template root (for development/testing)
        #[arg(long, hide = true, env = "LIVE_APP_TEMPLATES")]
        templates_dir: Option<PathBuf>,
    },
}

/// Main entry point for the CLI.
pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init {
            dry_run,
            no_create,
            templates_dir,
        } => {
            if no_create {
                // Apps are only ever created locally; nothing is registered remotely.
                tracing::debug!("--no-create has no effect");
            }
            let request = InitRequest {
                cwd: std::env::current_dir().context("Failed to read the current directory")?,
                templates_root: templates_dir.unwrap_or_else(default_templates_root),
                dry_run,
            };
            init_app(&mut TermPrompter::new(), &request)?;
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Template root used when `--templates-dir` is not given.
///
/// A `templates` directory next to the running executable wins, so an
/// installed copy can ship its templates beside the binary. Otherwise the
/// templates in this crate's source tree are used, which only exist on the
/// machine that built the binary.
pub fn default_templates_root() -> PathBuf {
    let exe = std::env::current_exe().ok();
    templates_root_for(exe.as_deref())
}

fn templates_root_for(exe: Option<&Path>) -> PathBuf {
    if let Some(beside_exe) = exe.and_then(Path::parent).map(|dir| dir.join("templates")) {
        if beside_exe.is_dir() {
            return beside_exe;
        }
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// Template directory name for a language and bundler, e.g. `ts_webpack`.
pub fn template_id(typescript: bool, bundler: Bundler) -> String {
    let language = if typescript { "ts" } else { "js" };
    format!("{language}_{bundler}")
}

// ============================================================================
// Init pipeline
// ============================================================================

/// Inputs to `init` that do not come from prompts.
#[derive(Debug, Clone)]
pub struct InitRequest {
    pub cwd: PathBuf,
    pub templates_root: PathBuf,
    pub dry_run: bool,
}

/// Everything decided before any file is touched.
#[derive(Debug, Clone)]
pub struct InitPlan {
    pub template_id: String,
    pub template_dir: PathBuf,
    pub destination: PathBuf,
    pub package: PackageOptions,
    pub manifest: ManifestOptions,
}

impl InitPlan {
    pub fn new(
        request: &InitRequest,
        package: PackageOptions,
        manifest: ManifestOptions,
    ) -> Self {
        let template_id = template_id(package.typescript, package.bundler);
        Self {
            template_dir: request.templates_root.join(&template_id),
            destination: request.cwd.join(&package.name),
            template_id,
            package,
            manifest,
        }
    }
}

/// Ask the init questions, then create the app (or describe it on a dry run).
pub fn init_app(prompter: &mut dyn Prompter, request: &InitRequest) -> Result<InitPlan> {
    let (package, manifest) = collect_options(prompter, &request.cwd)?;
    let plan = InitPlan::new(request, package, manifest);
    tracing::debug!(
        template = %plan.template_id,
        destination = %plan.destination.display(),
        "planned init"
    );

    if request.dry_run {
        print!("{}", render_dry_run(&plan)?);
        return Ok(plan);
    }

    create_app(&plan)?;
    print!("{}", render_created(&plan));
    Ok(plan)
}

/// Copy the template and merge the answers into its JSON files.
///
/// A copy is not rolled back when a later merge fails.
pub fn create_app(plan: &InitPlan) -> Result<CopySummary> {
    let summary = copy_template(&plan.template_dir, &plan.template_id, &plan.destination)
        .with_context(|| format!("Failed to copy template '{}'", plan.template_id))?;

    merge_into(&plan.destination, PACKAGE_JSON, plan.package.package_json_fields())?;
    merge_into(
        &plan.destination,
        MANIFEST_JSON,
        plan.manifest.manifest_json_fields(),
    )?;

    Ok(summary)
}

fn merge_into(
    project_dir: &Path,
    file_name: &str,
    fields: serde_json::Map<String, serde_json::Value>,
) -> Result<()> {
    let path = project_dir.join(file_name);
    liveapp_manifest::merge_json_file(&path, fields)
        .with_context(|| format!("Failed to update {}", file_name))?;
    tracing::info!(path = %path.display(), "merged answers");
    Ok(())
}

// ============================================================================
// Reports
// ============================================================================

/// Describe what a dry run would have copied and merged.
pub fn render_dry_run(plan: &InitPlan) -> Result<String> {
    let package = liveapp_manifest::to_pretty_json(&plan.package)
        .context("Failed to render package options")?;
    let manifest = liveapp_manifest::to_pretty_json(&plan.manifest)
        .context("Failed to render manifest options")?;

    Ok(format!(
        "{}\n\n\
         Template:    {} ({})\n\
         Destination: {}\n\n\
         {}\n{}\n\
         {}\n{}",
        style("Dry run: nothing was written.").bold(),
        plan.template_id,
        plan.template_dir.display(),
        plan.destination.display(),
        style("Package options:").bold(),
        package,
        style("Manifest options:").bold(),
        manifest,
    ))
}

/// Success message with next steps.
pub fn render_created(plan: &InitPlan) -> String {
    format!(
        "{}\n\nNext steps:\n  cd {}\n  npm install\n  npm run build\n",
        style(format!(
            "Created {} in {}",
            plan.manifest.name,
            plan.destination.display()
        ))
        .green()
        .bold(),
        plan.package.name,
    )
}
