use clap::{Parser, Subcommand};
use simple_notes::pipeline::{self, SiteBuild};
use simple_notes::types::{IndexManifest, RouteManifest};
use simple_notes::{config, output, query};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "simple-notes")]
#[command(about = "Index markdown notes and enumerate their static routes")]
#[command(long_about = "\
Index markdown notes and enumerate their static routes

Your filesystem is the data source. Each note is a markdown file with YAML
front matter; its path below the content root is its identity.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── README.md                    # Root-level files are not notes
  ├── ai/
  │   ├── 2024-03-01-agents.md     # → /posts/ai/2024-03-01-agents
  │   └── llm/
  │       └── prompting.md         # → /posts/ai/llm/prompting
  └── reading/
      └── deep-work/
          └── index.md             # → /posts/reading/deep-work

Front matter:

  ---
  title: Agents in practice        # required
  date: 2024-03-01                 # required
  source: https://example.com      # required
  category: ai                     # required, see [[categories]]
  status: published                # required
  subcategory: llm                 # optional
  tags: [agents, tooling]          # optional
  related: [ai/llm/prompting]      # optional, raw paths of other notes
  ---

Run 'simple-notes gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for manifests
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index the notes and write manifest.json and routes.json
    Build,
    /// Validate every note; fails if any note is invalid
    Check,
    /// Print every static route with its URL
    Routes,
    /// Print note counts per category
    Stats,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build => {
            println!("==> Building {}", cli.source.display());
            let (site, site_config) = run_build(&cli.source, true)?;
            output::print_index_output(&site);

            std::fs::create_dir_all(&cli.output)?;
            let manifest = IndexManifest::from_build(&site, &site_config.routes);
            let manifest_path = cli.output.join("manifest.json");
            std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
            let routes = RouteManifest::from_table(&site.routes);
            let routes_path = cli.output.join("routes.json");
            std::fs::write(&routes_path, serde_json::to_string_pretty(&routes)?)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (site, _) = run_build(&cli.source, false)?;
            if !site.diagnostics.is_empty() {
                output::print_validation_errors(&site.diagnostics);
                return Ok(ExitCode::FAILURE);
            }
            println!("==> Content is valid");
        }
        Command::Routes => {
            let (site, _) = run_build(&cli.source, false)?;
            output::print_routes(&site.routes);
        }
        Command::Stats => {
            let (site, _) = run_build(&cli.source, false)?;
            let counts = query::count_by_category(&site.index, &site.registry);
            output::print_category_counts(&counts, &site.registry);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load config, size the pool and run one build pass.
///
/// With `verbose`, progress events are printed as they arrive.
fn run_build(
    source: &Path,
    verbose: bool,
) -> Result<(SiteBuild, config::SiteConfig), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    init_thread_pool(&site_config.processing);

    if !verbose {
        let site = pipeline::build(source, &site_config, None)?;
        return Ok((site, site_config));
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_build_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pipeline::build(source, &site_config, Some(tx));
    printer.join().ok();
    Ok((result?, site_config))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
