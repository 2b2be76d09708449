use clap::{ArgAction, Parser};
use simple_index::assets::Assets;
use simple_index::config::{self, IndexConfig, Overrides};
use simple_index::filesystem::LocalFs;
use simple_index::indexer::TreeIndexer;
use simple_index::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that replaces the
/// `-v` level.
const LOG_ENV: &str = "SIMPLE_INDEX_LOG";

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-index")]
#[command(about = "Write a static index.html into every directory of a tree")]
#[command(long_about = "\
Write a static index.html into every directory of a tree

Every directory under ROOT_DIR gets a page listing its subdirectories and
files with an icon, modification date and size. Subdirectory pages link back
to their parent; the top-level page does not.

  site/
  ├── index.html          # lists docs/ and readme.txt
  ├── docs/
  │   ├── index.html      # lists .. and guide.pdf
  │   └── guide.pdf
  └── readme.txt

Existing index.html files are overwritten and never listed.

Run 'simple-index --gen-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Directory to index
    #[arg(required_unless_present = "gen_config")]
    root_dir: Option<PathBuf>,

    /// Paths to leave out of every listing
    #[arg(long, num_args = 0..)]
    ignore: Vec<PathBuf>,

    /// Leave out files and directories starting with "."
    #[arg(long, alias = "ignore_hidden")]
    ignore_hidden: bool,

    /// Title of the top-level page
    #[arg(long)]
    title: Option<String>,

    /// Footer HTML for every page
    #[arg(long)]
    footer: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with templates and icons to use instead of the built-ins
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print a stock config with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_logging(cli.verbose);

    let root_dir = cli.root_dir.ok_or("ROOT_DIR is required")?;
    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => IndexConfig::default(),
    };
    let config = file_config.with_overrides(Overrides {
        title: cli.title,
        footer: cli.footer,
        ignore: cli.ignore,
        ignore_hidden: cli.ignore_hidden,
        assets_dir: cli.assets,
    })?;
    tracing::debug!(?config, "resolved config");

    let version = version_string();
    let assets = match &config.assets_dir {
        Some(dir) => Assets::load_dir(dir, version)?,
        None => Assets::builtin(version)?,
    };

    let report = TreeIndexer::new(&assets, LocalFs)
        .ignore(&config.ignore)
        .ignore_hidden(config.ignore_hidden)
        .write_index(
            &root_dir,
            config.title.as_deref(),
            config.footer.as_deref(),
            true,
        )?;

    output::print_index_report(&report);
    Ok(())
}
