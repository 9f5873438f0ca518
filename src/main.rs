use card_bleeder::imaging::RustBackend;
use card_bleeder::pdf::PdfWriter;
use card_bleeder::pipeline::{self, RunOptions};
use card_bleeder::{config, logging, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flags shared by every command.
#[derive(clap::Args, Clone)]
struct GlobalArgs {
    /// Log debug detail (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log lines to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Worker threads for bleeding (default: all cores, never more)
    #[arg(short, long, global = true, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Root directory of the card tree
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Leave the bled images next to their sources after merging
    #[arg(long)]
    keep_bleeds: bool,
}

#[derive(clap::Args, Clone)]
struct RootArgs {
    /// Root directory of the card tree
    #[arg(default_value = ".")]
    root: PathBuf,
}

#[derive(clap::Args, Clone)]
struct CheckArgs {
    /// Root directory of the card tree
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "card-bleeder")]
#[command(about = "Add print bleed to card images and merge them into PDFs")]
#[command(long_about = "\
Add print bleed to card images and merge them into PDFs

Your directory tree is the project. Each directory holds fronts, one back
image and an optional config file; settings cascade to subdirectories.

Card tree:

  deck/
  ├── config.ini                   # Optional, overrides stock defaults
  ├── monsters/
  │   ├── back.png                 # Back for this directory and below
  │   ├── 1.png                    # Fronts, in numeric order
  │   ├── 2.png
  │   └── elite/                   # Inherits config and back
  │       └── 1.png
  └── promo/
      ├── config.ini               # output = true → deck-promo.pdf
      ├── promo_back.jpg
      └── 1.jpg

Output: deck/deck.pdf, deck/deck-promo.pdf. Each front is printed
`quantity` times, every front page followed by its back.

Run 'card-bleeder gen-config' to print a documented config.ini.")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Bleed every card and merge the PDFs (default)
    Run(RunArgs),
    /// Remove bled images left behind by an earlier run
    Clean(RootArgs),
    /// Resolve configs and plan documents without writing anything
    Check(CheckArgs),
    /// Print a stock config.ini with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose, cli.global.log_file.as_deref())?;

    match cli.command.unwrap_or(Command::Run(cli.run)) {
        Command::Run(args) => {
            init_thread_pool(cli.global.jobs);
            println!("==> Bleeding {}", args.root.display());
            let summary = pipeline::run(
                &args.root,
                &RustBackend::new(),
                &PdfWriter::new(),
                RunOptions {
                    keep_bleeds: args.keep_bleeds,
                },
            )?;
            output::print_run_summary(&summary);
        }
        Command::Clean(args) => {
            println!("==> Cleaning {}", args.root.display());
            let removed = pipeline::clean(&args.root)?;
            output::print_clean_output(removed);
        }
        Command::Check(args) => {
            init_thread_pool(cli.global.jobs);
            let report = pipeline::check(&args.root, &RustBackend::new())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("==> Checking {}", report.root.display());
                output::print_check_report(&report);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(jobs: Option<usize>) {
    let threads = config::effective_threads(jobs);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
