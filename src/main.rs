use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tagit::{Options, Repository, TagitError};
use tracing_subscriber::EnvFilter;

/// tagit - Tag files in a directory tree and find them again by tag
#[derive(Parser)]
#[command(name = "tagit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Work directory; the repository is searched from here upwards
    #[arg(short, long, global = true, default_value = ".")]
    directory: PathBuf,

    /// Config file path (defaults to .tagit/config.toml in the repository)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize directory for file tagging
    Init {
        /// Directory to initialize (defaults to the work directory)
        directory: Option<PathBuf>,
    },

    /// Add new files under the repository root to the index
    Update {
        /// Also drop entries whose file no longer exists
        #[arg(long)]
        prune: bool,
    },

    /// Automatically tag all files extracting tags from their filenames
    Autotag,

    /// Tag a file with the given tags
    Tag {
        file: PathBuf,

        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove all given tags from file
    Untag {
        file: PathBuf,

        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Remove file from index
    Remove { file: PathBuf },

    /// List tags for file. If no file is given list all available tags
    Tags {
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List files matching all given tags (all indexed files if none given)
    Tagged {
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Choose a random file matching the specified tags
    Random {
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show index statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = Options::new(&cli.directory);
    if let Some(config) = &cli.config {
        options = options.with_config(config);
    }
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Init { directory } => {
            cmd_init(directory.as_deref().unwrap_or(&cli.directory), quiet)
        }
        Commands::Update { prune } => cmd_update(&options, prune, quiet),
        Commands::Autotag => cmd_autotag(&options, quiet),
        Commands::Tag { file, tags } => cmd_tag(&options, &file, &tags, quiet),
        Commands::Untag { file, tags } => cmd_untag(&options, &file, &tags, quiet),
        Commands::Remove { file } => cmd_remove(&options, &file, quiet),
        Commands::Tags { file, json } => cmd_tags(&options, file.as_deref(), json),
        Commands::Tagged { tags, json } => cmd_tagged(&options, &tags, json),
        Commands::Random { tags, json } => cmd_random(&options, &tags, json),
        Commands::Stats { json } => cmd_stats(&options, json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("TAGIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_init(directory: &Path, quiet: bool) -> tagit::Result<()> {
    if !Repository::init(directory)? {
        return Err(TagitError::AlreadyInitialized(directory.to_path_buf()));
    }
    if !quiet {
        println!("{} {}", "Initialized".green().bold(), directory.display());
    }
    Ok(())
}

fn cmd_update(options: &Options, prune: bool, quiet: bool) -> tagit::Result<()> {
    let repo = Repository::open(options)?;
    let report = if prune {
        repo.update_and_prune()?
    } else {
        repo.update()?
    };

    if !quiet {
        println!("  Files added:   {}", report.added.to_string().cyan());
        if prune {
            println!("  Files pruned:  {}", report.pruned.to_string().cyan());
        }
    }
    Ok(())
}

fn cmd_autotag(options: &Options, quiet: bool) -> tagit::Result<()> {
    let changed = Repository::open(options)?.autotag()?;
    if !quiet {
        println!("  Files retagged: {}", changed.to_string().cyan());
    }
    Ok(())
}

fn cmd_tag(options: &Options, file: &Path, tags: &[String], quiet: bool) -> tagit::Result<()> {
    Repository::open(options)?.tag(file, tags)?;
    if !quiet {
        println!(
            "{} {} with tags {}",
            "Tagged".green().bold(),
            file.display(),
            tags.join(",").cyan()
        );
    }
    Ok(())
}

fn cmd_untag(options: &Options, file: &Path, tags: &[String], quiet: bool) -> tagit::Result<()> {
    let removed = Repository::open(options)?.untag(file, tags)?;
    if !quiet && !removed {
        eprintln!("{}", format!("{} carried none of those tags", file.display()).yellow());
    }
    Ok(())
}

fn cmd_remove(options: &Options, file: &Path, quiet: bool) -> tagit::Result<()> {
    let removed = Repository::open(options)?.remove(file)?;
    if !quiet && !removed {
        eprintln!("{}", format!("{} is not indexed", file.display()).yellow());
    }
    Ok(())
}

fn cmd_tags(options: &Options, file: Option<&Path>, json: bool) -> tagit::Result<()> {
    let repo = Repository::open(options)?;
    let tags: Vec<String> = match file {
        Some(file) => repo.tags(file)?.into_iter().collect(),
        None => repo.all_tags()?,
    };

    if json {
        println!("{}", to_json(&tags)?);
        return Ok(());
    }
    for tag in tags {
        println!("{}", tag);
    }
    Ok(())
}

fn cmd_tagged(options: &Options, tags: &[String], json: bool) -> tagit::Result<()> {
    let files = Repository::open(options)?.tagged(tags)?;

    if json {
        println!("{}", to_json(&files)?);
        return Ok(());
    }
    for entry in files {
        println!("{}", entry.name);
    }
    Ok(())
}

fn cmd_random(options: &Options, tags: &[String], json: bool) -> tagit::Result<()> {
    let picked = Repository::open(options)?.random(tags)?;

    if json {
        println!("{}", to_json(&picked)?);
        return Ok(());
    }
    match picked {
        Some(entry) => println!("{}", entry.name),
        None => println!("No file found matching tags {}", tags.join(",")),
    }
    Ok(())
}

fn cmd_stats(options: &Options, json: bool) -> tagit::Result<()> {
    let repo = Repository::open(options)?;
    let stats = repo.stats()?;

    if json {
        println!("{}", to_json(&stats)?);
        return Ok(());
    }

    println!("{}", "Index Statistics".green().bold());
    println!();
    println!("  Root:          {}", repo.root().display().to_string().dimmed());
    println!("  Total files:   {}", stats.files.to_string().cyan());
    println!("  Unique tags:   {}", stats.tags.to_string().cyan());
    println!("  Untagged:      {}", stats.untagged.to_string().cyan());
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> tagit::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| TagitError::Io(e.into()))
}
