//! Sotto CLI - Resolve spoken file references from the command line

use clap::{Parser, Subcommand};
use sotto_core::{resolve_spoken, rewrite_transcript, Config, TreeIndex};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sotto")]
#[command(about = "Resolve spoken file references in transcripts", long_about = None)]
struct Cli {
    /// Config file with the [scan] ignore list (defaults built in)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore an extra directory name for this invocation (repeatable)
    #[arg(long, global = true, value_name = "DIR")]
    ignore: Vec<String>,

    /// Un-ignore a directory name for this invocation (repeatable)
    #[arg(long, global = true, value_name = "DIR")]
    no_ignore: Vec<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a root and show the directory summary
    Structure {
        /// Directory to scan
        root: PathBuf,
    },

    /// Rewrite transcript text against a scanned root
    Rewrite {
        /// Directory to scan
        root: PathBuf,

        /// Transcript text (read from stdin when omitted)
        text: Option<String>,
    },

    /// Resolve a single spoken name to a path
    Resolve {
        /// Directory to scan
        root: PathBuf,

        /// Spoken name, e.g. "app" or "main dot p y"
        name: String,
    },

    /// Show the effective ignored-directory list
    Ignored,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Structure { root } => cmd_structure(root, &cli),
        Commands::Rewrite { root, text } => cmd_rewrite(root, text.as_deref(), &cli),
        Commands::Resolve { root, name } => cmd_resolve(root, name, &cli),
        Commands::Ignored => cmd_ignored(&cli),
    };

    if let Err(e) = result {
        if cli.json {
            let error_json = serde_json::json!({ "error": e.to_string() });
            eprintln!("{}", serde_json::to_string_pretty(&error_json).unwrap());
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Log to stderr so rewritten text on stdout stays pipeable.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> sotto_core::Result<Config> {
    match path {
        Some(p) => Config::load(p),
        None => Ok(Config::default()),
    }
}

/// Build the engine for `root`, applying per-invocation ignore adjustments.
/// Adjustments go through the engine's mutable ignore surface and take
/// effect on the rescan that follows.
fn build_tree(root: &Path, cli: &Cli) -> sotto_core::Result<TreeIndex> {
    let config = load_config(cli.config.as_deref())?;
    let mut tree = TreeIndex::with_config(root, &config);

    if !cli.ignore.is_empty() || !cli.no_ignore.is_empty() {
        for dir in &cli.ignore {
            tree.add_ignored_dir(dir.clone());
        }
        for dir in &cli.no_ignore {
            tree.remove_ignored_dir(dir);
        }
        tree.rescan();
    }

    Ok(tree)
}

fn cmd_structure(root: &Path, cli: &Cli) -> sotto_core::Result<()> {
    use colored::Colorize;

    let tree = build_tree(root, cli)?;
    let report = tree.report();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{}: {}", "Root".blue(), report.monitored_root);
        println!("{}: {} spoken keys", "Tracked".blue(), report.keys_tracked);
        for (dir, files) in &report.folders {
            let label = if dir.is_empty() { "." } else { dir.as_str() };
            println!("  {}/", label.cyan());
            for file in files {
                println!("    {}", file);
            }
        }
        println!(
            "{}: {} directory names",
            "Ignored".yellow(),
            report.ignored_dirs.len()
        );
    }
    Ok(())
}

fn cmd_rewrite(root: &Path, text: Option<&str>, cli: &Cli) -> sotto_core::Result<()> {
    use colored::Colorize;

    let tree = build_tree(root, cli)?;
    let input = match text {
        Some(t) => t.to_string(),
        None => std::io::read_to_string(std::io::stdin())?,
    };

    let rewrite = rewrite_transcript(&input, tree.index());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rewrite).unwrap());
    } else {
        println!("{}", rewrite.text);
        if rewrite.changed {
            eprintln!("{}: file references resolved", "Rewritten".green());
        } else {
            eprintln!("{}: no file references found", "Unchanged".yellow());
        }
    }
    Ok(())
}

fn cmd_resolve(root: &Path, name: &str, cli: &Cli) -> sotto_core::Result<()> {
    use colored::Colorize;

    let tree = build_tree(root, cli)?;
    let resolved = resolve_spoken(name, tree.index());

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "name": name,
                "resolved": resolved,
            }))
            .unwrap()
        );
    } else {
        match resolved {
            Some(path) => println!("{}", path.cyan()),
            None => println!("{}: no file matches {:?}", "Not found".yellow(), name),
        }
    }
    Ok(())
}

fn cmd_ignored(cli: &Cli) -> sotto_core::Result<()> {
    use colored::Colorize;

    let config = load_config(cli.config.as_deref())?;
    let mut ignored: std::collections::BTreeSet<String> =
        config.scan.ignored_dirs.into_iter().collect();
    for dir in &cli.ignore {
        ignored.insert(dir.clone());
    }
    for dir in &cli.no_ignore {
        ignored.remove(dir);
    }

    if cli.json {
        let list: Vec<&String> = ignored.iter().collect();
        println!("{}", serde_json::to_string_pretty(&list).unwrap());
    } else {
        for dir in &ignored {
            println!("{}", dir);
        }
        println!("({} directory names)", ignored.len().to_string().cyan());
    }
    Ok(())
}
