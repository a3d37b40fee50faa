mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::path::PathBuf;
use store::{Config, Editor};
use tree_model::search::SortColumn;
use tree_model::validate::NodeDraft;
use tree_model::ROOT_SENTINEL;

use crate::commands::NodeChanges;

#[derive(Parser)]
#[command(
    name = "orgtree",
    about = "Build, browse and persist labeled trees such as organisation charts"
)]
struct Cli {
    /// Directory holding the saved tree (defaults to $ORGTREE_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the whole tree as an indented outline
    Show,
    /// Print every node as a table row, sorted by name
    List {
        /// Column to sort by: parent, name, link or description
        #[arg(long)]
        sort: Option<SortColumn>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Find nodes whose name contains the query, ignoring case and accents
    Search {
        query: String,
        /// Show matches inside the tree instead of a table
        #[arg(long)]
        tree: bool,
    },
    /// List the names a node can be placed under
    Parents {
        /// Leave out this node and its subtree
        #[arg(long)]
        editing: Option<String>,
    },
    /// Add a node
    Add {
        name: String,
        /// Parent node name; omit for a root node
        #[arg(long, default_value = ROOT_SENTINEL)]
        parent: String,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a node's name, link, description or parent
    Edit {
        name: String,
        /// New name
        #[arg(long = "name")]
        new_name: Option<String>,
        /// New parent; use the root sentinel to make it a root
        #[arg(long)]
        parent: Option<String>,
        /// New link; pass an empty string to clear it
        #[arg(long)]
        link: Option<String>,
        /// New description; pass an empty string to clear it
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a node and, with --yes, its whole subtree
    Delete {
        name: String,
        #[arg(long)]
        yes: bool,
    },
    /// Delete the whole tree
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Replace the tree with the contents of a JSON file
    Import {
        file: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    /// Write the tree to a timestamped JSON file
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Replace the tree with the bundled sample
    Sample {
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let config = Config::resolve(cli.data_dir);
    debug!("Using data directory {}", config.data_dir.display());
    let mut editor = Editor::open(config.open_store(), config.storage_key.as_str());

    match cli.command {
        Command::Show => commands::show(&editor),
        Command::List { sort, desc } => commands::list(&editor, sort, desc),
        Command::Search { query, tree } => commands::search(&editor, &query, tree),
        Command::Parents { editing } => commands::parents(&editor, editing.as_deref()),
        Command::Add {
            name,
            parent,
            link,
            description,
        } => {
            let draft = NodeDraft {
                name,
                link,
                description,
            };
            commands::add(&mut editor, draft, &parent)
        }
        Command::Edit {
            name,
            new_name,
            parent,
            link,
            description,
        } => commands::edit(
            &mut editor,
            &name,
            NodeChanges {
                name: new_name,
                parent,
                link,
                description,
            },
        ),
        Command::Delete { name, yes } => commands::delete(&mut editor, &name, yes),
        Command::Clear { yes } => commands::clear(&mut editor, yes),
        Command::Import { file, yes } => commands::import(&mut editor, &file, yes),
        Command::Export { out } => commands::export(&editor, &out),
        Command::Sample { yes } => commands::sample(&mut editor, yes),
    }
}
