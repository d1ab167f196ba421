// src/cli.rs
use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, load_config};
use crate::core::entities::parse_entities;
use crate::models::Tag;
use crate::render::{Page, render_matrix, render_spans};
use crate::utils::find_csv_files;
use crate::workspace::Workspace;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to start the config search from (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub directory: PathBuf,

    /// Config file to use instead of searching for btag.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the directory holding the session documents
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the directory exports are written to
    #[arg(long, global = true)]
    pub results_dir: Option<PathBuf>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import CSV files, or every matching file under a directory
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Glob applied to file names inside directories
        #[arg(short, long, default_value = "*.csv")]
        pattern: String,
    },

    /// List imported files with their tagging progress
    List,

    /// Show a page of questions, or one question in detail
    Show {
        #[arg(short, long)]
        file: String,

        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// 1-based question number; shows its spans instead of a page
        #[arg(short, long)]
        question: Option<usize>,

        /// With --question, also print the word-by-entity tag grid
        #[arg(short, long)]
        matrix: bool,
    },

    /// Set the tag of one word for one entity
    Tag {
        #[arg(short, long)]
        file: String,

        /// 1-based question number
        #[arg(short, long)]
        question: usize,

        /// 0-based word position
        #[arg(short, long)]
        word: usize,

        #[arg(short, long)]
        entity: String,

        /// O, B or I
        tag: Tag,
    },

    /// Edit the entity list of a question
    Entity {
        #[arg(short, long)]
        file: String,

        /// 1-based question number
        #[arg(short, long)]
        question: usize,

        #[command(subcommand)]
        action: EntityAction,
    },

    /// Print the spans of every question in a file
    Spans {
        #[arg(short, long)]
        file: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write <file>_tagged.csv for one file, or for every imported file
    Export {
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum EntityAction {
    Add { name: String },
    Rename { old: String, new: String },
    Delete { name: String },
    /// Replace the whole list; tags of dropped entities are discarded
    Set { entities: String },
}

/// Builds the effective configuration from the config file and overrides.
///
/// # Errors
///
/// This function may return an error if the config file cannot be read or
/// parsed, or if the resulting settings are invalid.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => load_config(&args.directory)?,
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(dir) = &args.results_dir {
        config.results_dir.clone_from(dir);
    }
    config.validate()?;
    Ok(config)
}

fn question_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Question numbers start at 1"),
    }
}

/// Opens the workspace described by `args` and performs one command.
///
/// # Errors
///
/// Returns the first error from configuration, loading, the command itself
/// or persisting its result.
pub fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let mut workspace = Workspace::open(config)?;
    for warning in workspace.warnings() {
        eprintln!("warning: {warning}");
    }

    match args.command {
        Command::Import { paths, pattern } => {
            let files = find_csv_files(&paths, &pattern)?;
            if files.is_empty() {
                println!("No files matching '{pattern}'");
            }
            for path in files {
                let summary = workspace.import_path(&path)?;
                let verb = if summary.replaced { "Replaced" } else { "Imported" };
                println!(
                    "{verb} {}: {} questions ({} pre-tagged)",
                    summary.file, summary.questions, summary.pretagged
                );
            }
        }
        Command::List => {
            let files: Vec<String> = workspace.files().map(str::to_owned).collect();
            if files.is_empty() {
                println!("No files imported");
            }
            for file in files {
                let stats = workspace.stats(&file)?;
                println!(
                    "{file}: {}/{} questions tagged ({:.2}%), {}/{} words",
                    stats.tagged_questions,
                    stats.total_questions,
                    stats.calculate_percentage(),
                    stats.tagged_words,
                    stats.total_words
                );
            }
        }
        Command::Show {
            file,
            question: Some(number),
            matrix,
            ..
        } => {
            let index = question_index(number)?;
            let record = workspace.record(&file, index)?;
            let tokens = workspace.tokens(&file, index)?;
            let entities = workspace.entities(&file, index)?;
            println!("Question {number}: {}", record.question);
            println!("Entities: {}", entities.join(", "));
            println!();
            println!("{}", render_spans(&tokens, &workspace.spans(&file, index)?));
            if matrix {
                println!();
                println!(
                    "{}",
                    render_matrix(&tokens, &entities, |position, entity| {
                        workspace
                            .tag(&file, index, position, entity)
                            .unwrap_or_default()
                    })
                );
            }
            println!();
            println!("tags: {}", workspace.generate_tags(&file, index)?);
        }
        Command::Show {
            file,
            page,
            question: None,
            ..
        } => {
            let records = workspace.records(&file)?;
            let page = Page::new(records.len(), workspace.config().page_size, page);
            println!("{} (page {} of {})", page.label(), page.number, page.count);
            for index in page.range.clone() {
                let record = workspace.record(&file, index)?;
                let spans = workspace.spans(&file, index)?;
                println!(
                    "{:>4}. {} [{}] {} span(s)",
                    index.saturating_add(1),
                    record.question,
                    record.entities,
                    spans.len()
                );
            }
        }
        Command::Tag {
            file,
            question,
            word,
            entity,
            tag,
        } => {
            let index = question_index(question)?;
            workspace.update_tag(&file, index, word, &entity, tag)?;
            println!("{}", workspace.generate_tags(&file, index)?);
        }
        Command::Entity {
            file,
            question,
            action,
        } => {
            let index = question_index(question)?;
            match action {
                EntityAction::Add { name } => workspace.add_entity(&file, index, &name)?,
                EntityAction::Rename { old, new } => {
                    workspace.rename_entity(&file, index, &old, &new)?;
                }
                EntityAction::Delete { name } => workspace.delete_entity(&file, index, &name)?,
                EntityAction::Set { entities } => {
                    let list = parse_entities(&entities, workspace.config().delimiter);
                    workspace.set_entities(&file, index, &list)?;
                }
            }
            println!("Entities: {}", workspace.record(&file, index)?.entities);
        }
        Command::Spans { file, json } => {
            let count = workspace.records(&file)?.len();
            if json {
                let mut all = Vec::with_capacity(count);
                for index in 0..count {
                    all.push(serde_json::json!({
                        "question": workspace.record(&file, index)?.question,
                        "spans": workspace.spans(&file, index)?,
                    }));
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&all).context("Failed to encode spans")?
                );
            } else {
                for index in 0..count {
                    let tokens = workspace.tokens(&file, index)?;
                    println!("{}", render_spans(&tokens, &workspace.spans(&file, index)?));
                    println!();
                }
            }
        }
        Command::Export { file } => {
            let files: Vec<String> = match file {
                Some(file) => vec![file],
                None => workspace.files().map(str::to_owned).collect(),
            };
            for file in files {
                let path = workspace.export_file(&file)?;
                println!("Exported {file} to {}", path.display());
            }
        }
    }

    Ok(())
}
