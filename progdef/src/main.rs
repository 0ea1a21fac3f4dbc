//! Program definition tool.
//!
//! Loads a program JSON file and its question catalog, reports block order
//! and predicate ordering problems, and applies structural edits that keep
//! blocks in canonical order.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use progdef::core::types::{BlockId, Direction, PredicateKind};
use progdef::edit::{EditOutcome, insert_block, move_block, order_program};
use progdef::error::ProgramError;
use progdef::exit_codes;
use progdef::inspect::{available_from_workspace, slice_from_workspace};
use progdef::io::config::DEFAULT_CONFIG_FILE;
use progdef::logging;
use progdef::validate::validate_workspace;
use progdef::workspace::{FileOverrides, ProgramWorkspace};

#[derive(Parser)]
#[command(
    name = "progdef",
    version,
    about = "Inspect and edit block order of program definitions"
)]
struct Cli {
    /// Config file; relative paths inside it resolve against its directory.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Program JSON file, overriding the config.
    #[arg(long, global = true)]
    program: Option<PathBuf>,
    /// Question catalog JSON file, overriding the config.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check schema and invariants, then report order and predicate problems.
    Validate,
    /// Rewrite the program with blocks in canonical order.
    Order,
    /// Print the index range a block and its repeated blocks occupy.
    Slice { block_id: BlockId },
    /// List questions a predicate on the block may reference.
    Available {
        block_id: BlockId,
        /// Eligibility predicate instead of visibility predicate.
        #[arg(long)]
        eligibility: bool,
    },
    /// Insert the block stored in a JSON file.
    Insert { block_file: PathBuf },
    /// Move a block past its neighboring sibling.
    Move {
        block_id: BlockId,
        #[arg(value_enum)]
        direction: Direction,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let overrides = FileOverrides {
        program_path: cli.program,
        catalog_path: cli.catalog,
    };
    let workspace = ProgramWorkspace::open(&cli.config, &overrides)?;
    match cli.command {
        Command::Validate => cmd_validate(&workspace),
        Command::Order => {
            print_edit(&order_program(&workspace)?);
            Ok(exit_codes::OK)
        }
        Command::Slice { block_id } => {
            let report = slice_from_workspace(&workspace, block_id)?;
            let ids: Vec<String> = report.block_ids.iter().map(ToString::to_string).collect();
            println!("{} [{}]", report.slice, ids.join(", "));
            Ok(exit_codes::OK)
        }
        Command::Available {
            block_id,
            eligibility,
        } => {
            let kind = if eligibility {
                PredicateKind::Eligibility
            } else {
                PredicateKind::Visibility
            };
            for question in available_from_workspace(&workspace, block_id, kind)? {
                println!("{}\t{}", question.id, question.name);
            }
            Ok(exit_codes::OK)
        }
        Command::Insert { block_file } => {
            print_edit(&insert_block(&workspace, &block_file)?);
            Ok(exit_codes::OK)
        }
        Command::Move {
            block_id,
            direction,
        } => {
            print_edit(&move_block(&workspace, block_id, direction)?);
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_validate(workspace: &ProgramWorkspace) -> Result<i32> {
    let outcome = validate_workspace(workspace)?;
    let order = if outcome.ordered {
        "canonical order"
    } else {
        "not in canonical order"
    };
    println!(
        "program {}: {} blocks, {}",
        outcome.program_id, outcome.block_count, order
    );
    for violation in &outcome.violations {
        println!("{}", violation);
    }
    Ok(exit_codes::OK)
}

fn print_edit(outcome: &EditOutcome) {
    let ids: Vec<String> = outcome.block_ids.iter().map(ToString::to_string).collect();
    let status = if outcome.changed { "updated" } else { "unchanged" };
    println!(
        "program {} {}: {}",
        outcome.program_id,
        status,
        ids.join(" ")
    );
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let program_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ProgramError>());
    match program_error {
        Some(ProgramError::BlockNotFound { .. }) => exit_codes::BLOCK_NOT_FOUND,
        Some(ProgramError::IllegalPredicateOrdering { .. }) => {
            exit_codes::ILLEGAL_PREDICATE_ORDERING
        }
        _ => exit_codes::INVALID,
    }
}
