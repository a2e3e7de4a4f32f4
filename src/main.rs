use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use instant::Duration;

use crossfill::{Puzzle, Solver, SolverConfig, WordList};

/// Fill a crossword structure with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Structure file: `_` for fillable cells, `#` for blocks
    structure: PathBuf,

    /// Word list file, one word per line (optionally `word;score`)
    words: PathBuf,

    /// Write the filled grid to this file as well as stdout
    output: Option<PathBuf>,

    /// Skip words scored below this value
    #[arg(short = 'm', long)]
    min_score: Option<i32>,

    /// Give up after this many milliseconds
    #[arg(short = 't', long)]
    timeout_ms: Option<u64>,

    /// Give up after visiting this many search states
    #[arg(long)]
    max_states: Option<u64>,

    /// Re-run arc consistency after every tentative assignment
    #[arg(long)]
    maintain_arcs: bool,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    crossfill::log::init_logger(cli.debug);

    match try_main(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load the puzzle, solve it, and print the result. Returns whether a fill was found.
fn try_main(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let words = WordList::load_from_path(&cli.words, cli.min_score)?;
    let structure = fs::read_to_string(&cli.structure)?;
    let puzzle = Puzzle::from_template(&structure, words)?;

    log::info!(
        "Loaded {}x{} structure with {} slots and {} words",
        puzzle.height(),
        puzzle.width(),
        puzzle.variable_count(),
        puzzle.words().len()
    );

    let config = SolverConfig {
        deadline: cli.timeout_ms.map(Duration::from_millis),
        max_states: cli.max_states,
        maintain_arc_consistency: cli.maintain_arcs,
    };

    match Solver::with_config(&puzzle, config).solve() {
        Ok(solution) => {
            let grid = puzzle.render(&solution.assignment);
            println!("{grid}");
            eprintln!("{:?}", solution.statistics);

            if let Some(output) = &cli.output {
                fs::write(output, format!("{grid}\n"))?;
                log::info!("Wrote fill to {}", output.display());
            }
            Ok(true)
        }
        Err(failure) => {
            println!("No solution.");
            eprintln!("{failure}");
            Ok(false)
        }
    }
}
