use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use explorer_board::Board;
use explorer_core::{Card, Seat, Strain};
use explorer_dds::{annotate, DoubleDummy, ProcessSolver};
use explorer_ibb::{Layout, Recognizer};
use explorer_pbn::{deals_to_html, load_deals, rotate_notation};
use tracing::debug;

mod logging;
mod report;

use report::BoardReport;

#[derive(Parser)]
#[command(name = "explorer", version)]
#[command(about = "Explore bridge deals: replay tricks, ask a double-dummy solver, read screenshots")]
struct Cli {
    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a board after some plays, with the legal plays for the player on turn
    Play(BoardArgs),

    /// Like `play`, and also ask a double-dummy solver about every legal play
    Solve {
        #[command(flatten)]
        board: BoardArgs,

        /// Solver executable: reads one JSON request line, writes one JSON reply
        #[arg(long, value_name = "CMD")]
        solver: String,

        /// Extra argument for the solver (repeatable)
        #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
        solver_args: Vec<String>,

        /// Also print makeable tricks for every strain and declarer
        #[arg(long)]
        table: bool,
    },

    /// Read the 52 cards from a screenshot
    Recognize {
        /// Screenshot of a deal
        #[arg(value_name = "SCREENSHOT")]
        screenshot: PathBuf,

        /// Reference screenshot with N spades, E diamonds, S clubs, W hearts
        #[arg(long, value_name = "PNG")]
        black: PathBuf,

        /// Reference screenshot with N hearts, E clubs, S diamonds, W spades
        #[arg(long, value_name = "PNG")]
        red: PathBuf,

        /// Layout JSON (defaults to a 750x1334 phone screen)
        #[arg(long, value_name = "JSON")]
        layout: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a deal so that SEAT's hand comes first
    Rotate {
        notation: String,
        #[arg(value_parser = parse_seat)]
        seat: Seat,
    },

    /// Turn a deals file into per-player HTML pages
    Split {
        #[arg(value_name = "FILE.pbn")]
        file: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "deals.html")]
        output: PathBuf,

        /// Page each board links to
        #[arg(long, default_value = "http://www.danvk.org/bridge/")]
        link_base: String,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// Deal notation, e.g. "N:T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862 AK6.AT5.A97.AQT4"
    notation: String,

    /// Trump suit, or N for no trump
    #[arg(long, default_value = "N", value_parser = parse_strain)]
    strain: Strain,

    /// Declarer; the opening lead comes from their left. Without it the
    /// first hand in the notation leads.
    #[arg(long, value_parser = parse_seat)]
    declarer: Option<Seat>,

    /// Cards played so far, e.g. 5D,2D,QD
    #[arg(long, value_delimiter = ',', value_parser = parse_card)]
    plays: Vec<Card>,

    /// Take back this card and everything played after it
    #[arg(long, value_name = "CARD", value_parser = parse_card)]
    undo_to: Option<Card>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl BoardArgs {
    fn board(&self) -> Result<Board> {
        let mut board = match self.declarer {
            Some(declarer) => Board::with_declarer(&self.notation, self.strain, declarer),
            None => Board::new(&self.notation, self.strain),
        }
        .context("invalid deal")?;

        for &card in &self.plays {
            board
                .play_card(card)
                .with_context(|| format!("cannot play {card}"))?;
        }
        if let Some(card) = self.undo_to {
            board
                .undo_to_card(card)
                .with_context(|| format!("cannot undo to {card}"))?;
        }
        Ok(board)
    }
}

fn parse_card(s: &str) -> Result<Card, String> {
    Card::from_code(&s.trim().to_ascii_uppercase()).ok_or_else(|| format!("invalid card: {s}"))
}

fn parse_seat(s: &str) -> Result<Seat, String> {
    s.parse()
}

fn parse_strain(s: &str) -> Result<Strain, String> {
    s.parse()
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Play(args) => {
            let board = args.board()?;
            BoardReport::new(&board).print(args.json)?;
        }
        Command::Solve {
            board: args,
            solver,
            solver_args,
            table,
        } => {
            let board = args.board()?;
            let dd = DoubleDummy::new(ProcessSolver::new(solver).with_args(solver_args));

            let mut report = BoardReport::new(&board);
            if !board.is_complete() {
                let next = dd.next_plays_for(&board).context("solver failed")?;
                report = report.with_solutions(&annotate(&board, &next));
            }
            if table {
                let table = dd
                    .dd_table(&board.to_notation())
                    .context("solver failed on the trick table")?;
                report = report.with_table(&table);
            }
            debug!(cached = dd.cached(), "solver queries answered");
            report.print(args.json)?;
        }
        Command::Recognize {
            screenshot,
            black,
            red,
            layout,
            json,
        } => {
            let layout = match layout {
                Some(path) => Layout::from_path(&path)?,
                None => Layout::iphone6(),
            };
            let open = |path: &PathBuf| -> Result<image::RgbImage> {
                Ok(image::open(path)
                    .with_context(|| format!("reading {}", path.display()))?
                    .to_rgb8())
            };
            let recognizer = Recognizer::new(layout, &open(&black)?, &open(&red)?)?;
            let recognition = recognizer.recognize(&open(&screenshot)?)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recognition)?);
            } else {
                println!("{}", recognition.notation);
                println!("margin: {:.3}", recognition.margin);
                for error in &recognition.errors {
                    println!("{error}");
                }
            }
            if !recognition.is_clean() {
                return Ok(ExitCode::from(1));
            }
        }
        Command::Rotate { notation, seat } => {
            println!("{}", rotate_notation(&notation, seat)?);
        }
        Command::Split {
            file,
            output,
            link_base,
        } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let records = load_deals(&text);
            let html = deals_to_html(&records, &link_base)?;
            fs::write(&output, html).with_context(|| format!("writing {}", output.display()))?;

            let boards = records.iter().filter(|r| r.deal.is_some()).count();
            println!("Wrote {boards} boards to {}", output.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
