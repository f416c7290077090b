//! `nim`: terminal client for the Nim matchmaking server.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use nim_client::bootstrap;
use nim_client::query::DEFAULT_QUERY_TIMEOUT;
use nim_client::{check_handle, query_server, render_census, ClientError, GameResult, MatchInfo, PlaySession, Player};
use nim_core::{Board, Move, MoveError};
use tracing::error;

#[derive(Parser)]
#[clap(name = "nim")]
#[clap(about = "Play Misère Nim against another player, or list games in progress")]
struct Cli {
    /// Query the server for games in progress instead of playing
    #[clap(short, long)]
    query: bool,

    /// Server password
    #[clap(short, long, default_value = "")]
    password: String,

    /// Server address file
    #[clap(long, default_value = "nim.conf")]
    addr_file: PathBuf,

    /// Seconds to wait before retrying an unreadable address file
    #[clap(long, default_value_t = 60)]
    retry_secs: u64,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(ClientError::Argument(String::new()).exit_code());
        }
    };

    if cli.debug {
        tracing_subscriber::fmt().with_writer(io::stderr).init();
    }

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("nim: {}: exit {}", e, e.exit_code());
        process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let record = bootstrap::load(&cli.addr_file, Duration::from_secs(cli.retry_secs)).await?;

    if cli.query {
        let resp = query_server(&record.query_addr(), &cli.password, DEFAULT_QUERY_TIMEOUT).await?;
        print!("{}", render_census(&resp));
        return Ok(());
    }

    let mut session = PlaySession::connect(&record.play_addr()).await?;
    session.authenticate(&cli.password).await?;

    let handle = prompt_handle()?;
    session.submit_handle(&handle).await?;
    println!("Waiting for an opponent...");

    let info = session.await_match().await?;
    let mut player = TerminalPlayer;
    player.on_match_start(&info);

    match session.play(&mut player).await? {
        GameResult::Won => println!("\nGame over: you WIN!"),
        GameResult::Lost => println!("\nGame over: you LOSE!"),
    }
    Ok(())
}

fn prompt_handle() -> Result<String, ClientError> {
    let stdin = io::stdin();
    loop {
        print!("Enter a handle to play: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return Err(ClientError::Argument("no handle entered".to_string())),
            Ok(_) => {}
            Err(e) => return Err(ClientError::Argument(format!("reading handle: {}", e))),
        }

        let handle = line.trim();
        match check_handle(handle) {
            Ok(()) => return Ok(handle.to_string()),
            Err(e) => println!("{}", e),
        }
    }
}

/// Reads moves from stdin. The move request holds the connection idle,
/// so blocking here is harmless.
struct TerminalPlayer;

impl Player for TerminalPlayer {
    fn on_match_start(&mut self, info: &MatchInfo) {
        println!("\nTHE GAME HAS BEGUN!");
        println!("Player 1: {}", info.first);
        println!("Player 2: {}", info.second);
        println!("You are player {}, playing {}", info.seat.number(), info.opponent());
    }

    fn on_board(&mut self, board: &Board) {
        println!("\n{}", board);
    }

    fn choose_move(&mut self, _board: &Board) -> Move {
        print!("\nEnter move (row col, 0 0 resigns): ");
        let _ = io::stdout().flush();

        let stdin = io::stdin();
        loop {
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                // Nobody left to type: concede rather than hang the opponent.
                Ok(0) | Err(_) => return Move::Resign,
                Ok(_) => {}
            }
            if let Some(mv) = parse_move(&line) {
                return mv;
            }
            if !line.trim().is_empty() {
                print!("\nInvalid move, try again: ");
                let _ = io::stdout().flush();
            }
        }
    }

    fn on_invalid_move(&mut self, _mv: Move, err: &MoveError) {
        println!("\nInvalid move ({}), try again.", err);
    }

    fn on_waiting(&mut self) {
        println!("\nWaiting for opponent's move...");
    }
}

/// First two digits on the line, whitespace ignored: `"4 1"`, `"41"`.
fn parse_move(line: &str) -> Option<Move> {
    let mut digits = line.chars().filter(|c| !c.is_whitespace());
    let row = digits.next()?.to_digit(10)? as u8;
    let col = digits.next()?.to_digit(10)? as u8;
    Some(Move::from_coords(row, col))
}
