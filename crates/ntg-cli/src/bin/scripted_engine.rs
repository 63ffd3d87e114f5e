//! scripted-engine: deterministic stand-in for the move engine
//!
//! Speaks the engine protocol (state lines, then `STATE END`, answered by one line) so the
//! contestant can be exercised without the real search.
//!
//! Usage: scripted-engine <count|echo|blank|exit|hang|raw> [payload]
//!
//! With a payload the engine answers that single block and exits, which is how it is
//! driven in spawn-per-move mode.

use ntg_core::{BlockDecoder, SENTINEL, StateBlock};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    /// Reply `move<N>` for the Nth block
    Count,
    /// Reply the block's lines joined by `|`, or `<empty>`
    Echo,
    /// Reply an empty line
    Blank,
    /// Read one block and exit without replying
    Exit,
    /// Never reply, and ignore end-of-input
    Hang,
    /// Reply the exact bytes received for the block, escaped onto one line
    Raw,
}

impl Behavior {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "count" => Some(Behavior::Count),
            "echo" => Some(Behavior::Echo),
            "blank" => Some(Behavior::Blank),
            "exit" => Some(Behavior::Exit),
            "hang" => Some(Behavior::Hang),
            "raw" => Some(Behavior::Raw),
            _ => None,
        }
    }
}

/// What to do after seeing one complete block
enum Step {
    Reply(String),
    Quit,
    Stall,
}

fn respond(behavior: Behavior, block: &StateBlock, n: usize) -> Step {
    match behavior {
        Behavior::Count => Step::Reply(format!("move{}", n)),
        Behavior::Echo if block.is_empty() => Step::Reply("<empty>".into()),
        Behavior::Echo => Step::Reply(block.lines().join("|")),
        Behavior::Blank => Step::Reply(String::new()),
        Behavior::Exit => Step::Quit,
        Behavior::Hang => Step::Stall,
        Behavior::Raw => Step::Reply(format!("{:?}", block.to_payload())),
    }
}

fn stall() -> ! {
    loop {
        thread::sleep(Duration::from_secs(3600));
    }
}

/// Echo each block's bytes exactly as they arrived, terminators and sentinel included
fn serve_raw() -> io::Result<()> {
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let mut received = String::new();

    loop {
        let start = received.len();
        if input.read_line(&mut received)? == 0 {
            return Ok(());
        }
        if received[start..].trim_end_matches(['\r', '\n']) == SENTINEL {
            writeln!(out, "{:?}", received)?;
            out.flush()?;
            received.clear();
        }
    }
}

fn serve_stdin(behavior: Behavior) -> io::Result<()> {
    if behavior == Behavior::Raw {
        return serve_raw();
    }
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    let mut decoder = BlockDecoder::new();
    let mut served = 0;

    for line in stdin.lock().lines() {
        let Some(block) = decoder.push_line(&line?) else {
            continue;
        };
        served += 1;
        match respond(behavior, &block, served) {
            Step::Reply(reply) => {
                writeln!(out, "{}", reply)?;
                out.flush()?;
            }
            Step::Quit => return Ok(()),
            Step::Stall => stall(),
        }
    }

    if behavior == Behavior::Hang {
        stall();
    }
    Ok(())
}

fn serve_payload(behavior: Behavior, payload: &str) -> io::Result<()> {
    let block = StateBlock::from_lines(payload.lines());
    match respond(behavior, &block, 1) {
        Step::Reply(reply) => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", reply)?;
            out.flush()
        }
        Step::Quit => Ok(()),
        Step::Stall => stall(),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let behavior = match args.first().map(String::as_str).and_then(Behavior::parse) {
        Some(behavior) => behavior,
        None => {
            eprintln!("Usage: scripted-engine <count|echo|blank|exit|hang|raw> [payload]");
            return ExitCode::from(2);
        }
    };

    let result = match args.get(1) {
        Some(payload) => serve_payload(behavior, payload),
        None => serve_stdin(behavior),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("scripted-engine: {}", e);
            ExitCode::FAILURE
        }
    }
}
