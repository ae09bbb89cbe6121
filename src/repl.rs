use log::info;

use std::io::{self, BufRead, Write};

use crate::{
    eval::eval,
    reader::read,
    value::{EvalResult, Value},
};

pub const PROMPT: &str = "Lisp>>> ";
pub const SENTINEL: &str = "quit";

fn read_eval(s: &str) -> EvalResult {
    eval(read(s)?)
}

fn print(result: EvalResult) -> String {
    result.map_or_else(|e| e.to_string(), |v: Value| v.to_string())
}

/// Reads one expression from `s`, evaluates it and renders the outcome.
/// Failures are rendered too, so this always produces a line of output.
pub fn rep(s: &str) -> String {
    print(read_eval(s))
}

/// Prompts, evaluates and prints one line at a time until the input ends or
/// a line reads `quit`.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    info!("repl::run(), waiting for input");

    let mut line = String::new();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if line.trim() == SENTINEL {
            return Ok(());
        }

        writeln!(output, "{}", rep(line))?;
        output.flush()?;
    }
}
