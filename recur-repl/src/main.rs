mod command;
mod error;
mod session;

use rustyline::{error::ReadlineError, DefaultEditor};
use session::Session;
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}, process::ExitCode};

/// Runs a line in the session, printing the output or the error report.
///
/// Returns true if the line ran successfully.
fn run_line(line: &str, session: &mut Session) -> bool {
    match session.execute(line) {
        Ok(Some(output)) => {
            println!("{}", output);
            true
        },
        Ok(None) => true,
        Err(err) => {
            err.report_to_stderr(line);
            false
        },
    }
}

/// Runs every line of a script, stopping at the first failure.
fn run_script(input: &str) -> ExitCode {
    let mut session = Session::new();
    for line in input.lines() {
        if !run_line(line, &mut session) {
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Reads the whole script from the given reader.
fn read_script(mut reader: impl Read) -> io::Result<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(input)
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run script file
        match File::open(&filename).and_then(|file| read_script(BufReader::new(file))) {
            Ok(input) => run_script(&input),
            Err(err) => {
                eprintln!("could not read {}: {}", filename, err);
                ExitCode::FAILURE
            },
        }
    } else if !io::stdin().is_terminal() {
        // read script from stdin
        match read_script(io::stdin()) {
            Ok(input) => run_script(&input),
            Err(err) => {
                eprintln!("could not read stdin: {}", err);
                ExitCode::FAILURE
            },
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            },
        };
        let mut session = Session::new();

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            run_line(&input, session);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
        ExitCode::SUCCESS
    }
}
