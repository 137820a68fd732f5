// intcode: run an Intcode program from the command line

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use intcode::{ascii, parse_program, Interpreter, Status, Word};

fn usage(program_name: &str) {
    eprintln!("Usage: {} <program-file> [--ascii] [input ...]", program_name);
    eprintln!();
    eprintln!("Runs the program, seeding it with the given integer inputs. Whenever");
    eprintln!("it needs more input, the next line of stdin is fed to it: as integers");
    eprintln!("(comma or space separated), or as text with --ascii.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} diagnostic.txt 5          # single numeric input", program_name);
    eprintln!("  {} droid.txt --ascii         # conversational program", program_name);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("intcode");

    let mut path = None;
    let mut ascii_mode = false;
    let mut seed: Vec<Word> = Vec::new();
    for arg in args.iter().skip(1) {
        if arg == "--ascii" {
            ascii_mode = true;
        } else if arg == "-h" || arg == "--help" {
            usage(program_name);
            return Ok(());
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            match arg.parse::<Word>() {
                Ok(value) => seed.push(value),
                Err(e) => {
                    eprintln!("Error: invalid input value '{}': {}", arg, e);
                    process::exit(1);
                }
            }
        }
    }

    let Some(path) = path else {
        eprintln!("Error: No program file provided");
        eprintln!();
        usage(program_name);
        process::exit(1);
    };

    if !Path::new(&path).exists() {
        eprintln!("Error: File '{}' not found", path);
        process::exit(1);
    }

    let source = fs::read_to_string(&path)?;
    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };
    eprintln!("Loaded {} words from {}", program.len(), path);

    let mut machine = Interpreter::new(&program, seed);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout().lock();

    loop {
        let status = match machine.run() {
            Ok(status) => status,
            Err(e) => {
                eprintln!("Runtime error: {}", e);
                process::exit(1);
            }
        };

        print_output(&mut stdout, &machine.drain_output(), ascii_mode)?;

        match status {
            Status::Halted => break,
            Status::AwaitingInput => {
                stdout.flush()?;
                let Some(line) = lines.next().transpose()? else {
                    eprintln!("Error: program is waiting for input but stdin is closed");
                    process::exit(1);
                };
                if ascii_mode {
                    machine.feed(ascii::encode_line(&line));
                } else {
                    machine.feed(parse_numbers(&line)?);
                }
            }
            Status::Running => continue,
        }
    }

    eprintln!("Halted after {} instructions.", machine.steps());
    Ok(())
}

fn print_output(out: &mut impl Write, words: &[Word], ascii_mode: bool) -> io::Result<()> {
    if ascii_mode {
        let decoded = ascii::decode(words);
        write!(out, "{}", decoded.text)?;
        for value in decoded.non_ascii {
            writeln!(out, "{}", value)?;
        }
    } else {
        for value in words {
            writeln!(out, "{}", value)?;
        }
    }
    Ok(())
}

fn parse_numbers(line: &str) -> Result<Vec<Word>, num_bigint::ParseBigIntError> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
