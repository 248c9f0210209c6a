use docopt::Docopt;
use log::info;
use serde::Deserialize;

use libcoda::{Coda, Encoding, Statement};

const USAGE: &str = "
CODA Statement Decoder

Usage:
  coda statements <file> [--encoding=<encoding>] [--compact]
  coda check <file> [--encoding=<encoding>]
  coda (-h | --help)
  coda --version

Options:
  -h --help                  Show this screen.
  --version                  Show version.
  --encoding=<encoding>      Character set of the file: windows-1252 or utf-8 [default: windows-1252].
  --compact                  Print JSON on a single line.
";

#[derive(Debug, Deserialize)]
struct Args {
    cmd_statements: bool,
    cmd_check: bool,
    arg_file: String,
    flag_encoding: String,
    flag_compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .map(|d| d.version(Some(env!("CARGO_PKG_VERSION").to_string())))
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let encoding: Encoding = args.flag_encoding.parse()?;
    let data = std::fs::read(&args.arg_file)?;
    let coda = Coda::from_bytes(&data, encoding)?;
    info!("{}: {} statements", args.arg_file, coda.len());

    if args.cmd_statements {
        show_statements(&coda, args.flag_compact)?;
    }

    if args.cmd_check {
        check(&args.arg_file, &coda);
    }

    Ok(())
}

fn show_statements(coda: &Coda, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = if compact {
        serde_json::to_string(coda)?
    } else {
        serde_json::to_string_pretty(coda)?
    };
    println!("{}", json);
    Ok(())
}

fn check(filename: &str, coda: &Coda) {
    println!("{}: OK", filename);
    for statement in &coda.statements {
        println!("  {}", summary(statement));
    }
}

fn summary(statement: &Statement) -> String {
    format!(
        "statement {} of {} ({} moves): {} -> {}",
        statement,
        statement.account().unwrap_or("unknown account"),
        statement.moves.len(),
        statement.opening_balance.unwrap_or_default(),
        statement.closing_balance.unwrap_or_default()
    )
}
