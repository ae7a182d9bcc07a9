use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let hex = match args.iter().position(|a| a == "--hex") {
        Some(index) => {
            args.remove(index);
            true
        }
        None => false,
    };

    let data = match args.first().map(|s| s.as_str()) {
        None | Some("-") => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
        Some(path) => fs::read(path)?,
    };

    let outcome = bertlv_ascii::parse_dump(&data, hex);
    print!("{}", bertlv_ascii::outcome_to_ascii(&outcome));
    if outcome.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
