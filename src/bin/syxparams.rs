use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use syxkit::load;

/// Print the parameters of a voice message as JSON.
#[derive(Parser, Debug)]
#[command(name = "syxparams", version)]
struct Args {
    file: PathBuf,

    /// List values outside their legal range, with suggested corrections
    #[arg(long)]
    validate: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}: {}", args.file.display(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let message = load(&args.file)?;
    let json = message.to_json()?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if args.validate {
        let failures = message.validation_failures()?;
        if failures.is_empty() {
            eprintln!("All values are valid");
        }
        for failure in failures {
            eprintln!("{}", failure);
        }
    }
    Ok(())
}
