use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use syxkit::split;

/// Split a file of several System Exclusive messages into one file per message.
#[derive(Parser, Debug)]
#[command(name = "syxsplit", version)]
struct Args {
    file: PathBuf,

    /// Report every message written
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}: {}", args.file.display(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> syxkit::Result<()> {
    let buffer = fs::read(&args.file)?;
    let messages = split(&buffer)?;
    if args.verbose {
        println!("Found {} messages", messages.len());
    }
    if messages.len() < 2 {
        return Ok(());
    }

    let stem = args
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "message".to_string());
    let extension = args
        .file
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "syx".to_string());

    for (i, message) in messages.iter().enumerate() {
        let output = args.file.with_file_name(format!("{}-{:0>3}.{}", stem, i + 1, extension));
        if args.verbose {
            println!(
                "Writing {} ({})",
                output.display(),
                message.type_name().unwrap_or("unknown type")
            );
        }
        fs::write(&output, message.as_bytes())?;
    }
    Ok(())
}
