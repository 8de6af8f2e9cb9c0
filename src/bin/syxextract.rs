use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use syxkit::{load, SysexError};

/// Write every voice of a bank as a standalone message file.
#[derive(Parser, Debug)]
#[command(name = "syxextract", version)]
struct Args {
    file: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}: {}", args.file.display(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> syxkit::Result<()> {
    let bank = load(&args.file)?;
    if !bank.is_container() {
        return Err(SysexError::NotContainer);
    }
    fs::create_dir_all(&args.output)?;

    for index in 0..bank.item_count() {
        let item = bank.extract_item(index)?;
        let name = item.name().unwrap_or_default();
        let output = args.output.join(file_name(index, &name));
        println!("Writing {}", output.display());
        fs::write(&output, item.as_bytes())?;
    }
    Ok(())
}

/// `NN-NAME.syx`, or `NN.syx` for a blank name. Anything but letters,
/// digits, spaces and dashes becomes an underscore.
fn file_name(index: usize, name: &str) -> String {
    let safe: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == ' ' || c == '-' { c } else { '_' })
        .collect();
    if safe.is_empty() {
        format!("{:02}.syx", index + 1)
    } else {
        format!("{:02}-{}.syx", index + 1, safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(file_name(0, "E.PIANO 1 "), "01-E_PIANO 1.syx");
        assert_eq!(file_name(9, "A/B"), "10-A_B.syx");
        assert_eq!(file_name(31, "   "), "32.syx");
        assert_eq!(file_name(2, ""), "03.syx");
    }
}
