use std::path::PathBuf;
use std::process;

use clap::Parser;
use syxkit::{load, Message};

/// Identify the System Exclusive message(s) in a file.
#[derive(Parser, Debug)]
#[command(name = "syxidentify", version)]
struct Args {
    /// File containing one or more messages
    file: PathBuf,
}

fn main() {
    let args = Args::parse();
    let message = match load(&args.file) {
        Ok(message) => message,
        Err(e) => {
            eprintln!("{}: {}", args.file.display(), e);
            process::exit(1);
        }
    };

    // A recognised multi-part type is reported as one message.
    if message.is_composite() && message.format().is_none() {
        let count = message.parts().len();
        for (number, part) in message.parts().iter().enumerate() {
            println!("Message {} of {}", number + 1, count);
            identify(part);
            println!();
        }
    } else {
        identify(&message);
    }
}

fn identify(message: &Message) {
    match message.manufacturer() {
        Some(manufacturer) => println!("Manufacturer: {}", manufacturer),
        None => println!("Universal"),
    }
    if let Some(device) = message.device() {
        println!("Device: {}", device);
    }
    if let Some(type_name) = message.type_name() {
        println!("Type: {}", type_name);
    }
    if let Some(name) = message.name() {
        println!("Name: {}", name);
    }
    println!("Length: {} bytes", message.len());
    match message.verify_checksum() {
        Some(true) => println!("Checksum: OK"),
        Some(false) => println!("Checksum: MISMATCH"),
        None => {}
    }
    if let Ok(Some(names)) = message.item_names() {
        for (index, name) in names.iter().enumerate() {
            println!("{:>3}: {}", index + 1, name);
        }
    }
    println!("MD5 digest: {:x}", message.digest());
}
