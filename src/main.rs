use std::env;
use std::fs::File;
use std::io::{self, Read};
use std::process;

use suppress_filter::{partition_streams, write_entries};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    // Find --clean and --suppressed flags and extract their values
    let mut clean_file: Option<&str> = None;
    let mut suppressed_file: Option<&str> = None;
    let mut i = 1; // Start after program name
    while i < args.len() {
        if args[i] == "--clean" {
            if i + 1 < args.len() {
                clean_file = Some(&args[i + 1]);
                i += 2;
            } else {
                eprintln!("Error: --clean requires a file path");
                process::exit(1);
            }
        } else if args[i] == "--suppressed" {
            if i + 1 < args.len() {
                suppressed_file = Some(&args[i + 1]);
                i += 2;
            } else {
                eprintln!("Error: --suppressed requires a file path");
                process::exit(1);
            }
        } else {
            i += 1;
        }
    }

    // Get positional arguments (excluding program name and flags)
    let positional_args: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| {
            *arg != "--clean"
                && *arg != "--suppressed"
                && !clean_file.map_or(false, |f| *arg == f)
                && !suppressed_file.map_or(false, |f| *arg == f)
        })
        .collect();

    if positional_args.len() != 2 {
        eprintln!("Usage: suppress-filter [OPTIONS] <emails-file> <suppression-file>");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  <emails-file>       Target list (.csv with an 'email' column, or plain");
        eprintln!("                      text with one entry per line; - for stdin)");
        eprintln!("  <suppression-file>  Suppression list, same formats; entries may be raw");
        eprintln!("                      emails or pre-computed 32-hex MD5 fingerprints");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --clean <file>       Output for unsuppressed entries (default clean_emails.txt)");
        eprintln!("  --suppressed <file>  Output for suppressed entries (default suppressed_emails.txt)");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  suppress-filter emails.csv suppression.txt");
        eprintln!("  suppress-filter --clean keep.txt --suppressed drop.txt emails.txt hashes.txt");
        eprintln!("  cat emails.txt | suppress-filter - suppression.csv");
        process::exit(1);
    }

    let emails_file = positional_args[0].as_str();
    let suppression_file = positional_args[1].as_str();
    let clean_path = clean_file.unwrap_or("clean_emails.txt");
    let suppressed_path = suppressed_file.unwrap_or("suppressed_emails.txt");

    // Open target input; stdin is always treated as line-oriented
    let targets: Box<dyn Read> = if emails_file == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(emails_file)?)
    };
    let suppression = File::open(suppression_file)?;

    let result = match partition_streams(targets, emails_file, suppression, suppression_file) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut clean_out = File::create(clean_path)?;
    write_entries(&result.clean, &mut clean_out)?;
    let mut suppressed_out = File::create(suppressed_path)?;
    write_entries(&result.suppressed, &mut suppressed_out)?;

    eprintln!("Clean: {}, Suppressed: {}", result.clean_count(), result.suppressed_count());
    eprintln!("Written to {} and {}", clean_path, suppressed_path);

    Ok(())
}
