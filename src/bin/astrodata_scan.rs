use std::error::Error;

use astrodata::cli::{ListingLoader, PathList, ScanArgs};
use sarge::prelude::*;

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  astrodata_scan [--path <roots>] [--pattern <regex>] [--accumulate]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --path <roots>     Directories, archives or search paths (repeatable)");
    eprintln!("                         Defaults to the ASTRODATA_PATH environment variable");
    eprintln!("  -n, --pattern <regex>  Names to list, matched against whole bare names");
    eprintln!("  -a, --accumulate       Report every failing root instead of the first one");
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut reader = ArgumentReader::new();

    let path_ref = reader.add::<PathList>(tag::both('p', "path"));
    let pattern_ref = reader.add::<String>(tag::both('n', "pattern"));
    let accumulate_ref = reader.add::<bool>(tag::both('a', "accumulate"));

    let args = reader.parse()?;

    let mut scan = ScanArgs::new();
    if let Some(Ok(paths)) = path_ref.get(&args) {
        scan.paths = paths;
    }
    if let Some(Ok(pattern)) = pattern_ref.get(&args) {
        scan = scan.with_pattern(pattern);
    }
    if let Some(Ok(true)) = accumulate_ref.get(&args) {
        scan = scan.with_accumulate();
    }

    let mut manager = scan.to_builder().build()?;
    if manager.providers().is_empty() {
        return Err("no data roots given and ASTRODATA_PATH is not set".into());
    }

    let mut listing = ListingLoader::new();
    let found = manager.feed(scan.pattern(), &mut listing)?;
    for (name, size) in listing.entries() {
        println!("{name}\t{size}");
    }
    if !found {
        eprintln!("no resource matches '{}'", scan.pattern());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("astrodata_scan error: {e}");
        print_usage();
        std::process::exit(1);
    }
}
