use clap::Parser;
use std::error::Error;
use subnet_tree::build_forest;
use subnet_tree::config::{init_logging, Args};
use subnet_tree::output::print_forest;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_config)?;
    log::info!("#Start main()");

    if args.no_color {
        colored::control::set_override(false);
    }

    let entries = args.entries()?;
    let forest = build_forest(&entries)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&forest)?);
    } else {
        print_forest(&forest, args.listing, args.dump);
    }

    Ok(())
}
