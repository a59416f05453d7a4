use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use bikeshare::{CityCatalog, Session};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Explore US bikeshare trip data")]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[clap(short, long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    // Diagnostics go to stderr; keep them quiet unless asked for.
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    let args = Args::parse();

    let catalog = CityCatalog::standard(args.data_dir);
    let stdin = io::stdin();
    let mut session = Session::new(catalog, stdin.lock(), io::stdout());
    let outcome = session.run()?;
    info!("exiting: {outcome:?}");

    Ok(())
}
