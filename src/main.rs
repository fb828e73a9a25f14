mod aggregate;
mod config;
mod logging;
mod models;
mod run;
mod store;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    logging::init(&config.log_path);

    let store = store::Store::new(&config.table_path, config.recovery);
    store.initialize()?;

    match args.len() {
        1 => run::as_tui(&store, &config),
        2.. => run::as_cli(&args, &store, &config),
        _ => {
            eprintln!("Usage: tally [command]");
            Ok(())
        }
    }
}
