use clap::Parser;
use touchdown::cli::{
    run_cities, run_contacts, run_home, run_inbox, run_people, run_trips, Cli, Commands,
};
use touchdown::config::Config;
use touchdown::{logging, DataContext, Database};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.db)?;
    logging::init(&config);

    let db = Database::open_at(&config.db_path)?;
    let mut ctx = DataContext::new(db);
    ctx.initialize()?;

    match cli.command {
        None | Some(Commands::Home) => run_home(&ctx)?,
        Some(Commands::Inbox) => run_inbox(&ctx)?,
        Some(Commands::People(cmd)) => run_people(&mut ctx, cmd)?,
        Some(Commands::Cities(cmd)) => run_cities(&mut ctx, cmd)?,
        Some(Commands::Contacts(cmd)) => run_contacts(&mut ctx, cmd)?,
        Some(Commands::Trips(cmd)) => run_trips(&mut ctx, cmd)?,
    }

    ctx.close()?;
    Ok(())
}
