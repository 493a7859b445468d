use anyhow::{anyhow, Result};

use crate::cli::ui::{resolve_city, short_id, status, warning};
use crate::cli::CitiesCommand;
use crate::context::DataContext;

pub fn run_cities(ctx: &mut DataContext, command: CitiesCommand) -> Result<()> {
    match command {
        CitiesCommand::List => list(ctx),
        CitiesCommand::Add {
            name,
            state,
            country,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(anyhow!("City name cannot be empty."));
            }
            let id = ctx.add_city(name, state, country)?;
            println!("Added {}.", short_id(id));
            Ok(())
        }
        CitiesCommand::Show { identifier } => show(ctx, &identifier),
        CitiesCommand::Update {
            identifier,
            name,
            state,
            country,
        } => {
            let id = resolve_city(ctx, &identifier)?;
            let mut city = ctx
                .city(id)
                .cloned()
                .ok_or_else(|| anyhow!("No city found with ID: {}", identifier))?;
            if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
                city.name = name;
            }
            if let Some(state) = state {
                city.state = Some(state).filter(|s| !s.is_empty());
            }
            if let Some(country) = country {
                city.country = Some(country).filter(|c| !c.is_empty());
            }
            ctx.update_city(&city)?;
            status("Saved.");
            Ok(())
        }
        CitiesCommand::Delete { identifier } => {
            let id = resolve_city(ctx, &identifier)?;
            let affected = ctx.people_by_city(id).len();
            ctx.delete_city(id)?;
            status("Deleted.");
            if affected > 0 {
                warning(&format!(
                    "{} people no longer reference this city. See `touchdown inbox`.",
                    affected
                ));
            }
            Ok(())
        }
    }
}

fn list(ctx: &DataContext) -> Result<()> {
    if ctx.cities().is_empty() {
        status("No cities yet.");
        return Ok(());
    }

    for city in ctx.cities() {
        println!(
            "{}  {:<40} {}",
            short_id(city.id),
            city.display_name(),
            ctx.people_by_city(city.id).len()
        );
    }
    Ok(())
}

fn show(ctx: &DataContext, identifier: &str) -> Result<()> {
    let id = resolve_city(ctx, identifier)?;
    let city = ctx
        .city(id)
        .ok_or_else(|| anyhow!("No city found with ID: {}", identifier))?;

    println!("{}", city.display_name());
    let people = ctx.people_by_city_by_tier(id);
    if people.is_empty() {
        status("  No people in this city.");
    }
    for person in people {
        let how = if person.primary_city_id == Some(id) {
            "lives here"
        } else {
            "visits"
        };
        println!(
            "  {}  {:<30} {:<8} {}",
            short_id(person.id),
            person.display_name(),
            person.tier.as_str(),
            how
        );
        for method in ctx.contact_methods_for_person(person.id) {
            println!("      {:<10} {}", method.platform.as_str(), method.value);
        }
    }
    Ok(())
}
