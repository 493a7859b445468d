use anyhow::{anyhow, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::cli::ui::{city_label, resolve_city, resolve_person, short_id, status};
use crate::cli::{PeopleCommand, PersonArgs};
use crate::context::DataContext;
use crate::dates::{format_date, DEFAULT_DATE_FORMAT};
use crate::models::{NewPerson, Tier};

pub fn run_people(ctx: &mut DataContext, command: PeopleCommand) -> Result<()> {
    match command {
        PeopleCommand::List { query } => list(ctx, query.as_deref().unwrap_or_default()),
        PeopleCommand::Add(args) => add(ctx, args),
        PeopleCommand::Show { identifier } => show(ctx, &identifier),
        PeopleCommand::Update {
            identifier,
            fields,
            clear_city,
            contacted,
        } => update(ctx, &identifier, fields, clear_city, contacted),
        PeopleCommand::Delete { identifier } => delete(ctx, &identifier),
    }
}

fn list(ctx: &DataContext, query: &str) -> Result<()> {
    if ctx.people().is_empty() {
        status("No people yet.");
        return Ok(());
    }

    let people = ctx.search_people(query);
    if people.is_empty() {
        status(&format!("No people match '{}'.", query));
        return Ok(());
    }

    for person in people {
        let city = person
            .primary_city_id
            .map(|id| city_label(ctx, id))
            .unwrap_or_default();
        println!(
            "{}  {:<30} {:<8} {}",
            short_id(person.id),
            person.display_name(),
            person.tier.as_str(),
            city
        );
    }
    Ok(())
}

fn resolve_cities(ctx: &DataContext, names: &[String]) -> Result<Vec<Uuid>> {
    let mut ids = Vec::new();
    for name in names {
        let id = resolve_city(ctx, name)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Primary city from `--new-city` (created here) or `--city` (looked up)
fn primary_city(ctx: &mut DataContext, args: &PersonArgs) -> Result<Option<Uuid>> {
    if let Some(name) = args.new_city.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("City name cannot be empty."));
        }
        let id = ctx.add_city(name.to_string(), None, None)?;
        println!("Added city {}.", short_id(id));
        return Ok(Some(id));
    }
    args.city
        .as_deref()
        .map(|c| resolve_city(ctx, c))
        .transpose()
}

fn add(ctx: &mut DataContext, args: PersonArgs) -> Result<()> {
    let additional = resolve_cities(ctx, &args.also_city)?;
    let primary_city_id = primary_city(ctx, &args)?;

    let id = ctx.add_person(NewPerson {
        name: args.name,
        primary_city_id,
        additional_city_ids: (!additional.is_empty()).then_some(additional),
        tier: args.tier.as_deref().map(Tier::parse),
        notes: args.notes,
        last_contacted_at: None,
    })?;

    println!("Added {}.", short_id(id));
    Ok(())
}

fn show(ctx: &DataContext, identifier: &str) -> Result<()> {
    let id = resolve_person(ctx, identifier)?;
    let person = ctx
        .person(id)
        .ok_or_else(|| anyhow!("No person found with ID: {}", identifier))?;

    println!("{}", person.display_name());
    println!("  id:        {}", person.id);
    println!("  tier:      {}", person.tier.as_str());
    if let Some(city) = person.primary_city_id {
        println!("  city:      {}", city_label(ctx, city));
    }
    for city in &person.additional_city_ids {
        println!("  also in:   {}", city_label(ctx, *city));
    }
    if let Some(at) = person.last_contacted_at {
        println!("  contacted: {}", format_date(&at, DEFAULT_DATE_FORMAT));
    }
    println!("  added:     {}", format_date(&person.created_at, DEFAULT_DATE_FORMAT));
    if let Some(notes) = person.notes.as_deref() {
        println!("  notes:     {}", notes);
    }

    let missing = person.missing_info();
    if missing.any() {
        println!("  ({})", missing.label());
    }

    let methods = ctx.contact_methods_for_person(id);
    if !methods.is_empty() {
        println!();
        for method in methods {
            println!(
                "  {}  {:<10} {:<24} {}",
                short_id(method.id),
                method.platform.as_str(),
                method.value,
                method.deep_link
            );
        }
    }
    Ok(())
}

fn update(
    ctx: &mut DataContext,
    identifier: &str,
    fields: PersonArgs,
    clear_city: bool,
    contacted: bool,
) -> Result<()> {
    let id = resolve_person(ctx, identifier)?;
    let mut person = ctx
        .person(id)
        .cloned()
        .ok_or_else(|| anyhow!("No person found with ID: {}", identifier))?;

    let additional = resolve_cities(ctx, &fields.also_city)?;
    if let Some(name) = fields.name.as_deref() {
        person.name = Some(name.to_string()).filter(|n| !n.trim().is_empty());
    }
    if clear_city {
        person.primary_city_id = None;
    } else if let Some(city) = primary_city(ctx, &fields)? {
        person.primary_city_id = Some(city);
    }
    if !additional.is_empty() {
        person.additional_city_ids = additional;
    }
    if let Some(tier) = fields.tier.as_deref() {
        person.tier = Tier::parse(tier);
    }
    if let Some(notes) = fields.notes {
        person.notes = Some(notes).filter(|n| !n.is_empty());
    }
    if contacted {
        person.last_contacted_at = Some(Utc::now());
    }

    ctx.update_person(&person)?;
    status("Saved.");
    Ok(())
}

fn delete(ctx: &mut DataContext, identifier: &str) -> Result<()> {
    let id = resolve_person(ctx, identifier)?;
    let name = ctx
        .person(id)
        .map(|p| p.display_name().to_string())
        .ok_or_else(|| anyhow!("No person found with ID: {}", identifier))?;
    let methods = ctx.contact_methods_for_person(id).len();

    ctx.delete_person(id)?;
    println!("Deleted {} and {} contact method(s).", name, methods);
    Ok(())
}
