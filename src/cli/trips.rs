use anyhow::{anyhow, Result};

use crate::cli::ui::{city_label, resolve_city, resolve_trip, short_id, status, warning};
use crate::cli::TripsCommand;
use crate::context::DataContext;
use crate::dates::{format_date, parse_date, DEFAULT_DATE_FORMAT};
use crate::models::TripSource;

pub fn run_trips(ctx: &mut DataContext, command: TripsCommand) -> Result<()> {
    match command {
        TripsCommand::List => list(ctx),
        TripsCommand::Add { city, start, end } => {
            let city_id = resolve_city(ctx, &city)?;
            let start = parse_date(&start)?;
            let end = parse_date(&end)?;
            if end < start {
                warning("Trip ends before it starts.");
            }
            let id = ctx.add_trip(city_id, start, end, TripSource::Manual)?;
            println!("Added {}.", short_id(id));
            Ok(())
        }
        TripsCommand::Update {
            id,
            city,
            start,
            end,
        } => {
            let id = resolve_trip(ctx, &id)?;
            let mut trip = ctx
                .trip(id)
                .cloned()
                .ok_or_else(|| anyhow!("No trip found with ID: {}", id))?;
            if let Some(city) = city.as_deref() {
                trip.city_id = resolve_city(ctx, city)?;
            }
            if let Some(start) = start.as_deref() {
                trip.start_date = parse_date(start)?;
            }
            if let Some(end) = end.as_deref() {
                trip.end_date = parse_date(end)?;
            }
            if trip.end_date < trip.start_date {
                warning("Trip ends before it starts.");
            }
            ctx.update_trip(&trip)?;
            status("Saved.");
            Ok(())
        }
        TripsCommand::Delete { id } => {
            let id = resolve_trip(ctx, &id)?;
            ctx.delete_trip(id)?;
            status("Deleted.");
            Ok(())
        }
    }
}

fn list(ctx: &DataContext) -> Result<()> {
    if ctx.trips().is_empty() {
        status("No trips yet.");
        return Ok(());
    }

    let mut trips: Vec<_> = ctx.trips().iter().collect();
    trips.sort_by_key(|t| t.start_date);
    let next = ctx.upcoming_trip().map(|t| t.id);

    for trip in trips {
        let marker = if Some(trip.id) == next { "*" } else { " " };
        println!(
            "{} {}  {} to {}  {}",
            marker,
            short_id(trip.id),
            format_date(&trip.start_date, DEFAULT_DATE_FORMAT),
            format_date(&trip.end_date, DEFAULT_DATE_FORMAT),
            city_label(ctx, trip.city_id)
        );
    }
    Ok(())
}
