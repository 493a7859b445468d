use anyhow::Result;

use crate::cli::ui::{city_label, status};
use crate::context::DataContext;
use crate::dates::{format_date, DEFAULT_DATE_FORMAT};

/// Execute the home command: the next trip and who you know there
pub fn run_home(ctx: &DataContext) -> Result<()> {
    let Some(overview) = ctx.next_trip_overview() else {
        status("No upcoming trips.");
        status("Schedule a trip to plan your connections.");
        return Ok(());
    };

    let city = match overview.city {
        Some(city) => city.display_name(),
        None => city_label(ctx, overview.trip.city_id),
    };

    println!("Next trip: {}", city);
    println!(
        "{} to {}",
        format_date(&overview.trip.start_date, DEFAULT_DATE_FORMAT),
        format_date(&overview.trip.end_date, DEFAULT_DATE_FORMAT)
    );
    println!("{}", overview.people_label());

    if let Some(city) = overview.city {
        for person in ctx.people_by_city(city.id) {
            println!("  {}", person.display_name());
        }
    }

    Ok(())
}
