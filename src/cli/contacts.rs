use anyhow::{anyhow, Result};

use crate::cli::ui::{resolve_contact_method, resolve_person, short_id, status, warning};
use crate::cli::ContactsCommand;
use crate::context::DataContext;
use crate::linking::open_deep_link;
use crate::models::Platform;

fn parse_platform(s: &str) -> Result<Platform> {
    Platform::parse(s).ok_or_else(|| {
        let known: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
        anyhow!("Unknown platform '{}'. Use one of: {}", s, known.join(", "))
    })
}

pub fn run_contacts(ctx: &mut DataContext, command: ContactsCommand) -> Result<()> {
    match command {
        ContactsCommand::Add {
            person,
            platform,
            value,
        } => {
            let person_id = resolve_person(ctx, &person)?;
            let platform = parse_platform(&platform)?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(anyhow!("Contact value cannot be empty."));
            }
            let id = ctx.add_contact_method(person_id, platform, value)?;
            println!("Added {}.", short_id(id));
        }
        ContactsCommand::Update {
            id,
            platform,
            value,
        } => {
            let id = resolve_contact_method(ctx, &id)?;
            let mut method = ctx
                .contact_method(id)
                .cloned()
                .ok_or_else(|| anyhow!("No contact method found with ID: {}", id))?;
            if let Some(platform) = platform.as_deref() {
                method.platform = parse_platform(platform)?;
            }
            if let Some(value) = value {
                method.value = value.trim().to_string();
            }
            ctx.update_contact_method(&method)?;
            status("Saved.");
        }
        ContactsCommand::Delete { id } => {
            let id = resolve_contact_method(ctx, &id)?;
            ctx.delete_contact_method(id)?;
            status("Deleted.");
        }
        ContactsCommand::Open { id } => {
            let id = resolve_contact_method(ctx, &id)?;
            let method = ctx
                .contact_method(id)
                .ok_or_else(|| anyhow!("No contact method found with ID: {}", id))?;
            if !open_deep_link(&method.deep_link) {
                warning(&format!("Could not open {}", method.deep_link));
            }
        }
    }
    Ok(())
}
