//! Shared output and lookup helpers for commands

use anyhow::{anyhow, bail, Result};
use uuid::Uuid;

use crate::context::DataContext;

// ============================================================================
// Message Functions
// ============================================================================

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// First 8 characters of an id, enough to type back in
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

// ============================================================================
// Lookup
// ============================================================================

/// Resolve a full UUID, an exact (case-insensitive) name, or a unique id prefix.
fn resolve<'a>(
    kind: &str,
    identifier: &str,
    items: impl Iterator<Item = (Uuid, Option<&'a str>)> + Clone,
) -> Result<Uuid> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        bail!("{} identifier cannot be empty.", kind);
    }
    if let Ok(id) = Uuid::parse_str(identifier) {
        return items
            .clone()
            .find(|(candidate, _)| *candidate == id)
            .map(|(id, _)| id)
            .ok_or_else(|| anyhow!("No {} found with ID: {}", kind, id));
    }

    let by_name: Vec<Uuid> = items
        .clone()
        .filter(|(_, name)| name.map_or(false, |n| n.eq_ignore_ascii_case(identifier)))
        .map(|(id, _)| id)
        .collect();
    match by_name.len() {
        1 => return Ok(by_name[0]),
        0 => {}
        n => bail!("{} {} entries are named '{}'. Use the id.", n, kind, identifier),
    }

    let prefix = identifier.to_lowercase();
    let by_prefix: Vec<Uuid> = items
        .filter(|(id, _)| id.to_string().starts_with(&prefix))
        .map(|(id, _)| id)
        .collect();
    match by_prefix.len() {
        1 => Ok(by_prefix[0]),
        0 => Err(anyhow!("No {} matches '{}'.", kind, identifier)),
        _ => Err(anyhow!("'{}' matches more than one {}.", identifier, kind)),
    }
}

pub fn resolve_person(ctx: &DataContext, identifier: &str) -> Result<Uuid> {
    resolve(
        "person",
        identifier,
        ctx.people().iter().map(|p| (p.id, p.name.as_deref())),
    )
}

pub fn resolve_city(ctx: &DataContext, identifier: &str) -> Result<Uuid> {
    resolve(
        "city",
        identifier,
        ctx.cities().iter().map(|c| (c.id, Some(c.name.as_str()))),
    )
}

pub fn resolve_contact_method(ctx: &DataContext, identifier: &str) -> Result<Uuid> {
    resolve(
        "contact method",
        identifier,
        ctx.contact_methods().iter().map(|m| (m.id, None)),
    )
}

pub fn resolve_trip(ctx: &DataContext, identifier: &str) -> Result<Uuid> {
    resolve("trip", identifier, ctx.trips().iter().map(|t| (t.id, None)))
}

/// City name for display, tolerating dangling references
pub fn city_label(ctx: &DataContext, id: Uuid) -> String {
    ctx.city(id)
        .map(|c| c.display_name())
        .unwrap_or_else(|| "Unknown City".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::NewPerson;

    fn ctx() -> DataContext {
        let mut ctx = DataContext::new(Database::open_memory().unwrap());
        ctx.initialize().unwrap();
        ctx
    }

    #[test]
    fn test_resolve_by_name_and_prefix() {
        let mut ctx = ctx();
        let id = ctx.add_person(NewPerson::named("Ada Lovelace")).unwrap();

        assert_eq!(resolve_person(&ctx, "ada lovelace").unwrap(), id);
        assert_eq!(resolve_person(&ctx, &short_id(id)).unwrap(), id);
        assert_eq!(resolve_person(&ctx, &id.to_string()).unwrap(), id);
        assert!(resolve_person(&ctx, "Grace").is_err());
        assert!(resolve_person(&ctx, " ").is_err());
    }

    #[test]
    fn test_resolve_unknown_uuid() {
        let mut ctx = ctx();
        ctx.add_city("Lagos".to_string(), None, None).unwrap();

        let unknown = Uuid::new_v4();
        assert!(resolve_city(&ctx, &unknown.to_string()).is_err());
        assert!(resolve_trip(&ctx, &unknown.to_string()).is_err());
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let mut ctx = ctx();
        ctx.add_person(NewPerson::named("Sam")).unwrap();
        ctx.add_person(NewPerson::named("sam")).unwrap();

        assert!(resolve_person(&ctx, "Sam").is_err());
    }

    #[test]
    fn test_city_label_for_missing_city() {
        let ctx = ctx();
        assert_eq!(city_label(&ctx, Uuid::new_v4()), "Unknown City");
    }
}
