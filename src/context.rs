//! In-memory view over the store.
//!
//! `DataContext` owns the `Database` and a copy of every row. Reads are
//! answered from memory. Every mutation is written to the store first and
//! applied to memory only once the store has accepted it, so a failed write
//! leaves the cached collections exactly as they were.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dates;
use crate::db::{Database, StoreError};
use crate::models::{City, ContactMethod, MissingInfo, NewPerson, Person, Platform, Trip, TripSource};

#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("data is still loading")]
    NotReady,
}

pub type DataResult<T> = std::result::Result<T, DataError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Loading,
    Ready,
}

/// The next trip with what the home view shows about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripOverview<'a> {
    pub trip: &'a Trip,
    /// None if the city was deleted after the trip was planned
    pub city: Option<&'a City>,
    pub people_count: usize,
}

impl TripOverview<'_> {
    pub fn people_label(&self) -> String {
        if self.people_count == 1 {
            "1 known person".to_string()
        } else {
            format!("{} known people", self.people_count)
        }
    }
}

pub struct DataContext {
    db: Database,
    state: ContextState,
    people: Vec<Person>,
    cities: Vec<City>,
    contact_methods: Vec<ContactMethod>,
    trips: Vec<Trip>,
}

impl DataContext {
    /// Wrap an open database. Nothing is loaded until `initialize`.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            state: ContextState::Loading,
            people: Vec::new(),
            cities: Vec::new(),
            contact_methods: Vec::new(),
            trips: Vec::new(),
        }
    }

    /// Create tables and load every collection. Runs once; later calls do nothing.
    pub fn initialize(&mut self) -> DataResult<()> {
        if self.state == ContextState::Ready {
            return Ok(());
        }

        self.db.initialize()?;

        let people = self.db.list_people()?;
        let cities = self.db.list_cities()?;
        let trips = self.db.list_trips()?;
        // One query for all contact methods instead of one per person
        let contact_methods = self.db.list_contact_methods()?;

        info!(
            people = people.len(),
            cities = cities.len(),
            contact_methods = contact_methods.len(),
            trips = trips.len(),
            "Loaded data"
        );

        self.people = people;
        self.cities = cities;
        self.contact_methods = contact_methods;
        self.trips = trips;
        self.state = ContextState::Ready;
        Ok(())
    }

    pub fn close(self) -> DataResult<()> {
        self.db.close()?;
        Ok(())
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ContextState::Loading
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn ensure_ready(&self) -> DataResult<()> {
        match self.state {
            ContextState::Ready => Ok(()),
            ContextState::Loading => Err(DataError::NotReady),
        }
    }

    // ==================== COLLECTIONS ====================

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn contact_methods(&self) -> &[ContactMethod] {
        &self.contact_methods
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn person(&self, id: Uuid) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn city(&self, id: Uuid) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    pub fn contact_method(&self, id: Uuid) -> Option<&ContactMethod> {
        self.contact_methods.iter().find(|m| m.id == id)
    }

    pub fn trip(&self, id: Uuid) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    // ==================== DERIVED QUERIES ====================

    /// People living in or visiting the city, each at most once
    pub fn people_by_city(&self, city_id: Uuid) -> Vec<&Person> {
        self.people.iter().filter(|p| p.is_in_city(city_id)).collect()
    }

    /// `people_by_city` ordered Green, Yellow, Archive. Ties keep load order.
    pub fn people_by_city_by_tier(&self, city_id: Uuid) -> Vec<&Person> {
        let mut people = self.people_by_city(city_id);
        people.sort_by_key(|p| p.tier.rank());
        people
    }

    /// People whose name contains `query`, ignoring case
    pub fn search_people(&self, query: &str) -> Vec<&Person> {
        self.people.iter().filter(|p| p.name_matches(query)).collect()
    }

    pub fn contact_methods_for_person(&self, person_id: Uuid) -> Vec<&ContactMethod> {
        self.contact_methods
            .iter()
            .filter(|m| m.person_id == person_id)
            .collect()
    }

    /// The inbox: people without a name or a primary city, with the reason
    pub fn needs_attention(&self) -> Vec<(&Person, MissingInfo)> {
        self.people
            .iter()
            .map(|p| (p, p.missing_info()))
            .filter(|(_, missing)| missing.any())
            .collect()
    }

    pub fn upcoming_trip(&self) -> Option<&Trip> {
        self.upcoming_trip_at(Utc::now())
    }

    pub fn upcoming_trip_at(&self, now: DateTime<Utc>) -> Option<&Trip> {
        dates::upcoming_trip(&self.trips, now)
    }

    pub fn next_trip_overview(&self) -> Option<TripOverview<'_>> {
        self.next_trip_overview_at(Utc::now())
    }

    pub fn next_trip_overview_at(&self, now: DateTime<Utc>) -> Option<TripOverview<'_>> {
        let trip = self.upcoming_trip_at(now)?;
        let city = self.city(trip.city_id);
        let people_count = city.map_or(0, |c| self.people_by_city(c.id).len());
        Some(TripOverview {
            trip,
            city,
            people_count,
        })
    }

    // ==================== PEOPLE ====================

    /// Create a person from sparse fields. Returns the new id.
    pub fn add_person(&mut self, new: NewPerson) -> DataResult<Uuid> {
        self.ensure_ready()?;
        let person = new.build();
        self.db.insert_person(&person)?;

        let id = person.id;
        self.people.push(person);
        Ok(id)
    }

    /// Replace a person wholesale. The original `created_at` is kept.
    pub fn update_person(&mut self, person: &Person) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.update_person(person)?;

        if let Some(existing) = self.people.iter_mut().find(|p| p.id == person.id) {
            let created_at = existing.created_at;
            *existing = person.clone();
            existing.created_at = created_at;
        }
        Ok(())
    }

    /// Delete a person along with their contact methods.
    pub fn delete_person(&mut self, id: Uuid) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.delete_person_cascade(id)?;

        self.people.retain(|p| p.id != id);
        self.contact_methods.retain(|m| m.person_id != id);
        debug!(%id, "Removed person from cache");
        Ok(())
    }

    // ==================== CITIES ====================

    pub fn add_city(
        &mut self,
        name: String,
        state: Option<String>,
        country: Option<String>,
    ) -> DataResult<Uuid> {
        self.ensure_ready()?;
        let city = City {
            state,
            country,
            ..City::new(name)
        };
        self.db.insert_city(&city)?;

        let id = city.id;
        self.cities.push(city);
        Ok(id)
    }

    pub fn update_city(&mut self, city: &City) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.update_city(city)?;

        if let Some(existing) = self.cities.iter_mut().find(|c| c.id == city.id) {
            *existing = city.clone();
        }
        Ok(())
    }

    /// Delete a city and clear it from everyone who referenced it.
    ///
    /// People are never deleted. The cleared references are persisted in the
    /// same transaction as the delete.
    pub fn delete_city(&mut self, id: Uuid) -> DataResult<()> {
        self.ensure_ready()?;

        let affected: Vec<Person> = self
            .people
            .iter()
            .filter(|p| p.is_in_city(id))
            .cloned()
            .map(|mut p| {
                p.clear_city(id);
                p
            })
            .collect();

        self.db.delete_city_cascade(id, &affected)?;

        self.cities.retain(|c| c.id != id);
        for updated in affected.iter() {
            if let Some(existing) = self.people.iter_mut().find(|p| p.id == updated.id) {
                *existing = updated.clone();
            }
        }
        if !affected.is_empty() {
            info!(%id, people = affected.len(), "Cleared deleted city from people");
        }
        Ok(())
    }

    // ==================== CONTACT METHODS ====================

    /// Add a contact method for an existing person. The deep link is derived.
    pub fn add_contact_method(
        &mut self,
        person_id: Uuid,
        platform: Platform,
        value: String,
    ) -> DataResult<Uuid> {
        self.ensure_ready()?;
        if self.person(person_id).is_none() {
            return Err(StoreError::not_found("person", person_id).into());
        }

        let method = ContactMethod::new(person_id, platform, value);
        self.db.insert_contact_method(&method)?;

        let id = method.id;
        self.contact_methods.push(method);
        Ok(id)
    }

    /// Replace platform and value. Any deep link on `method` is ignored and
    /// recomputed.
    pub fn update_contact_method(&mut self, method: &ContactMethod) -> DataResult<()> {
        self.ensure_ready()?;

        let mut method = method.clone();
        if let Some(existing) = self.contact_method(method.id) {
            method.person_id = existing.person_id;
        }
        method.refresh_deep_link();

        self.db.update_contact_method(&method)?;

        if let Some(existing) = self.contact_methods.iter_mut().find(|m| m.id == method.id) {
            *existing = method;
        }
        Ok(())
    }

    pub fn delete_contact_method(&mut self, id: Uuid) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.delete_contact_method(id)?;

        self.contact_methods.retain(|m| m.id != id);
        Ok(())
    }

    // ==================== TRIPS ====================

    pub fn add_trip(
        &mut self,
        city_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        source: TripSource,
    ) -> DataResult<Uuid> {
        self.ensure_ready()?;
        let trip = Trip {
            source,
            ..Trip::new(city_id, start_date, end_date)
        };
        self.db.insert_trip(&trip)?;

        let id = trip.id;
        self.trips.push(trip);
        Ok(id)
    }

    pub fn update_trip(&mut self, trip: &Trip) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.update_trip(trip)?;

        if let Some(existing) = self.trips.iter_mut().find(|t| t.id == trip.id) {
            *existing = trip.clone();
        }
        Ok(())
    }

    pub fn delete_trip(&mut self, id: Uuid) -> DataResult<()> {
        self.ensure_ready()?;
        self.db.delete_trip(id)?;

        self.trips.retain(|t| t.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tier;
    use chrono::Duration;

    fn ready() -> DataContext {
        let mut ctx = DataContext::new(Database::open_memory().unwrap());
        ctx.initialize().unwrap();
        ctx
    }

    /// Snapshot of every cached collection for before/after comparison
    fn snapshot(
        ctx: &DataContext,
    ) -> (Vec<Person>, Vec<City>, Vec<ContactMethod>, Vec<Trip>) {
        (
            ctx.people().to_vec(),
            ctx.cities().to_vec(),
            ctx.contact_methods().to_vec(),
            ctx.trips().to_vec(),
        )
    }

    #[test]
    fn test_state_transition() {
        let mut ctx = DataContext::new(Database::open_memory().unwrap());
        assert!(ctx.is_loading());
        assert!(matches!(
            ctx.add_person(NewPerson::default()),
            Err(DataError::NotReady)
        ));

        ctx.initialize().unwrap();
        assert_eq!(ctx.state(), ContextState::Ready);

        // Second call is a no-op
        ctx.initialize().unwrap();
        assert_eq!(ctx.state(), ContextState::Ready);
    }

    #[test]
    fn test_initialize_loads_existing_rows() {
        let db = Database::open_memory().unwrap();
        db.initialize().unwrap();
        let city = City::new("Lisbon".to_string());
        db.insert_city(&city).unwrap();
        let person = NewPerson::named("Rui").in_city(city.id).build();
        db.insert_person(&person).unwrap();
        let method = ContactMethod::new(person.id, Platform::Whatsapp, "+351 900".to_string());
        db.insert_contact_method(&method).unwrap();

        let mut ctx = DataContext::new(db);
        assert!(ctx.people().is_empty());
        ctx.initialize().unwrap();

        assert_eq!(ctx.people(), &[person.clone()]);
        assert_eq!(ctx.cities(), &[city]);
        assert_eq!(ctx.contact_methods_for_person(person.id), vec![&method]);
    }

    #[test]
    fn test_add_person_defaults() {
        let mut ctx = ready();
        let id = ctx.add_person(NewPerson::default()).unwrap();

        let person = ctx.person(id).unwrap();
        assert_eq!(person.tier, Tier::Green);
        assert!(person.name.is_none());
        assert!(person.additional_city_ids.is_empty());
        assert_eq!(ctx.database().get_person(id).unwrap().as_ref(), Some(person));
    }

    #[test]
    fn test_update_person_keeps_created_at() {
        let mut ctx = ready();
        let id = ctx.add_person(NewPerson::named("Ada")).unwrap();
        let original = ctx.person(id).unwrap().clone();

        let mut changed = original.clone();
        changed.name = Some("Ada L.".to_string());
        changed.created_at = original.created_at - Duration::days(30);
        ctx.update_person(&changed).unwrap();

        let cached = ctx.person(id).unwrap();
        assert_eq!(cached.name.as_deref(), Some("Ada L."));
        assert_eq!(cached.created_at, original.created_at);
    }

    #[test]
    fn test_update_missing_person_leaves_cache() {
        let mut ctx = ready();
        ctx.add_person(NewPerson::named("Ada")).unwrap();
        let before = snapshot(&ctx);

        let ghost = NewPerson::named("Ghost").build();
        let err = ctx.update_person(&ghost).unwrap_err();

        assert!(matches!(err, DataError::Store(StoreError::NotFound { .. })));
        assert_eq!(snapshot(&ctx), before);
    }

    #[test]
    fn test_delete_person_cascades_to_contact_methods() {
        let mut ctx = ready();
        let ada = ctx.add_person(NewPerson::named("Ada")).unwrap();
        let bo = ctx.add_person(NewPerson::named("Bo")).unwrap();
        ctx.add_contact_method(ada, Platform::Phone, "555-1234".to_string())
            .unwrap();
        ctx.add_contact_method(ada, Platform::Instagram, "ada".to_string())
            .unwrap();
        ctx.add_contact_method(bo, Platform::Sms, "555-9999".to_string())
            .unwrap();

        ctx.delete_person(ada).unwrap();

        assert!(ctx.person(ada).is_none());
        assert!(ctx.contact_methods_for_person(ada).is_empty());
        assert_eq!(ctx.contact_methods_for_person(bo).len(), 1);
        assert!(ctx.database().get_contact_methods_for_person(ada).unwrap().is_empty());
        assert!(ctx.database().get_person(ada).unwrap().is_none());
    }

    #[test]
    fn test_delete_city_clears_references() {
        let mut ctx = ready();
        let c = ctx.add_city("Berlin".to_string(), None, Some("DE".to_string())).unwrap();
        let other = ctx.add_city("Hamburg".to_string(), None, None).unwrap();
        let p = ctx
            .add_person(NewPerson {
                name: Some("Lena".to_string()),
                primary_city_id: Some(c),
                additional_city_ids: Some(vec![c, other]),
                ..NewPerson::default()
            })
            .unwrap();
        let untouched = ctx.add_person(NewPerson::named("Max").in_city(other)).unwrap();

        ctx.delete_city(c).unwrap();

        assert!(ctx.city(c).is_none());
        assert!(ctx.people_by_city(c).is_empty());
        let person = ctx.person(p).unwrap();
        assert_eq!(person.primary_city_id, None);
        assert_eq!(person.additional_city_ids, vec![other]);
        assert_eq!(ctx.person(untouched).unwrap().primary_city_id, Some(other));

        // Persisted too
        let stored = ctx.database().get_person(p).unwrap().unwrap();
        assert_eq!(stored, *person);

        // Now in the inbox for a missing city
        let inbox = ctx.needs_attention();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].0.id, p);
        assert_eq!(inbox[0].1.label(), "missing city");
    }

    #[test]
    fn test_people_by_city() {
        let mut ctx = ready();
        let c = ctx.add_city("Austin".to_string(), Some("TX".to_string()), None).unwrap();
        let primary = ctx.add_person(NewPerson::named("A").in_city(c)).unwrap();
        let visiting = ctx
            .add_person(NewPerson {
                additional_city_ids: Some(vec![c, c]),
                ..NewPerson::named("B")
            })
            .unwrap();
        ctx.add_person(NewPerson::named("C")).unwrap();

        let ids: Vec<Uuid> = ctx.people_by_city(c).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![primary, visiting]);
    }

    #[test]
    fn test_people_by_city_by_tier() {
        let mut ctx = ready();
        let c = ctx.add_city("Seoul".to_string(), None, None).unwrap();
        let add = |ctx: &mut DataContext, name: &str, tier: Tier| {
            ctx.add_person(NewPerson {
                tier: Some(tier),
                ..NewPerson::named(name).in_city(c)
            })
            .unwrap()
        };
        let archived = add(&mut ctx, "A", Tier::Archive);
        let yellow = add(&mut ctx, "B", Tier::Yellow);
        let green = add(&mut ctx, "C", Tier::Green);
        let green_too = add(&mut ctx, "D", Tier::Green);

        let ids: Vec<Uuid> = ctx.people_by_city_by_tier(c).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![green, green_too, yellow, archived]);
    }

    #[test]
    fn test_search_people() {
        let mut ctx = ready();
        let ada = ctx.add_person(NewPerson::named("Ada Lovelace")).unwrap();
        let grace = ctx.add_person(NewPerson::named("Grace Hopper")).unwrap();
        let nameless = ctx.add_person(NewPerson::default()).unwrap();

        let ids = |q: &str| -> Vec<Uuid> { ctx.search_people(q).iter().map(|p| p.id).collect() };
        assert_eq!(ids("LOVE"), vec![ada]);
        assert_eq!(ids("r"), vec![grace]);
        assert_eq!(ids(""), vec![ada, grace, nameless]);
        assert!(ids("turing").is_empty());
    }

    #[test]
    fn test_needs_attention() {
        let mut ctx = ready();
        let c = ctx.add_city("Rome".to_string(), None, None).unwrap();
        let nameless = ctx
            .add_person(NewPerson {
                primary_city_id: Some(c),
                ..NewPerson::default()
            })
            .unwrap();
        let complete = ctx.add_person(NewPerson::named("Gia").in_city(c)).unwrap();

        let inbox: Vec<Uuid> = ctx.needs_attention().iter().map(|(p, _)| p.id).collect();
        assert!(inbox.contains(&nameless));
        assert!(!inbox.contains(&complete));
    }

    #[test]
    fn test_add_contact_method_requires_person() {
        let mut ctx = ready();
        let err = ctx
            .add_contact_method(Uuid::new_v4(), Platform::Email, "x@y.z".to_string())
            .unwrap_err();
        assert!(matches!(err, DataError::Store(StoreError::NotFound { .. })));
        assert!(ctx.contact_methods().is_empty());
    }

    #[test]
    fn test_update_contact_method_recomputes_deep_link() {
        let mut ctx = ready();
        let p = ctx.add_person(NewPerson::named("Ada")).unwrap();
        let id = ctx
            .add_contact_method(p, Platform::Phone, "555-1234".to_string())
            .unwrap();

        let mut method = ctx.contact_method(id).unwrap().clone();
        method.platform = Platform::Whatsapp;
        method.value = "+1 (555) 123-4567".to_string();
        method.deep_link = "https://example.com/spoofed".to_string();
        ctx.update_contact_method(&method).unwrap();

        let cached = ctx.contact_method(id).unwrap();
        assert_eq!(cached.deep_link, "https://wa.me/15551234567");
        let stored = ctx.database().get_contact_method(id).unwrap().unwrap();
        assert_eq!(&stored, cached);
    }

    #[test]
    fn test_trips_and_overview() {
        let mut ctx = ready();
        let now = Utc::now();
        let c = ctx.add_city("Paris".to_string(), None, Some("FR".to_string())).unwrap();
        ctx.add_person(NewPerson::named("Zoe").in_city(c)).unwrap();

        let later = ctx
            .add_trip(c, now + Duration::days(10), now + Duration::days(12), TripSource::Manual)
            .unwrap();
        let sooner = ctx
            .add_trip(c, now + Duration::days(2), now + Duration::days(3), TripSource::Manual)
            .unwrap();

        assert_eq!(ctx.upcoming_trip_at(now).map(|t| t.id), Some(sooner));

        let overview = ctx.next_trip_overview_at(now).unwrap();
        assert_eq!(overview.city.map(|c| c.name.as_str()), Some("Paris"));
        assert_eq!(overview.people_label(), "1 known person");

        ctx.delete_trip(sooner).unwrap();
        assert_eq!(ctx.upcoming_trip_at(now).map(|t| t.id), Some(later));

        ctx.delete_city(c).unwrap();
        let overview = ctx.next_trip_overview_at(now).unwrap();
        assert!(overview.city.is_none());
        assert_eq!(overview.people_count, 0);
        assert_eq!(overview.people_label(), "0 known people");
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let mut ctx = ready();
        let c = ctx.add_city("Oslo".to_string(), None, None).unwrap();
        let p = ctx.add_person(NewPerson::named("Ola").in_city(c)).unwrap();
        ctx.add_contact_method(p, Platform::Phone, "1".to_string())
            .unwrap();
        let before = snapshot(&ctx);

        ctx.database()
            .conn()
            .execute_batch("DROP TABLE people; DROP TABLE contact_methods;")
            .unwrap();

        let mut changed = ctx.person(p).unwrap().clone();
        changed.name = Some("Changed".to_string());
        let err = ctx.update_person(&changed).unwrap_err();
        assert!(matches!(err, DataError::Store(ref e) if e.is_storage()));
        assert!(ctx.delete_person(p).is_err());
        assert!(ctx.add_person(NewPerson::named("New")).is_err());

        assert_eq!(snapshot(&ctx), before);
    }

    #[test]
    fn test_failed_person_cascade_leaves_cache_untouched() {
        let mut ctx = ready();
        let p = ctx.add_person(NewPerson::named("Ola")).unwrap();
        ctx.add_contact_method(p, Platform::Phone, "1".to_string())
            .unwrap();
        let before = snapshot(&ctx);

        // People table intact, so only the contact method delete fails
        ctx.database()
            .conn()
            .execute_batch("DROP TABLE contact_methods;")
            .unwrap();

        let err = ctx.delete_person(p).unwrap_err();
        assert!(matches!(err, DataError::Store(ref e) if e.is_storage()));
        assert!(ctx.database().get_person(p).unwrap().is_some());
        assert_eq!(snapshot(&ctx), before);
    }

    #[test]
    fn test_failed_city_cascade_leaves_cache_untouched() {
        let mut ctx = ready();
        let c = ctx.add_city("Oslo".to_string(), None, None).unwrap();
        ctx.add_person(NewPerson::named("Ola").in_city(c)).unwrap();
        let before = snapshot(&ctx);

        ctx.database().conn().execute_batch("DROP TABLE people;").unwrap();

        assert!(ctx.delete_city(c).is_err());
        assert_eq!(snapshot(&ctx), before);
        // The city delete was rolled back with the failed person rewrite
        assert!(ctx.database().get_city(c).unwrap().is_some());
    }
}
