use rusqlite::{params, Row};
use tracing::debug;
use uuid::Uuid;

use super::people::write_person;
use super::{parse_uuid, Database, StoreError, StoreResult};
use crate::models::{City, Person};

const ENTITY: &str = "city";

impl Database {
    pub fn insert_city(&self, city: &City) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO cities (id, name, state, country) VALUES (?, ?, ?, ?)",
                params![city.id.to_string(), city.name, city.state, city.country],
            )
            .map_err(|e| StoreError::on_insert(e, ENTITY, city.id))?;
        debug!(id = %city.id, name = %city.name, "Inserted city");
        Ok(())
    }

    pub fn get_city(&self, id: Uuid) -> StoreResult<Option<City>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, state, country FROM cities WHERE id = ?")?;

        match stmt.query_row([id.to_string()], Self::row_to_city) {
            Ok(city) => Ok(Some(city)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_cities(&self) -> StoreResult<Vec<City>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, state, country FROM cities ORDER BY rowid")?;

        let cities = stmt
            .query_map([], Self::row_to_city)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cities)
    }

    pub fn update_city(&self, city: &City) -> StoreResult<()> {
        let rows = self.conn.execute(
            "UPDATE cities SET name = ?, state = ?, country = ? WHERE id = ?",
            params![city.name, city.state, city.country, city.id.to_string()],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found(ENTITY, city.id));
        }
        debug!(id = %city.id, "Updated city");
        Ok(())
    }

    pub fn delete_city(&self, id: Uuid) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM cities WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    /// Delete a city and rewrite the people that referenced it, atomically.
    ///
    /// `people` must already have the city cleared; they are written as given.
    pub fn delete_city_cascade(&self, id: Uuid, people: &[Person]) -> StoreResult<bool> {
        let tx = self.conn.unchecked_transaction()?;

        let rows = tx.execute("DELETE FROM cities WHERE id = ?", [id.to_string()])?;
        for person in people {
            if write_person(&tx, person)? == 0 {
                // Dropping the transaction rolls back the delete
                return Err(StoreError::not_found("person", person.id));
            }
        }

        tx.commit()?;
        debug!(%id, people = people.len(), "Deleted city");
        Ok(rows > 0)
    }

    fn row_to_city(row: &Row) -> rusqlite::Result<City> {
        let id: String = row.get(0)?;
        Ok(City {
            id: parse_uuid(&id)?,
            name: row.get(1)?,
            state: row.get(2)?,
            country: row.get(3)?,
        })
    }
}
