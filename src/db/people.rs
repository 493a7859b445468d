use rusqlite::{params, Connection, Row};
use tracing::debug;
use uuid::Uuid;

use super::{
    bad_tag, decode_uuids, encode_uuids, parse_opt_timestamp, parse_opt_uuid, parse_timestamp,
    parse_uuid, Database, StoreError, StoreResult,
};
use crate::models::{Person, Tier};

const ENTITY: &str = "person";

impl Database {
    // ==================== PERSON CREATE ====================

    pub fn insert_person(&self, person: &Person) -> StoreResult<()> {
        self.conn
            .execute(
                r#"INSERT INTO people (
                    id, name, primary_city_id, additional_city_ids, tier,
                    notes, last_contacted_at, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    person.id.to_string(),
                    person.name,
                    person.primary_city_id.map(|id| id.to_string()),
                    encode_uuids(&person.additional_city_ids)?,
                    person.tier.as_str(),
                    person.notes,
                    person.last_contacted_at.map(|dt| dt.to_rfc3339()),
                    person.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::on_insert(e, ENTITY, person.id))?;
        debug!(id = %person.id, "Inserted person");
        Ok(())
    }

    // ==================== PERSON READ ====================

    pub fn get_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        let mut stmt = self.conn.prepare("SELECT * FROM people WHERE id = ?")?;

        let result = stmt.query_row([id.to_string()], Self::row_to_person);

        match result {
            Ok(person) => Ok(Some(person)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All people in storage order
    pub fn list_people(&self) -> StoreResult<Vec<Person>> {
        let mut stmt = self.conn.prepare("SELECT * FROM people ORDER BY rowid")?;

        let people = stmt
            .query_map([], Self::row_to_person)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(people)
    }

    // ==================== PERSON UPDATE ====================

    /// Replace every mutable column. `created_at` is never rewritten.
    pub fn update_person(&self, person: &Person) -> StoreResult<()> {
        let rows = write_person(&self.conn, person)?;
        if rows == 0 {
            return Err(StoreError::not_found(ENTITY, person.id));
        }
        debug!(id = %person.id, "Updated person");
        Ok(())
    }

    // ==================== PERSON DELETE ====================

    /// Delete the person row only. Returns false if there was none.
    pub fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM people WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    /// Delete a person and their contact methods in one transaction.
    pub fn delete_person_cascade(&self, id: Uuid) -> StoreResult<bool> {
        let tx = self.conn.unchecked_transaction()?;

        let methods = tx.execute(
            "DELETE FROM contact_methods WHERE person_id = ?",
            [id.to_string()],
        )?;
        let rows = tx.execute("DELETE FROM people WHERE id = ?", [id.to_string()])?;

        tx.commit()?;
        debug!(%id, contact_methods = methods, "Deleted person");
        Ok(rows > 0)
    }

    // ==================== ROW MAPPER ====================

    fn row_to_person(row: &Row) -> rusqlite::Result<Person> {
        let id: String = row.get("id")?;
        let tier: String = row.get("tier")?;
        let created_at: String = row.get("created_at")?;

        Ok(Person {
            id: parse_uuid(&id)?,
            name: row.get("name")?,
            primary_city_id: parse_opt_uuid(row.get("primary_city_id")?)?,
            additional_city_ids: decode_uuids(row.get("additional_city_ids")?)?,
            tier: Tier::from_tag(&tier).ok_or_else(|| bad_tag("tier", &tier))?,
            notes: row.get("notes")?,
            last_contacted_at: parse_opt_timestamp(row.get("last_contacted_at")?)?,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

/// UPDATE one person row on `conn`, which may be a transaction.
pub(super) fn write_person(conn: &Connection, person: &Person) -> StoreResult<usize> {
    let rows = conn.execute(
        r#"UPDATE people SET
            name = ?, primary_city_id = ?, additional_city_ids = ?, tier = ?,
            notes = ?, last_contacted_at = ?
           WHERE id = ?"#,
        params![
            person.name,
            person.primary_city_id.map(|id| id.to_string()),
            encode_uuids(&person.additional_city_ids)?,
            person.tier.as_str(),
            person.notes,
            person.last_contacted_at.map(|dt| dt.to_rfc3339()),
            person.id.to_string(),
        ],
    )?;
    Ok(rows)
}
