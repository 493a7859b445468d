use rusqlite::{params, Row};
use tracing::debug;
use uuid::Uuid;

use super::{bad_tag, parse_timestamp, parse_uuid, Database, StoreError, StoreResult};
use crate::models::{Trip, TripSource};

const ENTITY: &str = "trip";

impl Database {
    pub fn insert_trip(&self, trip: &Trip) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO trips (id, city_id, start_date, end_date, source)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    trip.id.to_string(),
                    trip.city_id.to_string(),
                    trip.start_date.to_rfc3339(),
                    trip.end_date.to_rfc3339(),
                    trip.source.as_str(),
                ],
            )
            .map_err(|e| StoreError::on_insert(e, ENTITY, trip.id))?;
        debug!(id = %trip.id, city_id = %trip.city_id, "Inserted trip");
        Ok(())
    }

    pub fn get_trip(&self, id: Uuid) -> StoreResult<Option<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, city_id, start_date, end_date, source FROM trips WHERE id = ?",
        )?;

        match stmt.query_row([id.to_string()], Self::row_to_trip) {
            Ok(trip) => Ok(Some(trip)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_trips(&self) -> StoreResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, city_id, start_date, end_date, source FROM trips ORDER BY rowid",
        )?;

        let trips = stmt
            .query_map([], Self::row_to_trip)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(trips)
    }

    pub fn update_trip(&self, trip: &Trip) -> StoreResult<()> {
        let rows = self.conn.execute(
            "UPDATE trips SET city_id = ?, start_date = ?, end_date = ?, source = ? WHERE id = ?",
            params![
                trip.city_id.to_string(),
                trip.start_date.to_rfc3339(),
                trip.end_date.to_rfc3339(),
                trip.source.as_str(),
                trip.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found(ENTITY, trip.id));
        }
        debug!(id = %trip.id, "Updated trip");
        Ok(())
    }

    pub fn delete_trip(&self, id: Uuid) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM trips WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    fn row_to_trip(row: &Row) -> rusqlite::Result<Trip> {
        let id: String = row.get(0)?;
        let city_id: String = row.get(1)?;
        let start_date: String = row.get(2)?;
        let end_date: String = row.get(3)?;
        let source: String = row.get(4)?;

        Ok(Trip {
            id: parse_uuid(&id)?,
            city_id: parse_uuid(&city_id)?,
            start_date: parse_timestamp(&start_date)?,
            end_date: parse_timestamp(&end_date)?,
            source: TripSource::from_tag(&source).ok_or_else(|| bad_tag("source", &source))?,
        })
    }
}
