use rusqlite::{params, Row};
use tracing::debug;
use uuid::Uuid;

use super::{bad_tag, parse_uuid, Database, StoreError, StoreResult};
use crate::models::{ContactMethod, Platform};

const ENTITY: &str = "contact method";

impl Database {
    pub fn insert_contact_method(&self, method: &ContactMethod) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO contact_methods (id, person_id, platform, value, deep_link)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    method.id.to_string(),
                    method.person_id.to_string(),
                    method.platform.as_str(),
                    method.value,
                    method.deep_link,
                ],
            )
            .map_err(|e| StoreError::on_insert(e, ENTITY, method.id))?;
        debug!(id = %method.id, person_id = %method.person_id, "Inserted contact method");
        Ok(())
    }

    pub fn get_contact_method(&self, id: Uuid) -> StoreResult<Option<ContactMethod>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, person_id, platform, value, deep_link
             FROM contact_methods WHERE id = ?",
        )?;

        match stmt.query_row([id.to_string()], Self::row_to_contact_method) {
            Ok(method) => Ok(Some(method)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Every contact method, for loading the whole set in one query
    pub fn list_contact_methods(&self) -> StoreResult<Vec<ContactMethod>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, person_id, platform, value, deep_link
             FROM contact_methods ORDER BY rowid",
        )?;

        let methods = stmt
            .query_map([], Self::row_to_contact_method)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(methods)
    }

    pub fn get_contact_methods_for_person(&self, person_id: Uuid) -> StoreResult<Vec<ContactMethod>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, person_id, platform, value, deep_link
             FROM contact_methods WHERE person_id = ? ORDER BY rowid",
        )?;

        let methods = stmt
            .query_map([person_id.to_string()], Self::row_to_contact_method)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(methods)
    }

    /// Replace platform, value and deep link. The owning person never changes.
    pub fn update_contact_method(&self, method: &ContactMethod) -> StoreResult<()> {
        let rows = self.conn.execute(
            "UPDATE contact_methods SET platform = ?, value = ?, deep_link = ? WHERE id = ?",
            params![
                method.platform.as_str(),
                method.value,
                method.deep_link,
                method.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found(ENTITY, method.id));
        }
        debug!(id = %method.id, "Updated contact method");
        Ok(())
    }

    pub fn delete_contact_method(&self, id: Uuid) -> StoreResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM contact_methods WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    fn row_to_contact_method(row: &Row) -> rusqlite::Result<ContactMethod> {
        let id: String = row.get(0)?;
        let person_id: String = row.get(1)?;
        let platform: String = row.get(2)?;

        Ok(ContactMethod {
            id: parse_uuid(&id)?,
            person_id: parse_uuid(&person_id)?,
            platform: Platform::parse(&platform).ok_or_else(|| bad_tag("platform", &platform))?,
            value: row.get(3)?,
            deep_link: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    #[test]
    fn test_contact_method_crud() {
        let db = test_db();
        let person_id = Uuid::new_v4();
        let mut method = ContactMethod::new(person_id, Platform::Whatsapp, "+1 555 0100".to_string());

        db.insert_contact_method(&method).unwrap();
        assert_eq!(db.get_contact_method(method.id).unwrap().unwrap(), method);

        method.platform = Platform::Telegram;
        method.value = "ada".to_string();
        method.refresh_deep_link();
        db.update_contact_method(&method).unwrap();
        assert_eq!(db.list_contact_methods().unwrap(), vec![method.clone()]);

        assert!(db.delete_contact_method(method.id).unwrap());
        assert!(!db.delete_contact_method(method.id).unwrap());
        assert!(db.get_contact_method(method.id).unwrap().is_none());
    }

    #[test]
    fn test_update_does_not_move_between_people() {
        let db = test_db();
        let owner = Uuid::new_v4();
        let mut method = ContactMethod::new(owner, Platform::Phone, "555".to_string());
        db.insert_contact_method(&method).unwrap();

        method.person_id = Uuid::new_v4();
        db.update_contact_method(&method).unwrap();

        let stored = db.get_contact_method(method.id).unwrap().unwrap();
        assert_eq!(stored.person_id, owner);
    }

    #[test]
    fn test_methods_for_person() {
        let db = test_db();
        let ada = Uuid::new_v4();
        let bo = Uuid::new_v4();
        db.insert_contact_method(&ContactMethod::new(ada, Platform::Phone, "1".to_string()))
            .unwrap();
        db.insert_contact_method(&ContactMethod::new(ada, Platform::Email, "a@x.io".to_string()))
            .unwrap();
        db.insert_contact_method(&ContactMethod::new(bo, Platform::Sms, "2".to_string()))
            .unwrap();

        let methods = db.get_contact_methods_for_person(ada).unwrap();
        assert_eq!(methods.len(), 2);
        assert!(methods.iter().all(|m| m.person_id == ada));
        assert!(db.get_contact_methods_for_person(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn test_update_missing_method_is_not_found() {
        let db = test_db();
        let method = ContactMethod::new(Uuid::new_v4(), Platform::Sms, "1".to_string());
        let err = db.update_contact_method(&method).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
