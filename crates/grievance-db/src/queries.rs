use grievance_types::models::Complaint;
use rusqlite::{Connection, OptionalExtension, ffi};

use crate::models::UserRow;
use crate::{Database, DbError, Result};

impl Database {
    // -- Users --

    /// Insert a new user. The `UNIQUE` constraint on `email` makes this the
    /// single point where duplicate signups are rejected.
    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password) VALUES (?1, ?2)",
                (email, password_hash),
            )
            .map_err(map_unique_violation)?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    // -- Complaints --

    pub fn insert_complaint(
        &self,
        email: &str,
        name: &str,
        location: &str,
        message: &str,
        attachment_path: Option<&str>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO complaints (email, name, location, message, attachment_path)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![email, name, location, message, attachment_path],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All complaints in insertion order.
    pub fn list_complaints(&self) -> Result<Vec<Complaint>> {
        self.with_conn(query_complaints)
    }
}

fn map_unique_violation(err: rusqlite::Error) -> DbError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::DuplicateUser
        }
        other => other.into(),
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT email, password FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                email: row.get(0)?,
                password: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_complaints(conn: &Connection) -> Result<Vec<Complaint>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, name, location, message, attachment_path, created_at
         FROM complaints
         ORDER BY id ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Complaint {
                id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                location: row.get(3)?,
                message: row.get(4)?,
                attachment_path: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_users(db: &Database) -> i64 {
        db.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?))
            .unwrap()
    }

    #[test]
    fn create_then_find_user() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("a@b.com", "hash").unwrap();

        let user = db.find_user_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.password, "hash");
        assert!(db.find_user_by_email("nobody@b.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected_by_constraint() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("a@b.com", "first").unwrap();

        let err = db.create_user("a@b.com", "second").unwrap_err();
        assert!(matches!(err, DbError::DuplicateUser));
        assert_eq!(count_users(&db), 1);

        // first writer wins
        let user = db.find_user_by_email("a@b.com").unwrap().unwrap();
        assert_eq!(user.password, "first");
    }

    #[test]
    fn email_lookup_is_case_sensitive() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("Alice@b.com", "hash").unwrap();

        assert!(db.find_user_by_email("alice@b.com").unwrap().is_none());
        db.create_user("alice@b.com", "hash").unwrap();
        assert_eq!(count_users(&db), 2);
    }

    #[test]
    fn complaints_listed_in_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        db.insert_complaint("a@b.com", "A", "X", "first", None).unwrap();
        db.insert_complaint("c@d.com", "C", "Y", "second", Some("uploads/1-2-photo.png"))
            .unwrap();
        // duplicates are allowed
        db.insert_complaint("a@b.com", "A", "X", "first", None).unwrap();

        let list = db.list_complaints().unwrap();
        let messages: Vec<&str> = list.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "first"]);
        assert_eq!(list[0].attachment_path, None);
        assert_eq!(list[1].attachment_path.as_deref(), Some("uploads/1-2-photo.png"));
        assert_eq!(list[1].attachment_name(), Some("1-2-photo.png"));
    }

    #[test]
    fn reopen_keeps_data_and_skips_applied_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grievance.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_user("a@b.com", "hash").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(count_users(&db), 1);
    }
}
