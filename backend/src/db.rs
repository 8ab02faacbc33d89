use anyhow::Result;
use chrono::NaiveDate;
use shared::Person;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:birthdays.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Birth dates are stored as ISO 8601 date strings (YYYY-MM-DD)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS people (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                birth_date TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store a new person in the database
    pub async fn store_person(&self, person: &Person) -> Result<()> {
        sqlx::query("INSERT INTO people (id, name, birth_date) VALUES (?, ?, ?)")
            .bind(&person.id)
            .bind(&person.name)
            .bind(person.birth_date.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    /// Retrieve a person by ID
    pub async fn get_person(&self, person_id: &str) -> Result<Option<Person>> {
        let row = sqlx::query("SELECT id, name, birth_date FROM people WHERE id = ?")
            .bind(person_id)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_person(&r)?)),
            None => Ok(None),
        }
    }

    /// List all people ordered by name. Callers must not rely on this
    /// ordering; derived views apply their own sort.
    pub async fn list_people(&self) -> Result<Vec<Person>> {
        let rows = sqlx::query("SELECT id, name, birth_date FROM people ORDER BY name ASC")
            .fetch_all(&*self.pool)
            .await?;

        rows.iter().map(Self::row_to_person).collect()
    }

    /// Replace a person's name and birth date wholesale.
    /// Returns false if no record with that ID exists.
    pub async fn update_person(&self, person: &Person) -> Result<bool> {
        let result = sqlx::query("UPDATE people SET name = ?, birth_date = ? WHERE id = ?")
            .bind(&person.name)
            .bind(person.birth_date.to_string())
            .bind(&person.id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a person by ID.
    /// Returns false if no record with that ID exists.
    pub async fn delete_person(&self, person_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM people WHERE id = ?")
            .bind(person_id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_person(row: &sqlx::sqlite::SqliteRow) -> Result<Person> {
        let birth_date: String = row.get("birth_date");
        Ok(Person {
            id: row.get("id"),
            name: row.get("name"),
            birth_date: birth_date.parse::<NaiveDate>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setup a new test database for each test
    async fn setup_test() -> DbConnection {
        DbConnection::init_test()
            .await
            .expect("Failed to create test database")
    }

    fn test_person(name: &str, birth_date: &str) -> Person {
        Person {
            id: Person::generate_id(),
            name: name.to_string(),
            birth_date: birth_date.parse().expect("valid test date"),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_person() {
        let db = setup_test().await;

        let person = test_person("Ada Lovelace", "1990-06-15");
        db.store_person(&person).await.expect("Failed to store person");

        let result = db
            .get_person(&person.id)
            .await
            .expect("Failed to get person");

        assert_eq!(result, Some(person));
    }

    #[tokio::test]
    async fn test_get_nonexistent_person() {
        let db = setup_test().await;

        let result = db
            .get_person("person::nonexistent")
            .await
            .expect("Query failed");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_people() {
        let db = setup_test().await;

        // Initially should be empty
        let empty = db.list_people().await.expect("Failed to list people");
        assert!(empty.is_empty(), "Database should be empty at test start");

        let names = ["Charlie", "Alice", "Bob"];
        for name in &names {
            db.store_person(&test_person(name, "1990-01-01"))
                .await
                .expect("Failed to store person");
        }

        let people = db.list_people().await.expect("Failed to list people");
        assert_eq!(people.len(), 3);

        // Listed in name order
        let listed: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(listed, vec!["Alice", "Bob", "Charlie"]);
    }

    #[tokio::test]
    async fn test_update_person_replaces_wholesale() {
        let db = setup_test().await;

        let mut person = test_person("Original Name", "1990-06-15");
        db.store_person(&person).await.expect("Failed to store person");

        person.name = "Updated Name".to_string();
        person.birth_date = "1985-12-01".parse().unwrap();

        let updated = db
            .update_person(&person)
            .await
            .expect("Failed to update person");
        assert!(updated, "Existing person should have been updated");

        let stored = db
            .get_person(&person.id)
            .await
            .expect("Failed to get person")
            .expect("Person should still exist");
        assert_eq!(stored.name, "Updated Name");
        assert_eq!(stored.birth_date.to_string(), "1985-12-01");
    }

    #[tokio::test]
    async fn test_update_nonexistent_person() {
        let db = setup_test().await;

        let person = test_person("Ghost", "1990-06-15");
        let updated = db.update_person(&person).await.expect("Query failed");

        assert!(!updated, "Update of a missing ID should report no match");
    }

    #[tokio::test]
    async fn test_delete_person() {
        let db = setup_test().await;

        let person = test_person("To Delete", "1990-06-15");
        db.store_person(&person).await.expect("Failed to store person");

        let deleted = db
            .delete_person(&person.id)
            .await
            .expect("Failed to delete person");
        assert!(deleted, "Person should have been deleted");

        let exists_after = db
            .get_person(&person.id)
            .await
            .expect("Failed to check after deletion");
        assert!(exists_after.is_none());

        // Deleting again reports no match rather than silently succeeding
        let deleted_again = db
            .delete_person(&person.id)
            .await
            .expect("Failed to re-delete person");
        assert!(!deleted_again, "Person should not exist to be deleted");
    }
}
