use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person whose birthday is tracked.
///
/// `birth_date` crosses the API boundary as an ISO 8601 date string
/// (YYYY-MM-DD); no time-of-day component is carried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Person ID in format: "person::<uuid>"
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
}

impl Person {
    /// Generate a new unique person ID
    pub fn generate_id() -> String {
        format!("person::{}", uuid::Uuid::new_v4())
    }
}

/// Request for creating a new person.
///
/// The date is kept as a raw string so that malformed input surfaces as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePersonRequest {
    pub name: String,
    pub birth_date: String, // ISO 8601 date format (YYYY-MM-DD)
}

/// Request for updating an existing person. Both fields are required:
/// updates replace the record wholesale, there is no partial patch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatePersonRequest {
    pub name: String,
    pub birth_date: String, // ISO 8601 date format (YYYY-MM-DD)
}

/// Response after creating or updating a person
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonResponse {
    pub person: Person,
    pub success_message: String,
}

/// Response containing all tracked people
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonListResponse {
    pub people: Vec<Person>,
}

/// A person paired with the number of days until their next birthday
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpcomingBirthday {
    pub person: Person,
    /// Whole days from today to the next occurrence of the birth
    /// month/day; 0 means the birthday is today.
    pub days_until: i64,
}

/// Response containing birthdays inside the upcoming horizon, soonest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpcomingBirthdaysResponse {
    pub upcoming: Vec<UpcomingBirthday>,
}

/// A person paired with the day of the month their birthday falls on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthBirthday {
    pub person: Person,
    pub day_of_month: u32, // 1-31
}

/// Response containing birthdays for a requested month, earliest day first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthBirthdaysResponse {
    /// Requested month, 0-indexed (0 = January)
    pub month: u32,
    pub birthdays: Vec<MonthBirthday>,
}
