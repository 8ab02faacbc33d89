use crate::db::DbConnection;
use chrono::{Datelike, Local, NaiveDate};
use shared::{
    CreatePersonRequest, MonthBirthday, MonthBirthdaysResponse, Person, PersonListResponse,
    PersonResponse, UpcomingBirthday, UpcomingBirthdaysResponse, UpdatePersonRequest,
};
use tracing::{info, warn};

/// Inclusive day-count threshold for the upcoming-birthdays view
pub const UPCOMING_HORIZON_DAYS: i64 = 30;

const MAX_NAME_LENGTH: usize = 100;

/// Failures surfaced to the caller as typed errors. Validation variants and
/// `NotFound` are request-scoped and map to client errors at the REST layer;
/// `Storage` wraps infrastructure failures.
#[derive(Debug, thiserror::Error)]
pub enum PersonError {
    #[error("Person name cannot be empty")]
    EmptyName,
    #[error("Person name cannot exceed 100 characters")]
    NameTooLong,
    #[error("Birth date must be a valid date in YYYY-MM-DD format")]
    InvalidBirthDate,
    #[error("Month must be between 0 and 11")]
    MonthOutOfRange,
    #[error("Person not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// The birthday's date in the given year. A Feb 29 birth date observed in a
/// non-leap year falls on Mar 1.
fn birthday_in_year(birth_date: NaiveDate, year: i32) -> NaiveDate {
    match birth_date.with_year(year) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, 3, 1).expect("Mar 1 exists in every year"),
    }
}

/// Whole days from `today` to the next occurrence of `birth_date`'s
/// month/day. Returns 0 when the birthday is today; the result is always in
/// `[0, 366)`.
pub fn days_until_next_birthday(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    let this_year = birthday_in_year(birth_date, today.year());

    // If this year's birthday has passed, use next year's birthday
    let target = if this_year < today {
        birthday_in_year(birth_date, today.year() + 1)
    } else {
        this_year
    };

    (target - today).num_days()
}

/// Map people to upcoming-birthday views, keep those inside the horizon
/// (inclusive), and sort soonest first. The sort is stable, so people with
/// the same `days_until` keep their input order.
pub fn upcoming_birthdays(
    people: Vec<Person>,
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<UpcomingBirthday> {
    let mut upcoming: Vec<UpcomingBirthday> = people
        .into_iter()
        .map(|person| {
            let days_until = days_until_next_birthday(person.birth_date, today);
            UpcomingBirthday { person, days_until }
        })
        .filter(|entry| entry.days_until <= horizon_days)
        .collect();

    upcoming.sort_by_key(|entry| entry.days_until);
    upcoming
}

/// Keep people born in the given month (0-indexed, already validated) and
/// sort by day of month.
pub fn birthdays_in_month(people: Vec<Person>, month: u32) -> Vec<MonthBirthday> {
    let mut birthdays: Vec<MonthBirthday> = people
        .into_iter()
        .filter(|person| person.birth_date.month0() == month)
        .map(|person| {
            let day_of_month = person.birth_date.day();
            MonthBirthday {
                person,
                day_of_month,
            }
        })
        .collect();

    birthdays.sort_by_key(|entry| entry.day_of_month);
    birthdays
}

/// Service for managing tracked people and their derived birthday views
#[derive(Clone)]
pub struct PersonService {
    db: DbConnection,
}

impl PersonService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create a new person
    pub async fn create_person(
        &self,
        request: CreatePersonRequest,
    ) -> Result<PersonResponse, PersonError> {
        info!(
            "Creating person: name={}, birth_date={}",
            request.name, request.birth_date
        );

        let name = Self::validate_name(&request.name)?;
        let birth_date = Self::parse_birth_date(&request.birth_date)?;

        let person = Person {
            id: Person::generate_id(),
            name,
            birth_date,
        };

        self.db.store_person(&person).await?;

        info!("Created person: {} with ID: {}", person.name, person.id);

        Ok(PersonResponse {
            person,
            success_message: "Person created successfully".to_string(),
        })
    }

    /// Replace an existing person's name and birth date wholesale
    pub async fn update_person(
        &self,
        person_id: &str,
        request: UpdatePersonRequest,
    ) -> Result<PersonResponse, PersonError> {
        info!("Updating person: {}", person_id);

        let name = Self::validate_name(&request.name)?;
        let birth_date = Self::parse_birth_date(&request.birth_date)?;

        let person = Person {
            id: person_id.to_string(),
            name,
            birth_date,
        };

        let updated = self.db.update_person(&person).await?;
        if !updated {
            warn!("Person not found for update: {}", person_id);
            return Err(PersonError::NotFound(person_id.to_string()));
        }

        info!("Updated person: {} with ID: {}", person.name, person.id);

        Ok(PersonResponse {
            person,
            success_message: "Person updated successfully".to_string(),
        })
    }

    /// Delete a person. Deleting an already-deleted ID fails with `NotFound`
    /// rather than silently succeeding.
    pub async fn delete_person(&self, person_id: &str) -> Result<(), PersonError> {
        info!("Deleting person: {}", person_id);

        let deleted = self.db.delete_person(person_id).await?;
        if !deleted {
            warn!("Person not found for delete: {}", person_id);
            return Err(PersonError::NotFound(person_id.to_string()));
        }

        info!("Deleted person: {}", person_id);
        Ok(())
    }

    /// List all tracked people
    pub async fn list_people(&self) -> Result<PersonListResponse, PersonError> {
        info!("Listing all people");

        let people = self.db.list_people().await?;

        info!("Found {} people", people.len());

        Ok(PersonListResponse { people })
    }

    /// Birthdays falling within the next 30 days, soonest first. Each call
    /// recomputes from a fresh snapshot of all people.
    pub async fn get_upcoming(&self) -> Result<UpcomingBirthdaysResponse, PersonError> {
        info!("Listing upcoming birthdays");

        let people = self.db.list_people().await?;
        let today = Local::now().date_naive();
        let upcoming = upcoming_birthdays(people, today, UPCOMING_HORIZON_DAYS);

        info!("Found {} upcoming birthdays", upcoming.len());

        Ok(UpcomingBirthdaysResponse { upcoming })
    }

    /// Birthdays in the given month (0-indexed, 0 = January), earliest day
    /// first
    pub async fn get_by_month(&self, month: i64) -> Result<MonthBirthdaysResponse, PersonError> {
        info!("Listing birthdays for month: {}", month);

        if !(0..=11).contains(&month) {
            return Err(PersonError::MonthOutOfRange);
        }

        let people = self.db.list_people().await?;
        let birthdays = birthdays_in_month(people, month as u32);

        info!("Found {} birthdays in month {}", birthdays.len(), month);

        Ok(MonthBirthdaysResponse {
            month: month as u32,
            birthdays,
        })
    }

    fn validate_name(name: &str) -> Result<String, PersonError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PersonError::EmptyName);
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(PersonError::NameTooLong);
        }
        Ok(trimmed.to_string())
    }

    fn parse_birth_date(birth_date: &str) -> Result<NaiveDate, PersonError> {
        birth_date
            .parse::<NaiveDate>()
            .map_err(|_| PersonError::InvalidBirthDate)
    }
}
