use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// `YYYY-MM-DD` (de)serialization for [`Date`] fields.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn format(date: &Date) -> Result<String, time::error::Format> {
        date.format(format_description!("[year]-[month]-[day]"))
    }

    pub fn parse(text: &str) -> Result<Date, time::error::Parse> {
        Date::parse(text, format_description!("[year]-[month]-[day]"))
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = format(date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Expenditure row, owned by the user with `email`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expenditure {
    pub id: Uuid,
    pub email: String,
    pub item_type: String,
    pub value: f64,
    pub annotation: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewExpenditure {
    pub email: String,
    pub item_type: String,
    pub value: f64,
    pub annotation: String,
    pub date: Date,
}

impl NewExpenditure {
    pub fn into_expenditure(self) -> Expenditure {
        Expenditure {
            id: Uuid::new_v4(),
            email: self.email,
            item_type: self.item_type,
            value: self.value,
            annotation: self.annotation,
            date: self.date,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Replacement values for an existing expenditure.
#[derive(Debug, Clone)]
pub struct ExpenditureChanges {
    pub item_type: String,
    pub value: f64,
    pub annotation: String,
    pub date: Date,
}

impl Expenditure {
    pub fn apply(&mut self, changes: ExpenditureChanges) {
        self.item_type = changes.item_type;
        self.value = changes.value;
        self.annotation = changes.annotation;
        self.date = changes.date;
    }
}
