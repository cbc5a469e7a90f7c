use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::expenditures::repo_types::iso_date;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddExpenditureRequest {
    pub email_id: String,
    pub item_type: String,
    pub value: f64,
    #[serde(default)]
    pub annotation: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// Body of `PUT /update/expenditure`; `date` selects the record.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenditureRequest {
    #[serde(rename = "type")]
    pub item_type: String,
    pub value: f64,
    #[serde(default)]
    pub annotation: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct ExpenditureAdded {
    pub message: String,
    pub id: Uuid,
}
