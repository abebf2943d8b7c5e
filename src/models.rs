use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::{loose_int, loose_text};
use crate::schema::*;

pub const INVOICE_KIND_RECRUITMENT: &str = "Rekrytering";
pub const INVOICE_KIND_STAFFING: &str = "Bemanning";

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = clients)]
pub struct Client {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = jobs)]
pub struct Job {
    pub id: i32,
    pub title: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = jobs)]
pub struct NewJob {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
}

/// Full overwrite of a job's editable fields; a missing field clears the column.
#[derive(Debug, Clone, Default, AsChangeset, Deserialize)]
#[diesel(table_name = jobs, treat_none_as_null = true)]
pub struct JobChanges {
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub client: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = candidates)]
pub struct Candidate {
    pub id: i32,
    pub job_id: Option<i32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub cv_url: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = candidates)]
pub struct NewCandidate {
    #[serde(default, deserialize_with = "loose_int")]
    pub job_id: Option<i32>,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub cv_url: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset, Deserialize)]
#[diesel(table_name = candidates, treat_none_as_null = true)]
pub struct CandidateReview {
    #[serde(default, deserialize_with = "loose_int")]
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "loose_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = invoices)]
pub struct Invoice {
    pub id: i32,
    pub client_id: Option<i32>,
    pub amount: Option<BigDecimal>,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Option<Value>,
    pub date: NaiveDate,
}

/// Invoice insert. `amount` is the text the order carried; the database casts
/// it to `numeric` and refuses anything that is not a number.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub client_id: Option<i32>,
    pub amount: Option<String>,
    pub kind: String,
    pub payload: Option<Value>,
}

/// Invoice row with the client name from a left join; `None` when the client is gone.
#[derive(Debug, Clone)]
pub struct InvoiceWithClient {
    pub invoice: Invoice,
    pub client: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = consultants)]
pub struct Consultant {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub role: String,
    pub hourly_wage: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = consultants)]
pub struct NewConsultant {
    pub code: String,
    pub name: String,
    pub role: String,
    pub hourly_wage: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = payroll)]
pub struct Payroll {
    pub id: i32,
    pub consultant_id: Option<i32>,
    pub month: String,
    pub gross: i64,
    pub status: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payroll)]
pub struct NewPayroll {
    pub consultant_id: Option<i32>,
    pub month: String,
    pub gross: i64,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct PayrollWithConsultant {
    pub payroll: Payroll,
    pub consultant: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = assignments)]
pub struct Assignment {
    pub id: i32,
    pub client_id: Option<i32>,
    pub start_ts: NaiveDateTime,
    pub end_ts: NaiveDateTime,
    pub place: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssignmentWithClient {
    pub assignment: Assignment,
    pub client: Option<String>,
}
