use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agency_backend::config::{AppConfig, CompanyProfile};
use agency_backend::models::{
    Assignment, AssignmentWithClient, Candidate, CandidateReview, Client, Consultant, Invoice,
    InvoiceWithClient, Job, JobChanges, NewCandidate, NewConsultant, NewInvoice, NewJob,
    NewPayroll, Payroll, PayrollWithConsultant,
};
use agency_backend::pdf::PdfRenderer;
use agency_backend::routes;
use agency_backend::seed::{seed_demo_data, SeedReport};
use agency_backend::state::AppState;
use agency_backend::store::{SeedTable, Store, StoreError, StoreResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use http_body_util::BodyExt;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

pub const ADMIN_KEY: &str = "test-admin-key";

static RENDERER: Lazy<Arc<PdfRenderer>> = Lazy::new(|| Arc::new(PdfRenderer::new()));

#[derive(Default)]
struct Tables {
    clients: Vec<Client>,
    jobs: Vec<Job>,
    candidates: Vec<Candidate>,
    invoices: Vec<Invoice>,
    consultants: Vec<Consultant>,
    payroll: Vec<Payroll>,
    assignments: Vec<Assignment>,
    last_client_id: i32,
    last_job_id: i32,
    last_candidate_id: i32,
    last_invoice_id: i32,
    last_consultant_id: i32,
    last_payroll_id: i32,
    last_assignment_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

fn database_error(message: String) -> StoreError {
    StoreError::Database(DieselError::DatabaseError(
        DatabaseErrorKind::Unknown,
        Box::new(message),
    ))
}

/// Mirrors `CAST($1 AS numeric)`: surrounding whitespace is fine, anything else
/// that is not a decimal number is refused.
fn cast_numeric(text: Option<String>) -> StoreResult<Option<BigDecimal>> {
    let Some(text) = text else {
        return Ok(None);
    };
    BigDecimal::from_str(text.trim())
        .map(Some)
        .map_err(|_| database_error(format!("invalid input syntax for type numeric: \"{text}\"")))
}

fn newest_first<T: Clone>(rows: &[T]) -> Vec<T> {
    rows.iter().rev().cloned().collect()
}

impl Tables {
    fn client_name(&self, client_id: Option<i32>) -> Option<String> {
        let client_id = client_id?;
        self.clients
            .iter()
            .find(|client| client.id == client_id)
            .map(|client| client.name.clone())
    }

    fn invoice_row(&self, invoice: &Invoice) -> InvoiceWithClient {
        InvoiceWithClient {
            invoice: invoice.clone(),
            client: self.client_name(invoice.client_id),
        }
    }
}

/// In-memory stand-in for PostgreSQL. Rows live in insertion order, so
/// newest-first listings are the reversed vectors.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(database_error("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.tables.lock().await.clients.clone()
    }

    pub async fn jobs(&self) -> Vec<Job> {
        self.tables.lock().await.jobs.clone()
    }

    pub async fn invoices(&self) -> Vec<Invoice> {
        self.tables.lock().await.invoices.clone()
    }

    pub async fn consultants(&self) -> Vec<Consultant> {
        self.tables.lock().await.consultants.clone()
    }

    pub async fn payrolls(&self) -> Vec<Payroll> {
        self.tables.lock().await.payroll.clone()
    }

    pub async fn insert_assignment(
        &self,
        client_id: Option<i32>,
        start_ts: NaiveDateTime,
        end_ts: NaiveDateTime,
        place: Option<&str>,
    ) -> Assignment {
        let mut tables = self.tables.lock().await;
        let assignment = Assignment {
            id: next_id(&mut tables.last_assignment_id),
            client_id,
            start_ts,
            end_ts,
            place: place.map(str::to_string),
        };
        tables.assignments.push(assignment.clone());
        assignment
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn resolve_client(&self, name: String) -> StoreResult<Client> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.clients.iter().find(|client| client.name == name) {
            return Ok(existing.clone());
        }
        let client = Client {
            id: next_id(&mut tables.last_client_id),
            name,
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn ensure_client(&self, name: String) -> StoreResult<()> {
        self.resolve_client(name).await.map(|_| ())
    }

    async fn first_client_id(&self) -> StoreResult<Option<i32>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables.clients.iter().map(|client| client.id).min())
    }

    async fn count(&self, table: SeedTable) -> StoreResult<i64> {
        self.check()?;
        let tables = self.tables.lock().await;
        let rows = match table {
            SeedTable::Clients => tables.clients.len(),
            SeedTable::Jobs => tables.jobs.len(),
            SeedTable::Consultants => tables.consultants.len(),
            SeedTable::Invoices => tables.invoices.len(),
            SeedTable::Payroll => tables.payroll.len(),
        };
        Ok(rows as i64)
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        self.check()?;
        let amount = cast_numeric(invoice.amount)?;
        let mut tables = self.tables.lock().await;
        let row = Invoice {
            id: next_id(&mut tables.last_invoice_id),
            client_id: invoice.client_id,
            amount,
            kind: invoice.kind,
            payload: invoice.payload,
            date: Utc::now().date_naive(),
        };
        tables.invoices.push(row.clone());
        Ok(row)
    }

    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithClient>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .invoices
            .iter()
            .rev()
            .map(|invoice| tables.invoice_row(invoice))
            .collect())
    }

    async fn find_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithClient>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .invoices
            .iter()
            .find(|invoice| invoice.id == id)
            .map(|invoice| tables.invoice_row(invoice)))
    }

    async fn create_consultant(&self, consultant: NewConsultant) -> StoreResult<Consultant> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let row = Consultant {
            id: next_id(&mut tables.last_consultant_id),
            code: consultant.code,
            name: consultant.name,
            role: consultant.role,
            hourly_wage: consultant.hourly_wage,
        };
        tables.consultants.push(row.clone());
        Ok(row)
    }

    async fn find_consultant_by_code(&self, code: String) -> StoreResult<Option<Consultant>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .consultants
            .iter()
            .find(|consultant| consultant.code == code)
            .cloned())
    }

    async fn create_payroll(&self, payroll: NewPayroll) -> StoreResult<Payroll> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let row = Payroll {
            id: next_id(&mut tables.last_payroll_id),
            consultant_id: payroll.consultant_id,
            month: payroll.month,
            gross: payroll.gross,
            status: payroll.status,
        };
        tables.payroll.push(row.clone());
        Ok(row)
    }

    async fn list_payrolls(&self) -> StoreResult<Vec<Payroll>> {
        self.check()?;
        Ok(newest_first(&self.tables.lock().await.payroll))
    }

    async fn find_payroll(&self, id: i32) -> StoreResult<Option<PayrollWithConsultant>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .payroll
            .iter()
            .find(|payroll| payroll.id == id)
            .map(|payroll| PayrollWithConsultant {
                payroll: payroll.clone(),
                consultant: tables
                    .consultants
                    .iter()
                    .find(|consultant| Some(consultant.id) == payroll.consultant_id)
                    .map(|consultant| consultant.name.clone()),
            }))
    }

    async fn list_shifts(&self) -> StoreResult<Vec<AssignmentWithClient>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .assignments
            .iter()
            .rev()
            .map(|assignment| AssignmentWithClient {
                assignment: assignment.clone(),
                client: tables.client_name(assignment.client_id),
            })
            .collect())
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        self.check()?;
        Ok(newest_first(&self.tables.lock().await.jobs))
    }

    async fn find_job(&self, id: i32) -> StoreResult<Option<Job>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables.jobs.iter().find(|job| job.id == id).cloned())
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let row = Job {
            id: next_id(&mut tables.last_job_id),
            title: job.title,
            client: job.client,
            description: job.description,
            created_at: Utc::now().naive_utc(),
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn update_job(&self, id: i32, changes: JobChanges) -> StoreResult<Option<Job>> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.jobs.iter_mut().find(|job| job.id == id).map(|job| {
            job.title = changes.title;
            job.client = changes.client;
            job.description = changes.description;
            job.clone()
        }))
    }

    async fn delete_job(&self, id: i32) -> StoreResult<usize> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|job| job.id != id);
        let deleted = before - tables.jobs.len();
        if deleted > 0 {
            tables
                .candidates
                .retain(|candidate| candidate.job_id != Some(id));
        }
        Ok(deleted)
    }

    async fn list_candidates(&self, job_id: i32) -> StoreResult<Vec<Candidate>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .candidates
            .iter()
            .rev()
            .filter(|candidate| candidate.job_id == Some(job_id))
            .cloned()
            .collect())
    }

    async fn create_candidate(&self, candidate: NewCandidate) -> StoreResult<Candidate> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let row = Candidate {
            id: next_id(&mut tables.last_candidate_id),
            job_id: candidate.job_id,
            name: candidate.name,
            email: candidate.email,
            cv_url: candidate.cv_url,
            rating: None,
            notes: None,
        };
        tables.candidates.push(row.clone());
        Ok(row)
    }

    async fn review_candidate(
        &self,
        id: i32,
        review: CandidateReview,
    ) -> StoreResult<Option<Candidate>> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        Ok(tables
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == id)
            .map(|candidate| {
                candidate.rating = review.rating;
                candidate.notes = review.notes;
                candidate.clone()
            }))
    }
}

pub fn test_config(admin_api_key: &str) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        database_max_pool_size: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        admin_api_key: admin_api_key.to_string(),
        company: CompanyProfile {
            name: "BR Bemanning".to_string(),
            address: "Storgatan 1, 111 22 Stockholm".to_string(),
            org_number: "556000-0000".to_string(),
        },
        cors_allowed_origin: None,
        seed_demo_data: false,
    }
}

pub struct TestApp {
    #[allow(dead_code)]
    pub state: AppState,
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_admin_key(ADMIN_KEY)
    }

    pub fn with_admin_key(admin_api_key: &str) -> Self {
        let store = Arc::new(MemoryStore::default());
        let store_for_state: Arc<dyn Store> = store.clone();
        let state = AppState::new(
            store_for_state,
            test_config(admin_api_key),
            RENDERER.clone(),
        );
        let router = routes::create_router(state.clone());
        Self {
            state,
            router,
            store,
        }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    #[allow(dead_code)]
    pub async fn seed(&self) -> Result<SeedReport> {
        seed_demo_data(self.store.as_ref())
            .await
            .map_err(|err| anyhow!("seed failed: {err}"))
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        admin_key: Option<&str>,
    ) -> Result<Response> {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        if let Some(key) = admin_key {
            builder = builder.header("x-admin-key", key);
        }
        let body = body.map(Body::from).unwrap_or_else(Body::empty);
        self.send(builder.body(body)?).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn get(&self, path: &str, admin_key: Option<&str>) -> Result<Response> {
        self.request(Method::GET, path, None, admin_key).await
    }

    #[allow(dead_code)]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        admin_key: Option<&str>,
    ) -> Result<Response> {
        let body = serde_json::to_vec(payload)?;
        self.request(Method::POST, path, Some(body), admin_key).await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        admin_key: Option<&str>,
    ) -> Result<Response> {
        let body = serde_json::to_vec(payload)?;
        self.request(Method::PUT, path, Some(body), admin_key).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str, admin_key: Option<&str>) -> Result<Response> {
        self.request(Method::DELETE, path, None, admin_key).await
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

#[allow(dead_code)]
pub async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = body_to_vec(response.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}
