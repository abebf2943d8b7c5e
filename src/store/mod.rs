use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AssignmentWithClient, Candidate, CandidateReview, Client, Consultant, Invoice,
    InvoiceWithClient, Job, JobChanges, NewCandidate, NewConsultant, NewInvoice, NewJob,
    NewPayroll, Payroll, PayrollWithConsultant,
};

pub mod pg;

pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Tables the seed routine inspects before inserting demo rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedTable {
    Clients,
    Jobs,
    Consultants,
    Invoices,
    Payroll,
}

/// Every statement the HTTP layer and the seed routine issue. Each call is an
/// independent round-trip; nothing here spans a transaction.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Returns the client with this name, creating it when missing.
    async fn resolve_client(&self, name: String) -> StoreResult<Client>;

    /// Inserts a client unless the name already exists.
    async fn ensure_client(&self, name: String) -> StoreResult<()>;

    async fn first_client_id(&self) -> StoreResult<Option<i32>>;

    async fn count(&self, table: SeedTable) -> StoreResult<i64>;

    async fn create_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice>;

    /// Newest first.
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithClient>>;

    async fn find_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithClient>>;

    async fn create_consultant(&self, consultant: NewConsultant) -> StoreResult<Consultant>;

    async fn find_consultant_by_code(&self, code: String) -> StoreResult<Option<Consultant>>;

    async fn create_payroll(&self, payroll: NewPayroll) -> StoreResult<Payroll>;

    /// Newest first.
    async fn list_payrolls(&self) -> StoreResult<Vec<Payroll>>;

    async fn find_payroll(&self, id: i32) -> StoreResult<Option<PayrollWithConsultant>>;

    /// Newest first.
    async fn list_shifts(&self) -> StoreResult<Vec<AssignmentWithClient>>;

    /// Newest first.
    async fn list_jobs(&self) -> StoreResult<Vec<Job>>;

    async fn find_job(&self, id: i32) -> StoreResult<Option<Job>>;

    async fn create_job(&self, job: NewJob) -> StoreResult<Job>;

    async fn update_job(&self, id: i32, changes: JobChanges) -> StoreResult<Option<Job>>;

    /// Returns the number of deleted rows.
    async fn delete_job(&self, id: i32) -> StoreResult<usize>;

    /// Newest first.
    async fn list_candidates(&self, job_id: i32) -> StoreResult<Vec<Candidate>>;

    async fn create_candidate(&self, candidate: NewCandidate) -> StoreResult<Candidate>;

    async fn review_candidate(
        &self,
        id: i32,
        review: CandidateReview,
    ) -> StoreResult<Option<Candidate>>;
}
