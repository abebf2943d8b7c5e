use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Jsonb, Nullable, Text};
use diesel::upsert::excluded;

use crate::db::PgPool;
use crate::models::{
    Assignment, AssignmentWithClient, Candidate, CandidateReview, Client, Consultant, Invoice,
    InvoiceWithClient, Job, JobChanges, NewCandidate, NewConsultant, NewInvoice, NewJob,
    NewPayroll, Payroll, PayrollWithConsultant,
};
use crate::schema::{assignments, candidates, clients, consultants, invoices, jobs, payroll};

use super::{SeedTable, Store, StoreError, StoreResult};

const INSERT_INVOICE: &str = "INSERT INTO invoices (client_id, amount, type, payload) \
     VALUES ($1, CAST($2 AS numeric), $3, $4) RETURNING id";

#[derive(QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = Integer)]
    id: i32,
}

/// PostgreSQL-backed store. Diesel is synchronous, so every statement runs on
/// the blocking pool with its own pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn).map_err(StoreError::from)
        })
        .await?
    }
}

#[async_trait]
impl Store for PgStore {
    async fn resolve_client(&self, name: String) -> StoreResult<Client> {
        self.with_conn(move |conn| {
            diesel::insert_into(clients::table)
                .values(clients::name.eq(&name))
                .on_conflict(clients::name)
                .do_update()
                .set(clients::name.eq(excluded(clients::name)))
                .get_result(conn)
        })
        .await
    }

    async fn ensure_client(&self, name: String) -> StoreResult<()> {
        self.with_conn(move |conn| {
            diesel::insert_into(clients::table)
                .values(clients::name.eq(&name))
                .on_conflict_do_nothing()
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn first_client_id(&self) -> StoreResult<Option<i32>> {
        self.with_conn(|conn| {
            clients::table
                .select(clients::id)
                .order(clients::id.asc())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn count(&self, table: SeedTable) -> StoreResult<i64> {
        self.with_conn(move |conn| match table {
            SeedTable::Clients => clients::table.count().get_result(conn),
            SeedTable::Jobs => jobs::table.count().get_result(conn),
            SeedTable::Consultants => consultants::table.count().get_result(conn),
            SeedTable::Invoices => invoices::table.count().get_result(conn),
            SeedTable::Payroll => payroll::table.count().get_result(conn),
        })
        .await
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        self.with_conn(move |conn| {
            // The amount goes over the wire as text; the cast decides whether it is a number.
            let inserted: InsertedId = diesel::sql_query(INSERT_INVOICE)
                .bind::<Nullable<Integer>, _>(invoice.client_id)
                .bind::<Nullable<Text>, _>(invoice.amount)
                .bind::<Text, _>(invoice.kind)
                .bind::<Nullable<Jsonb>, _>(invoice.payload)
                .get_result(conn)?;
            invoices::table.find(inserted.id).first::<Invoice>(conn)
        })
        .await
    }

    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceWithClient>> {
        let rows: Vec<(Invoice, Option<String>)> = self
            .with_conn(|conn| {
                invoices::table
                    .left_join(clients::table)
                    .select((invoices::all_columns, clients::name.nullable()))
                    .order(invoices::id.desc())
                    .load(conn)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(invoice, client)| InvoiceWithClient { invoice, client })
            .collect())
    }

    async fn find_invoice(&self, id: i32) -> StoreResult<Option<InvoiceWithClient>> {
        let row: Option<(Invoice, Option<String>)> = self
            .with_conn(move |conn| {
                invoices::table
                    .left_join(clients::table)
                    .filter(invoices::id.eq(id))
                    .select((invoices::all_columns, clients::name.nullable()))
                    .first(conn)
                    .optional()
            })
            .await?;

        Ok(row.map(|(invoice, client)| InvoiceWithClient { invoice, client }))
    }

    async fn create_consultant(&self, consultant: NewConsultant) -> StoreResult<Consultant> {
        self.with_conn(move |conn| {
            diesel::insert_into(consultants::table)
                .values(&consultant)
                .get_result(conn)
        })
        .await
    }

    async fn find_consultant_by_code(&self, code: String) -> StoreResult<Option<Consultant>> {
        self.with_conn(move |conn| {
            consultants::table
                .filter(consultants::code.eq(&code))
                .first(conn)
                .optional()
        })
        .await
    }

    async fn create_payroll(&self, new_payroll: NewPayroll) -> StoreResult<Payroll> {
        self.with_conn(move |conn| {
            diesel::insert_into(payroll::table)
                .values(&new_payroll)
                .get_result(conn)
        })
        .await
    }

    async fn list_payrolls(&self) -> StoreResult<Vec<Payroll>> {
        self.with_conn(|conn| payroll::table.order(payroll::id.desc()).load(conn))
            .await
    }

    async fn find_payroll(&self, id: i32) -> StoreResult<Option<PayrollWithConsultant>> {
        let row: Option<(Payroll, Option<String>)> = self
            .with_conn(move |conn| {
                payroll::table
                    .left_join(consultants::table)
                    .filter(payroll::id.eq(id))
                    .select((payroll::all_columns, consultants::name.nullable()))
                    .first(conn)
                    .optional()
            })
            .await?;

        Ok(row.map(|(payroll, consultant)| PayrollWithConsultant {
            payroll,
            consultant,
        }))
    }

    async fn list_shifts(&self) -> StoreResult<Vec<AssignmentWithClient>> {
        let rows: Vec<(Assignment, Option<String>)> = self
            .with_conn(|conn| {
                assignments::table
                    .left_join(clients::table)
                    .select((assignments::all_columns, clients::name.nullable()))
                    .order(assignments::id.desc())
                    .load(conn)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(assignment, client)| AssignmentWithClient { assignment, client })
            .collect())
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        self.with_conn(|conn| jobs::table.order(jobs::id.desc()).load(conn))
            .await
    }

    async fn find_job(&self, id: i32) -> StoreResult<Option<Job>> {
        self.with_conn(move |conn| jobs::table.find(id).first(conn).optional())
            .await
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        self.with_conn(move |conn| diesel::insert_into(jobs::table).values(&job).get_result(conn))
            .await
    }

    async fn update_job(&self, id: i32, changes: JobChanges) -> StoreResult<Option<Job>> {
        self.with_conn(move |conn| {
            diesel::update(jobs::table.find(id))
                .set(&changes)
                .get_result(conn)
                .optional()
        })
        .await
    }

    async fn delete_job(&self, id: i32) -> StoreResult<usize> {
        self.with_conn(move |conn| diesel::delete(jobs::table.find(id)).execute(conn))
            .await
    }

    async fn list_candidates(&self, job_id: i32) -> StoreResult<Vec<Candidate>> {
        self.with_conn(move |conn| {
            candidates::table
                .filter(candidates::job_id.eq(job_id))
                .order(candidates::id.desc())
                .load(conn)
        })
        .await
    }

    async fn create_candidate(&self, candidate: NewCandidate) -> StoreResult<Candidate> {
        self.with_conn(move |conn| {
            diesel::insert_into(candidates::table)
                .values(&candidate)
                .get_result(conn)
        })
        .await
    }

    async fn review_candidate(
        &self,
        id: i32,
        review: CandidateReview,
    ) -> StoreResult<Option<Candidate>> {
        self.with_conn(move |conn| {
            diesel::update(candidates::table.find(id))
                .set(&review)
                .get_result(conn)
                .optional()
        })
        .await
    }
}
