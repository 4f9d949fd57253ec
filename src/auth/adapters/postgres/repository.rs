//! `PostgreSQL` repository implementation for one-time-code storage.

use super::{models::OtpCodeRow, schema::otp_codes};
use crate::auth::{
    domain::{CodeDigits, OtpCode, OtpCodeId, PersistedOtpData},
    ports::{OtpRepository, OtpRepositoryError, OtpRepositoryResult},
};
use crate::board::domain::EmailAddress;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by auth adapters.
pub type OtpPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed one-time-code repository.
#[derive(Debug, Clone)]
pub struct PostgresOtpRepository {
    pool: OtpPgPool,
}

impl PostgresOtpRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: OtpPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> OtpRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> OtpRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(OtpRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(OtpRepositoryError::persistence)?
    }
}

#[async_trait]
impl OtpRepository for PostgresOtpRepository {
    async fn store(&self, code: &OtpCode) -> OtpRepositoryResult<()> {
        let row = to_row(code);
        self.run_blocking(move |connection| {
            diesel::insert_into(otp_codes::table)
                .values(&row)
                .execute(connection)
                .map_err(OtpRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_active(
        &self,
        email: &EmailAddress,
        digits: &CodeDigits,
        now: DateTime<Utc>,
    ) -> OtpRepositoryResult<Option<OtpCode>> {
        let address = email.as_ref().to_owned();
        let code = digits.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = otp_codes::table
                .filter(otp_codes::email.eq(&address))
                .filter(otp_codes::digits.eq(&code))
                .filter(otp_codes::consumed.eq(false))
                .filter(otp_codes::expires_at.gt(now))
                .order(otp_codes::created_at.desc())
                .select(OtpCodeRow::as_select())
                .first::<OtpCodeRow>(connection)
                .optional()
                .map_err(OtpRepositoryError::persistence)?;
            row.map(row_to_code).transpose()
        })
        .await
    }

    async fn mark_consumed(&self, id: OtpCodeId) -> OtpRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(otp_codes::table.filter(otp_codes::id.eq(id.into_inner())))
                .set(otp_codes::consumed.eq(true))
                .execute(connection)
                .map_err(OtpRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn to_row(code: &OtpCode) -> OtpCodeRow {
    OtpCodeRow {
        id: code.id().into_inner(),
        email: code.email().as_ref().to_owned(),
        digits: code.digits().as_str().to_owned(),
        created_at: code.created_at(),
        expires_at: code.expires_at(),
        consumed: code.is_consumed(),
    }
}

fn row_to_code(row: OtpCodeRow) -> OtpRepositoryResult<OtpCode> {
    let email = EmailAddress::new(&row.email).map_err(OtpRepositoryError::persistence)?;
    let digits = CodeDigits::parse(&row.digits).map_err(OtpRepositoryError::persistence)?;
    Ok(OtpCode::from_persisted(PersistedOtpData {
        id: OtpCodeId::from_uuid(row.id),
        email,
        digits,
        created_at: row.created_at,
        expires_at: row.expires_at,
        consumed: row.consumed,
    }))
}
