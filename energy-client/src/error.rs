use time::Date;
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("a type named '{name}' already exists")]
    DuplicateName { name: String },
    #[error("generator {generator_id} already has a production record for {date}")]
    DuplicatePeriod { generator_id: Uuid, date: Date },
    #[error("referenced {entity} {id} does not exist")]
    ForeignKeyViolation { entity: &'static str, id: Uuid },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("failed to {context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }

    pub fn database(context: &'static str, source: sqlx::Error) -> Self {
        StoreError::Database { context, source }
    }
}

/// Constraint class of a failed statement, as reported by PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Check,
    Other,
}

pub(crate) fn violation(err: &sqlx::Error) -> Violation {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Violation::Unique,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => Violation::ForeignKey,
        sqlx::Error::Database(db) if db.is_check_violation() => Violation::Check,
        _ => Violation::Other,
    }
}

/// Stand-in for a PostgreSQL constraint error, so write-error mapping can be
/// tested without a server.
#[cfg(test)]
pub(crate) mod fake {
    use std::{error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::Violation;

    #[derive(Debug)]
    pub(crate) struct ConstraintError(pub Violation);

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated: {:?}", self.0)
        }
    }

    impl StdError for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                Violation::Unique => ErrorKind::UniqueViolation,
                Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
                Violation::Check => ErrorKind::CheckViolation,
                Violation::Other => ErrorKind::Other,
            }
        }
    }

    pub(crate) fn constraint_error(violation: Violation) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError(violation)))
    }
}
