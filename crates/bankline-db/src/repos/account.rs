//! Account repository

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{Account, AccountStore, DbError, DbResult, NewAccount};

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, account_number, encrypted_password, balance, created_at";

/// PostgreSQL-backed account directory
#[derive(Clone)]
pub struct AccountRepo {
    pool: PgPool,
}

impl AccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepo {
    async fn create(&self, account: NewAccount) -> DbResult<Account> {
        let query = format!(
            r#"
            INSERT INTO account
                (first_name, last_name, account_number, encrypted_password, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );

        let account_number = account.account_number;
        let created = sqlx::query_as::<_, Account>(&query)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.account_number)
            .bind(&account.encrypted_password)
            .bind(account.balance)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e {
                    if db_err.constraint() == Some("account_account_number_key") {
                        return DbError::Duplicate(format!(
                            "Account number {} already exists",
                            account_number
                        ));
                    }
                }
                DbError::Query(e)
            })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = $1");

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_account_number(&self, account_number: i64) -> DbResult<Option<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE account_number = $1");

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(account_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn list(&self) -> DbResult<Vec<Account>> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY id");

        let accounts = sqlx::query_as::<_, Account>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Account with id {} not found", id)));
        }

        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
