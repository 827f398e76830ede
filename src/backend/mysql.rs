use log::debug;
use mysql_async::prelude::*;
use mysql_async::{Conn, Opts, OptsBuilder, Pool, TxOpts};
use tokio::runtime::{Builder, Runtime};

use crate::backend::Backend;
use crate::backend::sql::{self, Statements, UpsertStyle};
use crate::conf::MySqlConfig;
use crate::core::{BenchError, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlVariant {
    /// `INSERT ... ON DUPLICATE KEY UPDATE`.
    Upsert,
    /// `REPLACE INTO`.
    Replace,
}

impl MySqlVariant {
    fn name(self) -> &'static str {
        match self {
            MySqlVariant::Upsert => "MySQL",
            MySqlVariant::Replace => "MySQL REPLACE",
        }
    }

    fn style(self) -> UpsertStyle {
        match self {
            MySqlVariant::Upsert => UpsertStyle::OnDuplicateKey,
            MySqlVariant::Replace => UpsertStyle::Replace,
        }
    }
}

/// MySQL server backend. Owns a current-thread runtime and blocks on it,
/// so the engine sees ordinary synchronous calls. Every store commits
/// once.
pub struct MySqlBackend {
    variant: MySqlVariant,
    runtime: Runtime,
    server: OptsBuilder,
    database: String,
    statements: Statements,
    pool: Option<Pool>,
}

impl MySqlBackend {
    pub fn new(variant: MySqlVariant, config: &MySqlConfig) -> Result<Self, BenchError> {
        let (user, pass) = config.credentials()?;
        let server = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(user))
            .pass(Some(pass));
        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(Self {
            variant,
            runtime,
            server,
            database: config.database.clone(),
            statements: Statements::new(&config.table, variant.style()),
            pool: None,
        })
    }

    fn pool(&self) -> Result<&Pool, BenchError> {
        self.pool.as_ref().ok_or_else(|| {
            BenchError::SqlError(format!("{} used before setup", self.variant.name()))
        })
    }
}

async fn upsert(pool: &Pool, statement: &str, batch: &[Record]) -> Result<(), BenchError> {
    let params: Vec<_> = sql::rows(batch)?
        .into_iter()
        .map(|row| (row.key.to_string(), row.int, row.double, row.float, row.long))
        .collect();

    let mut conn = pool.get_conn().await?;
    let mut tx = conn.start_transaction(TxOpts::default()).await?;
    tx.exec_batch(statement, params).await?;
    tx.commit().await?;
    Ok(())
}

impl Backend for MySqlBackend {
    fn name(&self) -> &str {
        self.variant.name()
    }

    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError> {
        let pool = self.runtime.block_on(async {
            let server: Opts = self.server.clone().into();
            let mut conn = Conn::new(server).await?;
            conn.query_drop(format!("CREATE DATABASE IF NOT EXISTS `{}`", self.database))
                .await?;
            conn.disconnect().await?;

            let pool = Pool::new(self.server.clone().db_name(Some(self.database.as_str())));
            let mut conn = pool.get_conn().await?;
            conn.query_drop(self.statements.create_table.as_str()).await?;
            drop(conn);

            upsert(&pool, &self.statements.upsert, baseline).await?;
            Ok::<_, BenchError>(pool)
        })?;
        debug!(
            "{}: loaded {} baseline rows into `{}`",
            self.name(),
            baseline.len(),
            self.database
        );
        self.pool = Some(pool);
        Ok(())
    }

    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        let pool = self.pool()?;
        self.runtime
            .block_on(upsert(pool, &self.statements.upsert, batch))
    }

    fn query(&mut self, sample: &Record) -> Result<bool, BenchError> {
        let key = sample.get::<&str>(0)?.to_string();
        let pool = self.pool()?;
        self.runtime.block_on(async {
            let mut conn = pool.get_conn().await?;
            let row: Option<mysql_async::Row> = conn
                .exec_first(self.statements.select.as_str(), (key,))
                .await?;
            Ok::<_, BenchError>(row.is_some())
        })
    }

    fn count(&mut self) -> Result<usize, BenchError> {
        let pool = self.pool()?;
        self.runtime.block_on(async {
            let mut conn = pool.get_conn().await?;
            let count: Option<i64> = conn.query_first(self.statements.count.as_str()).await?;
            Ok::<_, BenchError>(count.unwrap_or(0) as usize)
        })
    }

    fn cleanup(&mut self) -> Result<(), BenchError> {
        let pool = self.pool.take().ok_or_else(|| {
            BenchError::SqlError(format!("{} cleaned up before setup", self.variant.name()))
        })?;
        self.runtime.block_on(async {
            let mut conn = pool.get_conn().await?;
            conn.query_drop(self.statements.drop_table.as_str()).await?;
            drop(conn);
            pool.disconnect().await?;
            Ok::<_, BenchError>(())
        })
    }
}
