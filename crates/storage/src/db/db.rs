use crate::db::schema::create_tables;
use crate::db::write::{BlockSummary, Tx};
use anyhow::{ensure, Context};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tron_data::Block;
use tracing::info;


pub type DBRef = Arc<Database>;


/// SQLite database holding ingested blocks, transactions and contracts.
///
/// There is a single connection. All writes go through it one at a time.
pub struct Database {
    conn: Mutex<Connection>
}


impl Database {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).with_context(|| {
            format!("failed to open database at {}", path.display())
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .context("failed to enable foreign keys")?;
        let db = Self {
            conn: Mutex::new(conn)
        };
        db.ping()?;
        Ok(db)
    }

    pub fn ping(&self) -> anyhow::Result<()> {
        let one: i64 = self.conn.lock()
            .query_row("SELECT 1", [], |row| row.get(0))
            .context("failed to ping database")?;
        ensure!(one == 1, "database ping returned {}", one);
        Ok(())
    }

    /// Creates missing tables. Safe to call on every start.
    pub fn init_schema(&self) -> anyhow::Result<()> {
        create_tables(&self.conn.lock())
    }

    /// Parses a `getnowblock` response and stores it.
    ///
    /// Nothing is written when the payload can not be parsed.
    pub fn insert_block_json(&self, bytes: &[u8]) -> anyhow::Result<BlockSummary> {
        let block = Block::from_json_bytes(bytes).context("failed to parse block JSON")?;
        self.insert_block(&block)
    }

    /// Stores the block with all its transactions and contracts in one
    /// transaction.
    ///
    /// Blocks and transactions that are already stored are left as they are,
    /// contracts are appended.
    pub fn insert_block(&self, block: &Block) -> anyhow::Result<BlockSummary> {
        ensure!(!block.block_id.is_empty(), "block {} has no block id", block.number());

        let mut conn = self.conn.lock();
        let tx = Tx::new(&mut conn)?;
        let summary = tx.write_block(block)?;
        tx.commit()?;

        info!(
            block_id = %summary.block_id,
            new_block = summary.new_block,
            contracts = summary.contracts,
            skipped_contracts = summary.skipped_contracts,
            "saved block {} with {} transactions",
            summary.number,
            summary.transactions
        );

        Ok(summary)
    }

    pub(super) fn with_connection<R>(&self, cb: impl FnOnce(&Connection) -> R) -> R {
        cb(&self.conn.lock())
    }
}
