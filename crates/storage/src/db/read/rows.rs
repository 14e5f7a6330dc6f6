use crate::db::Database;
use anyhow::Context;
use rusqlite::{params, OptionalExtension, Row};
use tron_data::BlockNumber;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub block_id: String,
    pub block_number: BlockNumber,
    pub tx_trie_root: String,
    pub witness_address: String,
    pub parent_hash: String,
    pub version: i32,
    pub timestamp: i64,
    pub witness_signature: String,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub tx_id: String,
    pub block_id: String,
    pub contract_ret: String,
    pub signature: String,
    pub ref_block_bytes: String,
    pub ref_block_hash: String,
    pub expiration: i64,
    pub timestamp: i64,
    pub raw_data_hex: String,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRow {
    pub tx_id: String,
    pub contract_type: String,
    pub type_url: String,
    pub contract_value: String,
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub blocks: u64,
    pub transactions: u64,
    pub contracts: u64,
}


impl BlockRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            block_id: row.get(0)?,
            block_number: row.get(1)?,
            tx_trie_root: row.get(2)?,
            witness_address: row.get(3)?,
            parent_hash: row.get(4)?,
            version: row.get(5)?,
            timestamp: row.get(6)?,
            witness_signature: row.get(7)?,
        })
    }
}


impl Database {
    pub fn get_block(&self, block_id: &str) -> anyhow::Result<Option<BlockRow>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT block_id, block_number, tx_trie_root, witness_address, parent_hash, \
                 version, timestamp, witness_signature \
                 FROM blocks WHERE block_id = ?1",
                params![block_id],
                BlockRow::from_row
            ).optional()
        }).with_context(|| format!("failed to get block {}", block_id))
    }

    /// Block with the highest number stored so far.
    pub fn get_last_block(&self) -> anyhow::Result<Option<BlockRow>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT block_id, block_number, tx_trie_root, witness_address, parent_hash, \
                 version, timestamp, witness_signature \
                 FROM blocks ORDER BY block_number DESC, id DESC LIMIT 1",
                [],
                BlockRow::from_row
            ).optional()
        }).context("failed to get last block")
    }

    pub fn get_transaction(&self, tx_id: &str) -> anyhow::Result<Option<TransactionRow>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT tx_id, block_id, contract_ret, signature, ref_block_bytes, \
                 ref_block_hash, expiration, timestamp, raw_data_hex \
                 FROM transactions WHERE tx_id = ?1",
                params![tx_id],
                |row| Ok(TransactionRow {
                    tx_id: row.get(0)?,
                    block_id: row.get(1)?,
                    contract_ret: row.get(2)?,
                    signature: row.get(3)?,
                    ref_block_bytes: row.get(4)?,
                    ref_block_hash: row.get(5)?,
                    expiration: row.get(6)?,
                    timestamp: row.get(7)?,
                    raw_data_hex: row.get(8)?,
                })
            ).optional()
        }).with_context(|| format!("failed to get transaction {}", tx_id))
    }

    /// Contracts of a transaction in insertion order.
    pub fn list_contracts(&self, tx_id: &str) -> anyhow::Result<Vec<ContractRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT tx_id, contract_type, type_url, contract_value \
                 FROM contracts WHERE tx_id = ?1 ORDER BY id"
            )?;
            let rows = stmt.query_map(params![tx_id], |row| {
                Ok(ContractRow {
                    tx_id: row.get(0)?,
                    contract_type: row.get(1)?,
                    type_url: row.get(2)?,
                    contract_value: row.get(3)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        }).with_context(|| format!("failed to list contracts of transaction {}", tx_id))
    }

    pub fn table_counts(&self) -> anyhow::Result<TableCounts> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT \
                 (SELECT COUNT(*) FROM blocks), \
                 (SELECT COUNT(*) FROM transactions), \
                 (SELECT COUNT(*) FROM contracts)",
                [],
                |row| Ok(TableCounts {
                    blocks: row.get::<_, i64>(0)? as u64,
                    transactions: row.get::<_, i64>(1)? as u64,
                    contracts: row.get::<_, i64>(2)? as u64,
                })
            )
        }).context("failed to count table rows")
    }
}
