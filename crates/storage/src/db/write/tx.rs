use anyhow::Context;
use rusqlite::{params, Connection, Transaction as SqlTransaction};
use tracing::{debug, warn, Level};
use tron_data::{Block, BlockNumber, Contract, Transaction};


const INSERT_BLOCK: &str = "
    INSERT OR IGNORE INTO blocks (
        block_id, block_number, tx_trie_root, witness_address, parent_hash,
        version, timestamp, witness_signature
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";


const INSERT_TRANSACTION: &str = "
    INSERT OR IGNORE INTO transactions (
        tx_id, block_id, contract_ret, signature, ref_block_bytes,
        ref_block_hash, expiration, timestamp, raw_data_hex
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";


const INSERT_CONTRACT: &str = "
    INSERT INTO contracts (tx_id, contract_type, type_url, contract_value)
    VALUES (?1, ?2, ?3, ?4)";


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub block_id: String,
    pub number: BlockNumber,
    /// Number of transactions in the block payload
    pub transactions: usize,
    /// Transactions that were not stored before
    pub new_transactions: usize,
    /// Contract rows written
    pub contracts: usize,
    pub skipped_contracts: usize,
    /// `false` when the block was already stored by an earlier tick
    pub new_block: bool,
}


/// Write transaction. Dropping it without [`Tx::commit`] rolls everything back.
pub struct Tx<'a> {
    transaction: SqlTransaction<'a>
}


impl <'a> Tx<'a> {
    pub fn new(conn: &'a mut Connection) -> anyhow::Result<Self> {
        let transaction = conn.transaction().context("failed to begin transaction")?;
        Ok(Self {
            transaction
        })
    }

    pub fn commit(self) -> anyhow::Result<()> {
        self.transaction.commit().context("failed to commit transaction")
    }

    pub fn write_block(&self, block: &Block) -> anyhow::Result<BlockSummary> {
        let new_block = self.insert_block(block).with_context(|| {
            format!("failed to insert block {}", block.block_id)
        })?;

        let mut summary = BlockSummary {
            block_id: block.block_id.clone(),
            number: block.number(),
            transactions: block.transactions.len(),
            new_transactions: 0,
            contracts: 0,
            skipped_contracts: 0,
            new_block
        };

        for tx in block.transactions.iter() {
            let inserted = self.insert_transaction(&block.block_id, tx).with_context(|| {
                format!("failed to insert transaction {}", tx.tx_id)
            })?;
            if inserted {
                summary.new_transactions += 1;
            }

            for contract in tx.raw_data.contract.iter() {
                let value = match contract.parameter.value_json() {
                    Ok(value) => value,
                    Err(err) => {
                        warn!(
                            tx_id = %tx.tx_id,
                            contract_type = %contract.type_,
                            error = %err,
                            "failed to serialize contract value, skipping contract"
                        );
                        summary.skipped_contracts += 1;
                        continue
                    }
                };

                if tracing::enabled!(Level::DEBUG) {
                    trace_contract(&tx.tx_id, contract);
                }

                self.insert_contract(&tx.tx_id, contract, &value).with_context(|| {
                    format!("failed to insert contract for transaction {}", tx.tx_id)
                })?;
                summary.contracts += 1;
            }
        }

        Ok(summary)
    }

    fn insert_block(&self, block: &Block) -> rusqlite::Result<bool> {
        let header = &block.block_header;
        let raw = &header.raw_data;
        let inserted = self.transaction.prepare_cached(INSERT_BLOCK)?.execute(params![
            block.block_id,
            raw.number,
            raw.tx_trie_root,
            raw.witness_address,
            raw.parent_hash,
            raw.version,
            raw.timestamp,
            header.witness_signature
        ])?;
        Ok(inserted > 0)
    }

    fn insert_transaction(&self, block_id: &str, tx: &Transaction) -> rusqlite::Result<bool> {
        let raw = &tx.raw_data;
        let inserted = self.transaction.prepare_cached(INSERT_TRANSACTION)?.execute(params![
            tx.tx_id,
            block_id,
            tx.contract_ret(),
            tx.first_signature(),
            raw.ref_block_bytes,
            raw.ref_block_hash,
            raw.expiration,
            raw.timestamp,
            tx.raw_data_hex
        ])?;
        Ok(inserted > 0)
    }

    fn insert_contract(&self, tx_id: &str, contract: &Contract, value: &str) -> rusqlite::Result<()> {
        self.transaction.prepare_cached(INSERT_CONTRACT)?.execute(params![
            tx_id,
            contract.type_,
            contract.parameter.type_url,
            value
        ])?;
        Ok(())
    }
}


fn trace_contract(tx_id: &str, contract: &Contract) {
    match contract.decode_value() {
        Ok(value) => debug!(
            tx_id,
            contract_type = %contract.type_,
            owner_address = value.owner_address().unwrap_or_default(),
            "contract"
        ),
        Err(err) => debug!(
            tx_id,
            contract_type = %contract.type_,
            error = %err,
            "contract value does not match its type"
        )
    }
}
