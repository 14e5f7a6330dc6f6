use anyhow::Context;
use rusqlite::Connection;


const BLOCKS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS blocks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        block_id TEXT UNIQUE NOT NULL,
        block_number INTEGER NOT NULL,
        tx_trie_root TEXT,
        witness_address TEXT,
        parent_hash TEXT,
        version INTEGER,
        timestamp INTEGER,
        witness_signature TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )";


const TRANSACTIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tx_id TEXT UNIQUE NOT NULL,
        block_id TEXT NOT NULL,
        contract_ret TEXT,
        signature TEXT,
        ref_block_bytes TEXT,
        ref_block_hash TEXT,
        expiration INTEGER,
        timestamp INTEGER,
        raw_data_hex TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (block_id) REFERENCES blocks(block_id)
    )";


// contract_value holds the JSON payload as text
const CONTRACTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS contracts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tx_id TEXT NOT NULL,
        contract_type TEXT,
        type_url TEXT,
        contract_value TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (tx_id) REFERENCES transactions(tx_id)
    )";


pub(super) fn create_tables(conn: &Connection) -> anyhow::Result<()> {
    for (name, ddl) in [
        ("blocks", BLOCKS_TABLE),
        ("transactions", TRANSACTIONS_TABLE),
        ("contracts", CONTRACTS_TABLE)
    ] {
        conn.execute(ddl, []).with_context(|| {
            format!("failed to create {} table", name)
        })?;
    }
    Ok(())
}
