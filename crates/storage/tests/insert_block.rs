use serde_json::{json, Value};
use tron_storage::db::TableCounts;
use tron_storage::Database;


fn setup_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.init_schema().unwrap();
    db
}


fn payload(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}


fn transfer_block() -> Vec<u8> {
    payload(json!({
        "blockID": "B1",
        "block_header": {
            "raw_data": {
                "number": 100,
                "txTrieRoot": "root",
                "witness_address": "41witness",
                "parentHash": "B0",
                "version": 30,
                "timestamp": 1729330419000i64
            },
            "witness_signature": "wsig"
        },
        "transactions": [{
            "ret": [{"contractRet": "SUCCESS"}],
            "signature": ["sig1"],
            "txID": "T1",
            "raw_data": {
                "contract": [{
                    "parameter": {
                        "value": {"amount": 10, "owner_address": "41a", "to_address": "41b"},
                        "type_url": "type.googleapis.com/protocol.TransferContract"
                    },
                    "type": "TransferContract"
                }],
                "ref_block_bytes": "c1a7",
                "ref_block_hash": "3c9e1f5a7b2d4c6e",
                "expiration": 1729330476000i64,
                "timestamp": 1729330416000i64
            },
            "raw_data_hex": "0a02c1a7"
        }]
    }))
}


#[test]
fn stores_block_transaction_and_contract() -> anyhow::Result<()> {
    let db = setup_db();

    let summary = db.insert_block_json(&transfer_block())?;
    assert_eq!(summary.number, 100);
    assert_eq!(summary.transactions, 1);
    assert_eq!(summary.contracts, 1);
    assert!(summary.new_block);

    let block = db.get_block("B1")?.expect("block B1 is stored");
    assert_eq!(block.block_number, 100);
    assert_eq!(block.tx_trie_root, "root");
    assert_eq!(block.witness_address, "41witness");
    assert_eq!(block.parent_hash, "B0");
    assert_eq!(block.version, 30);
    assert_eq!(block.timestamp, 1729330419000);
    assert_eq!(block.witness_signature, "wsig");

    let tx = db.get_transaction("T1")?.expect("transaction T1 is stored");
    assert_eq!(tx.block_id, "B1");
    assert_eq!(tx.contract_ret, "SUCCESS");
    assert_eq!(tx.signature, "sig1");
    assert_eq!(tx.ref_block_bytes, "c1a7");
    assert_eq!(tx.ref_block_hash, "3c9e1f5a7b2d4c6e");
    assert_eq!(tx.expiration, 1729330476000);
    assert_eq!(tx.timestamp, 1729330416000);
    assert_eq!(tx.raw_data_hex, "0a02c1a7");

    let contracts = db.list_contracts("T1")?;
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].contract_type, "TransferContract");
    assert_eq!(contracts[0].type_url, "type.googleapis.com/protocol.TransferContract");
    assert_eq!(
        contracts[0].contract_value,
        r#"{"amount":10,"owner_address":"41a","to_address":"41b"}"#
    );

    assert_eq!(db.table_counts()?, TableCounts {
        blocks: 1,
        transactions: 1,
        contracts: 1
    });
    Ok(())
}


#[test]
fn reingestion_dedups_blocks_and_transactions_only() -> anyhow::Result<()> {
    let db = setup_db();

    db.insert_block_json(&transfer_block())?;
    let summary = db.insert_block_json(&transfer_block())?;

    assert!(!summary.new_block);
    assert_eq!(summary.new_transactions, 0);
    assert_eq!(summary.contracts, 1);

    assert_eq!(db.table_counts()?, TableCounts {
        blocks: 1,
        transactions: 1,
        contracts: 2
    });
    Ok(())
}


#[test]
fn first_write_wins() -> anyhow::Result<()> {
    let db = setup_db();
    db.insert_block_json(&transfer_block())?;

    db.insert_block_json(&payload(json!({
        "blockID": "B1",
        "block_header": {"raw_data": {"number": 999}},
        "transactions": [{"txID": "T1", "ret": [{"contractRet": "REVERT"}]}]
    })))?;

    assert_eq!(db.get_block("B1")?.unwrap().block_number, 100);
    assert_eq!(db.get_transaction("T1")?.unwrap().contract_ret, "SUCCESS");
    Ok(())
}


#[test]
fn missing_results_and_signatures_are_stored_as_empty() -> anyhow::Result<()> {
    let db = setup_db();

    db.insert_block_json(&payload(json!({
        "blockID": "B2",
        "block_header": {"raw_data": {"number": 101}},
        "transactions": [{"txID": "T2", "ret": [], "signature": []}]
    })))?;

    let tx = db.get_transaction("T2")?.unwrap();
    assert_eq!(tx.contract_ret, "");
    assert_eq!(tx.signature, "");
    Ok(())
}


#[test]
fn null_fields_are_stored_as_empty() -> anyhow::Result<()> {
    let db = setup_db();

    let summary = db.insert_block_json(&payload(json!({
        "blockID": "B3",
        "block_header": {"raw_data": {"number": 102, "txTrieRoot": null}},
        "transactions": [{"txID": "T3", "ret": null, "signature": null}]
    })))?;
    assert!(summary.new_block);

    let block = db.get_block("B3")?.unwrap();
    assert_eq!(block.tx_trie_root, "");

    let tx = db.get_transaction("T3")?.unwrap();
    assert_eq!(tx.contract_ret, "");
    assert_eq!(tx.signature, "");

    db.insert_block_json(&payload(json!({"blockID": "B4", "transactions": null})))?;
    assert!(db.get_block("B4")?.is_some());
    Ok(())
}


#[test]
fn only_first_result_and_signature_are_stored() -> anyhow::Result<()> {
    let db = setup_db();

    db.insert_block_json(&payload(json!({
        "blockID": "B3",
        "block_header": {"raw_data": {"number": 102}},
        "transactions": [{
            "txID": "T3",
            "ret": [{"contractRet": "OUT_OF_ENERGY"}, {"contractRet": "SUCCESS"}],
            "signature": ["first", "second", "third"]
        }]
    })))?;

    let tx = db.get_transaction("T3")?.unwrap();
    assert_eq!(tx.contract_ret, "OUT_OF_ENERGY");
    assert_eq!(tx.signature, "first");
    Ok(())
}


#[test]
fn unserializable_contract_is_skipped() -> anyhow::Result<()> {
    let db = setup_db();

    let summary = db.insert_block_json(&payload(json!({
        "blockID": "B4",
        "block_header": {"raw_data": {"number": 103}},
        "transactions": [{
            "txID": "T4",
            "raw_data": {
                "contract": [
                    {
                        "parameter": {"value": "not a map", "type_url": "bad"},
                        "type": "TransferContract"
                    },
                    {
                        "parameter": {"value": {"owner_address": "41a"}, "type_url": "good"},
                        "type": "AccountUpdateContract"
                    }
                ]
            }
        }]
    })))?;

    assert_eq!(summary.contracts, 1);
    assert_eq!(summary.skipped_contracts, 1);
    assert!(db.get_transaction("T4")?.is_some());

    let contracts = db.list_contracts("T4")?;
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].contract_type, "AccountUpdateContract");
    Ok(())
}


#[test]
fn multiple_contracts_keep_order() -> anyhow::Result<()> {
    let db = setup_db();

    db.insert_block_json(&payload(json!({
        "blockID": "B5",
        "block_header": {"raw_data": {"number": 104}},
        "transactions": [{
            "txID": "T5",
            "raw_data": {
                "contract": [
                    {"parameter": {"value": {"n": 1}}, "type": "FirstContract"},
                    {"parameter": {}, "type": "SecondContract"}
                ]
            }
        }]
    })))?;

    let contracts = db.list_contracts("T5")?;
    let types: Vec<_> = contracts.iter().map(|c| c.contract_type.as_str()).collect();
    assert_eq!(types, ["FirstContract", "SecondContract"]);
    assert_eq!(contracts[1].contract_value, "null");
    assert_eq!(contracts[1].type_url, "");
    Ok(())
}


#[test]
fn block_without_transactions() -> anyhow::Result<()> {
    let db = setup_db();

    let summary = db.insert_block_json(&payload(json!({
        "blockID": "B6",
        "block_header": {"raw_data": {"number": 105}}
    })))?;

    assert_eq!(summary.transactions, 0);
    assert_eq!(db.table_counts()?, TableCounts {
        blocks: 1,
        transactions: 0,
        contracts: 0
    });
    Ok(())
}


#[test]
fn malformed_payload_writes_nothing() {
    let db = setup_db();

    let err = db.insert_block_json(b"<html>502 Bad Gateway</html>").unwrap_err();

    assert!(err.downcast_ref::<serde_json::Error>().is_some());
    assert_eq!(err.to_string(), "failed to parse block JSON");
    assert_eq!(db.table_counts().unwrap(), TableCounts::default());
}


#[test]
fn payload_without_block_id_is_rejected() {
    let db = setup_db();

    let result = db.insert_block_json(b"{}");

    assert!(result.is_err());
    assert_eq!(db.table_counts().unwrap(), TableCounts::default());
}


#[test]
fn last_block_is_the_highest_number() -> anyhow::Result<()> {
    let db = setup_db();
    assert!(db.get_last_block()?.is_none());

    for (id, number) in [("B10", 10), ("B12", 12), ("B11", 11)] {
        db.insert_block_json(&payload(json!({
            "blockID": id,
            "block_header": {"raw_data": {"number": number}}
        })))?;
    }

    assert_eq!(db.get_last_block()?.unwrap().block_id, "B12");
    Ok(())
}
