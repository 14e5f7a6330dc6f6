//! Typed form of the `wallet/getnowblock` response.
//!
//! Every struct is decoded with `#[serde(default)]`: the node omits empty
//! collections (a block without transactions has no `transactions` key at all)
//! and absent scalars are treated as their zero value. An explicit `null` is
//! decoded like a missing field.

use crate::json::null_as_default;
use serde::Deserialize;
use serde_json::Value as JsonValue;


pub type BlockNumber = i64;


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Block {
    #[serde(rename = "blockID", deserialize_with = "null_as_default")]
    pub block_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_header: BlockHeader,
    #[serde(deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
}


impl Block {
    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn number(&self) -> BlockNumber {
        self.block_header.raw_data.number
    }

    pub fn num_contracts(&self) -> usize {
        self.transactions.iter()
            .map(|tx| tx.raw_data.contract.len())
            .sum()
    }
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct BlockHeader {
    #[serde(deserialize_with = "null_as_default")]
    pub raw_data: BlockRawData,
    #[serde(deserialize_with = "null_as_default")]
    pub witness_signature: String,
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct BlockRawData {
    #[serde(deserialize_with = "null_as_default")]
    pub number: BlockNumber,
    #[serde(rename = "txTrieRoot", deserialize_with = "null_as_default")]
    pub tx_trie_root: String,
    #[serde(deserialize_with = "null_as_default")]
    pub witness_address: String,
    #[serde(rename = "parentHash", deserialize_with = "null_as_default")]
    pub parent_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: i64,
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Transaction {
    #[serde(deserialize_with = "null_as_default")]
    pub ret: Vec<TransactionResult>,
    #[serde(deserialize_with = "null_as_default")]
    pub signature: Vec<String>,
    #[serde(rename = "txID", deserialize_with = "null_as_default")]
    pub tx_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raw_data: TransactionRawData,
    #[serde(deserialize_with = "null_as_default")]
    pub raw_data_hex: String,
}


impl Transaction {
    /// Status of the first result entry, empty if the node reported none.
    pub fn contract_ret(&self) -> &str {
        self.ret.first().map_or("", |ret| ret.contract_ret.as_str())
    }

    /// First signature, empty for unsigned transactions.
    pub fn first_signature(&self) -> &str {
        self.signature.first().map_or("", |sig| sig.as_str())
    }
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct TransactionResult {
    #[serde(rename = "contractRet", deserialize_with = "null_as_default")]
    pub contract_ret: String,
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct TransactionRawData {
    #[serde(deserialize_with = "null_as_default")]
    pub contract: Vec<Contract>,
    #[serde(deserialize_with = "null_as_default")]
    pub ref_block_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ref_block_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: i64,
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Contract {
    #[serde(deserialize_with = "null_as_default")]
    pub parameter: ContractParameter,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub type_: String,
}


#[derive(Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct ContractParameter {
    pub value: JsonValue,
    #[serde(deserialize_with = "null_as_default")]
    pub type_url: String,
}
