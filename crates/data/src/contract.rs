use crate::model::{Contract, ContractParameter};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt::{Display, Formatter};


#[derive(Debug)]
pub enum ContractValueError {
    NotAnObject(&'static str),
    Encode(serde_json::Error),
}


impl Display for ContractValueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractValueError::NotAnObject(kind) => {
                write!(f, "contract value is expected to be a key-value map, but got {}", kind)
            },
            ContractValueError::Encode(err) => {
                write!(f, "failed to encode contract value: {}", err)
            }
        }
    }
}


impl std::error::Error for ContractValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContractValueError::NotAnObject(_) => None,
            ContractValueError::Encode(err) => Some(err)
        }
    }
}


impl ContractParameter {
    /// Encodes the value payload back to JSON text.
    ///
    /// Only key-value maps (or a missing payload, which encodes as `null`)
    /// are accepted.
    pub fn value_json(&self) -> Result<String, ContractValueError> {
        match &self.value {
            JsonValue::Object(_) | JsonValue::Null => {
                serde_json::to_string(&self.value).map_err(ContractValueError::Encode)
            },
            other => Err(ContractValueError::NotAnObject(json_kind(other)))
        }
    }
}


fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}


#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferContract {
    pub owner_address: String,
    pub to_address: String,
    pub amount: i64,
}


#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferAssetContract {
    pub asset_name: String,
    pub owner_address: String,
    pub to_address: String,
    pub amount: i64,
}


#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TriggerSmartContract {
    pub owner_address: String,
    pub contract_address: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub call_value: i64,
}


/// Typed view of a contract payload, selected by the contract type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractValue {
    Transfer(TransferContract),
    TransferAsset(TransferAssetContract),
    TriggerSmartContract(TriggerSmartContract),
    Other(JsonValue),
}


impl ContractValue {
    pub fn owner_address(&self) -> Option<&str> {
        match self {
            ContractValue::Transfer(c) => Some(&c.owner_address),
            ContractValue::TransferAsset(c) => Some(&c.owner_address),
            ContractValue::TriggerSmartContract(c) => Some(&c.owner_address),
            ContractValue::Other(value) => value.get("owner_address").and_then(|v| v.as_str())
        }
    }
}


impl Contract {
    pub fn decode_value(&self) -> serde_json::Result<ContractValue> {
        let value = &self.parameter.value;
        Ok(match self.type_.as_str() {
            "TransferContract" => ContractValue::Transfer(
                TransferContract::deserialize(value)?
            ),
            "TransferAssetContract" => ContractValue::TransferAsset(
                TransferAssetContract::deserialize(value)?
            ),
            "TriggerSmartContract" => ContractValue::TriggerSmartContract(
                TriggerSmartContract::deserialize(value)?
            ),
            _ => ContractValue::Other(value.clone())
        })
    }
}
