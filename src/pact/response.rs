use crate::error::{KdnError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of executing a command on a node, as returned by `/local`.
///
/// `result` is kept as raw JSON; only [`parse_chain_response`] interprets it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    #[serde(default)]
    pub req_key: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub gas: Option<u64>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub meta_data: Option<Value>,
    #[serde(default)]
    pub continuation: Option<Value>,
    #[serde(default)]
    pub tx_id: Option<Value>,
}

/// Interpret a command result.
///
/// - `{"status": "success", "data": ..}` yields `data` as `T`
/// - `{"status": "failure", "error": ..}` is a [`KdnError::ChainFailure`]
///   carrying `subject` and the serialized error
/// - anything else is a [`KdnError::UnknownOutcome`]
pub fn parse_chain_response<T: DeserializeOwned>(response: &CommandResult, subject: &str) -> Result<T> {
    let result = response.result.as_ref().and_then(Value::as_object);
    let status = result.and_then(|r| r.get("status")).and_then(Value::as_str);

    match (result, status) {
        (Some(result), Some("success")) => {
            let data = result.get("data").cloned().unwrap_or(Value::Null);
            serde_json::from_value(data).map_err(|e| {
                KdnError::DomainValidation(format!("Failed to retrieve {subject}: unexpected data: {e}"))
            })
        }
        (Some(result), Some("failure")) => {
            let error = result.get("error").cloned().unwrap_or(Value::Null);
            Err(KdnError::ChainFailure {
                subject: subject.to_string(),
                error: error.to_string(),
            })
        }
        _ => Err(KdnError::UnknownOutcome {
            subject: subject.to_string(),
        }),
    }
}
