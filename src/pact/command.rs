use crate::error::{KdnError, Result};
use crate::hosts::ChainId;
use crate::pact::{PactDecimal, PactValue};
use base64::Engine;
use blake2::{digest::consts::U32, Blake2b, Digest};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_GAS_LIMIT: u64 = 2_500;
const DEFAULT_GAS_PRICE: f64 = 1.0e-8;
const DEFAULT_TTL: u64 = 28_800;

/// Public metadata of a Pact command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub chain_id: ChainId,
    pub sender: String,
    pub gas_limit: u64,
    pub gas_price: f64,
    pub ttl: u64,
    /// Seconds since the Unix epoch.
    pub creation_time: i64,
}

impl Meta {
    /// Metadata with the node defaults for everything but the chain.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            sender: String::new(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            ttl: DEFAULT_TTL,
            creation_time: Utc::now().timestamp(),
        }
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn gas(mut self, gas_limit: u64, gas_price: f64) -> Self {
        self.gas_limit = gas_limit;
        self.gas_price = gas_price;
        self
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }
}

/// A capability granted by a signer, e.g. `(coin.TRANSFER "a" "b" 1.0)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Capability {
    pub name: String,
    pub args: Vec<PactValue>,
}

impl Capability {
    pub fn new(name: impl Into<String>, args: Vec<PactValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

// Capability args arrive back from the wire as plain JSON.
impl<'de> Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawCapability {
            name: String,
            #[serde(default)]
            args: Vec<Value>,
        }

        let raw = RawCapability::deserialize(deserializer)?;
        let args = raw
            .args
            .into_iter()
            .map(|arg| match arg {
                Value::String(s) => Ok(PactValue::String(s)),
                Value::Bool(b) => Ok(PactValue::Bool(b)),
                other => {
                    if let Some(int) = other.get("int").and_then(Value::as_i64) {
                        return Ok(PactValue::Integer(int));
                    }
                    PactDecimal::from_value(&other)
                        .map(PactValue::Decimal)
                        .ok_or_else(|| serde::de::Error::custom("unsupported capability argument"))
                }
            })
            .collect::<std::result::Result<Vec<_>, D::Error>>()?;
        Ok(Capability {
            name: raw.name,
            args,
        })
    }
}

/// A key expected to sign the command, scoped to a list of capabilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub pub_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clist: Vec<Capability>,
}

impl Signer {
    /// A signer for `account`. `k:` accounts sign with the key they embed.
    pub fn for_account(account: &str) -> Self {
        let pub_key = account.strip_prefix("k:").unwrap_or(account);
        Self {
            pub_key: pub_key.to_string(),
            clist: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.clist.push(capability);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    pub code: String,
    pub data: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub exec: ExecPayload,
}

/// The decoded contents of [`Command::cmd`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPayload {
    pub payload: Payload,
    pub meta: Meta,
    pub signers: Vec<Signer>,
    pub network_id: String,
    pub nonce: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub sig: String,
}

/// A Pact command as sent to a node.
///
/// `sigs` has one slot per signer; slots stay `None` until an external
/// wallet signs `hash`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub cmd: String,
    pub hash: String,
    pub sigs: Vec<Option<Signature>>,
}

impl Command {
    pub fn payload(&self) -> Result<CommandPayload> {
        serde_json::from_str(&self.cmd)
            .map_err(|e| KdnError::DomainValidation(format!("malformed command payload: {e}")))
    }

    /// Every signer slot carries a signature.
    pub fn is_signed(&self) -> bool {
        self.sigs.iter().all(Option::is_some)
    }

    /// Does `hash` match the Blake2b digest of `cmd`?
    pub fn verify_hash(&self) -> bool {
        hash_command(&self.cmd) == self.hash
    }
}

/// Blake2b-256 of the command string, unpadded base64url.
pub fn hash_command(cmd: &str) -> String {
    let digest = Blake2b::<U32>::digest(cmd.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

/// Builds a [`Command`] for a single Pact execution.
#[derive(Clone, Debug)]
pub struct CommandBuilder {
    code: String,
    data: Value,
    meta: Option<Meta>,
    signers: Vec<Signer>,
    network_id: Option<String>,
    nonce: Option<String>,
}

impl CommandBuilder {
    pub fn execution(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            data: Value::Object(Default::default()),
            meta: None,
            signers: Vec::new(),
            network_id: None,
            nonce: None,
        }
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn signer(mut self, signer: Signer) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn build(self) -> Result<Command> {
        let meta = self
            .meta
            .ok_or_else(|| KdnError::DomainValidation("command is missing metadata".to_string()))?;
        let network_id = self
            .network_id
            .ok_or_else(|| KdnError::DomainValidation("command is missing a network id".to_string()))?;
        let nonce = self
            .nonce
            .unwrap_or_else(|| format!("kjs:nonce:{}", Utc::now().timestamp_millis()));

        let payload = CommandPayload {
            payload: Payload {
                exec: ExecPayload {
                    code: self.code,
                    data: self.data,
                },
            },
            meta,
            signers: self.signers,
            network_id,
            nonce,
        };
        let cmd = serde_json::to_string(&payload)
            .map_err(|e| KdnError::DomainValidation(format!("failed to encode command: {e}")))?;
        let hash = hash_command(&cmd);
        let sigs = vec![None; payload.signers.len()];

        Ok(Command { cmd, hash, sigs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Command {
        CommandBuilder::execution("(coin.details \"k:abc\")")
            .meta(Meta::new(ChainId::from("1")).sender("k:abc").gas(600, 1.0e-6))
            .network_id("testnet04")
            .nonce("fixed")
            .signer(Signer::for_account("k:abc").with_capability(Capability::new("coin.GAS", vec![])))
            .build()
            .unwrap()
    }

    #[test]
    fn builds_payload_and_hash() {
        let command = sample();
        assert!(command.verify_hash());
        assert_eq!(command.sigs, vec![None]);
        assert!(!command.is_signed());

        let payload = command.payload().unwrap();
        assert_eq!(payload.payload.exec.code, "(coin.details \"k:abc\")");
        assert_eq!(payload.payload.exec.data, json!({}));
        assert_eq!(payload.network_id, "testnet04");
        assert_eq!(payload.nonce, "fixed");
        assert_eq!(payload.meta.sender, "k:abc");
        assert_eq!(payload.meta.gas_limit, 600);
        assert_eq!(payload.signers[0].pub_key, "abc");
        assert_eq!(payload.signers[0].clist[0].name, "coin.GAS");
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let command = sample();
        let raw: Value = serde_json::from_str(&command.cmd).unwrap();
        assert_eq!(raw["meta"]["chainId"], json!("1"));
        assert_eq!(raw["meta"]["gasPrice"], json!(0.000001));
        assert_eq!(raw["networkId"], json!("testnet04"));
        assert_eq!(raw["signers"][0]["pubKey"], json!("abc"));
        assert_eq!(raw["signers"][0]["clist"][0]["args"], json!([]));

        let envelope = serde_json::to_value(&command).unwrap();
        assert_eq!(envelope["sigs"], json!([null]));
    }

    #[test]
    fn unsigned_reads_have_no_sig_slots() {
        let command = CommandBuilder::execution("(+ 1 2)")
            .meta(Meta::new(ChainId::from("15")))
            .network_id("mainnet01")
            .build()
            .unwrap();
        assert!(command.sigs.is_empty());
        assert!(command.is_signed());
        let raw: Value = serde_json::from_str(&command.cmd).unwrap();
        assert!(raw["nonce"].as_str().unwrap().starts_with("kjs:nonce:"));
    }

    #[test]
    fn missing_network_is_rejected() {
        let err = CommandBuilder::execution("(+ 1 2)")
            .meta(Meta::new(ChainId::from("15")))
            .build()
            .unwrap_err();
        assert!(matches!(err, KdnError::DomainValidation(_)));
    }

    #[test]
    fn tampered_command_fails_hash_check() {
        let mut command = sample();
        command.cmd = command.cmd.replace("k:abc", "k:xyz");
        assert!(!command.verify_hash());
    }
}
