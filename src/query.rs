//! Read-only registry queries, executed as `/local` simulations.

use crate::client::ChainClient;
use crate::error::{KdnError, Result};
use crate::hosts::NetworkEndpoint;
use crate::names::ensure_kda_extension;
use crate::pact::{parse_chain_response, CommandBuilder, Meta, PactDecimal};
use crate::registry::{RegistrationPeriod, RegistryCall};
use crate::sdk::KadenaNames;
use crate::types::{RawNameInfo, SaleState};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

const READ_GAS_LIMIT: u64 = 100_000;
const READ_GAS_PRICE: f64 = 0.001;
const READ_TTL: u64 = 600;

const PRICE_GAS_LIMIT: u64 = 600;
const PRICE_GAS_PRICE: f64 = 1.0e-6;
const PRICE_TTL: u64 = 28_800;

/// A sale-state row as the registry returns it; `price` is absent when the
/// name has no sale record.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SaleStateRow {
    pub sellable: bool,
    pub price: Option<PactDecimal>,
}

impl SaleStateRow {
    /// A null row means no sale record. Any other shape must carry a boolean
    /// `sellable` and, if present, a numeric `price`.
    fn from_value(value: &Value) -> Result<Self> {
        let malformed = || KdnError::DomainValidation("Sale state parsing failed".to_string());
        if value.is_null() {
            return Ok(Self::default());
        }

        let sellable = value
            .get("sellable")
            .and_then(Value::as_bool)
            .ok_or_else(malformed)?;
        let price = match value.get("price") {
            None | Some(Value::Null) => None,
            Some(price) => Some(PactDecimal::from_value(price).ok_or_else(malformed)?),
        };
        Ok(Self { sellable, price })
    }
}

impl From<SaleStateRow> for SaleState {
    fn from(row: SaleStateRow) -> Self {
        SaleState {
            sellable: row.sellable,
            price: row.price.map_or(0.0, |price| price.value()),
        }
    }
}

fn read_meta(endpoint: &NetworkEndpoint) -> Meta {
    Meta::new(endpoint.chain_id.clone())
        .gas(READ_GAS_LIMIT, READ_GAS_PRICE)
        .ttl(READ_TTL)
}

impl<C: ChainClient> KadenaNames<C> {
    /// Run `call` against the registry without committing, and parse the
    /// outcome as `T`.
    pub(crate) async fn dirty_read<T: DeserializeOwned>(
        &self,
        endpoint: &NetworkEndpoint,
        call: RegistryCall,
        meta: Meta,
        subject: &str,
    ) -> Result<T> {
        let module = self.config.registry()?.module_for(&endpoint.network_id);
        let command = CommandBuilder::execution(call.code(module))
            .meta(meta)
            .network_id(endpoint.network_id.as_str())
            .build()?;

        debug!(
            network_id = %endpoint.network_id,
            chain_id = %endpoint.chain_id,
            function = call.function_name(),
            "registry dirty read"
        );

        let response = self.client.local(&endpoint.host_url, &command).await?;
        parse_chain_response(&response, subject)
    }

    async fn resolve(
        &self,
        call: RegistryCall,
        identifier: &str,
        network_id: &str,
        subject: &'static str,
    ) -> Result<Option<String>> {
        let endpoint = self.endpoint(network_id)?;
        let meta = Meta::new(endpoint.chain_id.clone());

        match self.dirty_read::<Option<String>>(&endpoint, call, meta, subject).await {
            Ok(resolved) => Ok(resolved.filter(|value| !value.is_empty())),
            Err(source) => {
                warn!(identifier, network_id, error = %source, "failed to resolve {}", subject);
                Err(KdnError::Resolution {
                    subject,
                    identifier: identifier.to_string(),
                    source: Box::new(source),
                })
            }
        }
    }

    /// Resolve a name to the address it points at.
    ///
    /// `Ok(None)` means the registry answered but holds no address.
    pub async fn name_to_address(&self, name: &str, network_id: &str) -> Result<Option<String>> {
        let call = RegistryCall::GetAddress {
            name: ensure_kda_extension(name.trim()),
        };
        self.resolve(call, name, network_id, "address").await
    }

    /// Resolve an address to its primary name.
    pub async fn address_to_name(&self, address: &str, network_id: &str) -> Result<Option<String>> {
        let call = RegistryCall::GetName {
            address: address.trim().to_string(),
        };
        self.resolve(call, address, network_id, "name").await
    }

    pub(crate) async fn query_sale_state(
        &self,
        endpoint: &NetworkEndpoint,
        formatted_name: &str,
    ) -> Result<SaleStateRow> {
        let call = RegistryCall::GetSaleState {
            name: formatted_name.to_string(),
        };
        self.dirty_read::<Value>(endpoint, call, read_meta(endpoint), "sale state")
            .await
            .and_then(|value| SaleStateRow::from_value(&value))
            .map_err(|e| {
                warn!(name = formatted_name, error = %e, "error in fetch_sale_state");
                KdnError::query("fetch sale state", e)
            })
    }

    /// Current sale state of `name`. A name with no sale record is not
    /// sellable and priced at zero.
    pub async fn fetch_sale_state(&self, name: &str, network_id: &str) -> Result<SaleState> {
        let endpoint = self.endpoint(network_id)?;
        let row = self
            .query_sale_state(&endpoint, &ensure_kda_extension(name))
            .await?;
        Ok(row.into())
    }

    pub(crate) async fn query_name_info(
        &self,
        endpoint: &NetworkEndpoint,
        formatted_name: &str,
        owner: &str,
    ) -> Result<RawNameInfo> {
        let call = RegistryCall::GetNameInfo {
            name: formatted_name.to_string(),
        };
        let row: Option<RawNameInfo> = self
            .dirty_read(endpoint, call, read_meta(endpoint).sender(owner), "name info")
            .await
            .map_err(|e| {
                warn!(name = formatted_name, error = %e, "error in fetch_name_info");
                KdnError::query("fetch name information", e)
            })?;
        Ok(row.unwrap_or_default())
    }

    pub(crate) async fn query_price(
        &self,
        endpoint: &NetworkEndpoint,
        period: RegistrationPeriod,
        owner: &str,
    ) -> Result<PactDecimal> {
        let call = RegistryCall::GetPrice { days: period.days() };
        let meta = Meta::new(endpoint.chain_id.clone())
            .sender(owner)
            .gas(PRICE_GAS_LIMIT, PRICE_GAS_PRICE)
            .ttl(PRICE_TTL);

        let price = self
            .dirty_read::<Value>(endpoint, call, meta, "price")
            .await
            .and_then(|value| {
                PactDecimal::from_value(&value)
                    .ok_or_else(|| KdnError::DomainValidation("Price parsing failed".to_string()))
            });

        price.map_err(|e| {
            warn!(days = period.days(), error = %e, "error in fetch_price_by_period");
            KdnError::query("fetch price by period", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sale_state_rows() {
        let row = SaleStateRow::from_value(&json!({ "sellable": true, "price": 12.5 })).unwrap();
        assert_eq!(row, SaleStateRow { sellable: true, price: Some(12.5.into()) });

        let row = SaleStateRow::from_value(&json!({ "sellable": false, "price": { "decimal": "3.0" } }))
            .unwrap();
        assert_eq!(row.price.map(|p| p.value()), Some(3.0));

        let row = SaleStateRow::from_value(&json!({ "sellable": false })).unwrap();
        assert_eq!(row.price, None);

        let state: SaleState = SaleStateRow::from_value(&Value::Null).unwrap().into();
        assert_eq!(state, SaleState { sellable: false, price: 0.0 });
    }

    #[test]
    fn malformed_sale_state_is_rejected() {
        for value in [
            json!("garbage"),
            json!([true, 5]),
            json!({ "price": 5.0 }),
            json!({ "sellable": "yes", "price": 5.0 }),
            json!({ "sellable": true, "price": "five" }),
        ] {
            let err = SaleStateRow::from_value(&value).unwrap_err();
            assert_eq!(err.to_string(), "Sale state parsing failed");
        }
    }
}
