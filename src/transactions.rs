//! Unsigned registry transactions.

use crate::client::ChainClient;
use crate::error::{KdnError, Result};
use crate::hosts::chain_id_for_network;
use crate::names::ensure_kda_extension;
use crate::pact::{Command, CommandBuilder, Meta, PactDecimal, Signer};
use crate::registry::{register_capabilities, RegistrationPeriod, RegistryCall};
use crate::sdk::KadenaNames;
use tracing::{debug, info};

const ADMIN_GAS_LIMIT: u64 = 100_000;
const ADMIN_GAS_PRICE: f64 = 0.001;
const ADMIN_TTL: u64 = 600;

/// The price a registration is charged.
///
/// A positive current price that differs from the list price for the period
/// takes precedence; otherwise the list price applies.
pub fn reconcile_price(current: f64, stored: f64) -> f64 {
    if prefers_current(current, stored) {
        current
    } else {
        stored
    }
}

fn prefers_current(current: f64, stored: f64) -> bool {
    current > 0.0 && current != stored
}

impl<C: ChainClient> KadenaNames<C> {
    /// Look up the current and list prices of `name`, then build an unsigned
    /// registration for it.
    ///
    /// `owner` pays and owns the name, `address` is what it resolves to and
    /// `account` signs.
    pub async fn prepare_register_name_transaction(
        &self,
        owner: &str,
        address: &str,
        name: &str,
        period: RegistrationPeriod,
        network_id: &str,
        account: &str,
    ) -> Result<Command> {
        let (info, current) = self
            .name_info_with_sale_price(name, network_id, owner)
            .await
            .map_err(|e| KdnError::context(format!("Failed to fetch name info for \"{name}\""), e))?;

        let stored = match self.endpoint(network_id) {
            Ok(endpoint) => self.query_price(&endpoint, period, owner).await,
            Err(e) => Err(e),
        }
        .map_err(|e| KdnError::context(format!("Failed to fetch price for period {}", period.years()), e))?;

        let price = if prefers_current(current.value(), stored.value()) {
            current
        } else {
            stored
        };
        debug!(name, current = info.price, price = %price, "reconciled registration price");

        self.register_transaction(owner, address, name, period.days(), price, network_id, account)
    }

    /// Build an unsigned registration at a known `price`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_register_name_transaction(
        &self,
        owner: &str,
        address: &str,
        name: &str,
        days: i64,
        price: f64,
        network_id: &str,
        account: &str,
    ) -> Result<Command> {
        self.register_transaction(owner, address, name, days, price.into(), network_id, account)
    }

    #[allow(clippy::too_many_arguments)]
    fn register_transaction(
        &self,
        owner: &str,
        address: &str,
        name: &str,
        days: i64,
        price: PactDecimal,
        network_id: &str,
        account: &str,
    ) -> Result<Command> {
        let registry = self.config.registry()?;
        let module = registry.module_for(network_id);
        let call = RegistryCall::Register {
            owner: owner.to_string(),
            address: address.to_string(),
            name: ensure_kda_extension(name),
            days,
            affiliate: String::new(),
        };

        let signer = register_capabilities(module, &registry.vault, owner, price)
            .into_iter()
            .fold(Signer::for_account(account), Signer::with_capability);

        let command = CommandBuilder::execution(call.code(module))
            .meta(Meta::new(chain_id_for_network(network_id)).sender(owner))
            .signer(signer)
            .network_id(network_id)
            .build()?;

        info!(name, network_id, hash = %command.hash, "prepared register transaction");
        Ok(command)
    }

    /// Build an unsigned `add-affiliate` call, to be signed by `admin_key`.
    pub fn prepare_add_affiliate_transaction(
        &self,
        affiliate_name: &str,
        fee_address: &str,
        fee: f64,
        admin_key: &str,
        network_id: &str,
    ) -> Result<Command> {
        let call = RegistryCall::AddAffiliate {
            affiliate_name: affiliate_name.to_string(),
            fee_address: fee_address.to_string(),
            fee,
        };
        let module = self.config.registry()?.module_for(network_id);
        let meta = Meta::new(chain_id_for_network(network_id))
            .sender(admin_key)
            .gas(ADMIN_GAS_LIMIT, ADMIN_GAS_PRICE)
            .ttl(ADMIN_TTL);

        let command = CommandBuilder::execution(call.code(module))
            .meta(meta)
            .network_id(network_id)
            .build()?;

        info!(affiliate_name, network_id, hash = %command.hash, "prepared add-affiliate transaction");
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconciliation() {
        assert_eq!(reconcile_price(5.0, 5.0), 5.0);
        assert_eq!(reconcile_price(7.0, 5.0), 7.0);
        assert_eq!(reconcile_price(0.0, 5.0), 5.0);
        assert_eq!(reconcile_price(-1.0, 5.0), 5.0);
        assert_eq!(reconcile_price(3.0, 5.0), 3.0);
    }
}
