//! The Kadena Names registry contract: where it lives and what it exposes.

use crate::error::KdnError;
use crate::hosts::is_testnet;
use crate::pact::{function_call, Capability, PactDecimal, PactValue};
use serde::{Deserialize, Serialize};

/// Where the registry is deployed on each network family, and the account
/// receiving registration fees.
///
/// There is no default: every transfer capability pays `vault`, so the
/// identifiers always come from the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub mainnet_module: String,
    pub testnet_module: String,
    pub vault: String,
}

impl RegistryConfig {
    pub fn new(
        mainnet_module: impl Into<String>,
        testnet_module: impl Into<String>,
        vault: impl Into<String>,
    ) -> Self {
        Self {
            mainnet_module: mainnet_module.into(),
            testnet_module: testnet_module.into(),
            vault: vault.into(),
        }
    }

    /// The registry module serving `network_id`.
    pub fn module_for(&self, network_id: &str) -> &str {
        if is_testnet(network_id) {
            &self.testnet_module
        } else {
            &self.mainnet_module
        }
    }
}

/// How long a name is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationPeriod {
    OneYear,
    TwoYears,
}

impl RegistrationPeriod {
    pub const ALL: [RegistrationPeriod; 2] = [RegistrationPeriod::OneYear, RegistrationPeriod::TwoYears];

    pub fn days(&self) -> i64 {
        match self {
            RegistrationPeriod::OneYear => 365,
            RegistrationPeriod::TwoYears => 730,
        }
    }

    pub fn years(&self) -> u8 {
        match self {
            RegistrationPeriod::OneYear => 1,
            RegistrationPeriod::TwoYears => 2,
        }
    }
}

impl TryFrom<u8> for RegistrationPeriod {
    type Error = KdnError;

    fn try_from(years: u8) -> Result<Self, Self::Error> {
        match years {
            1 => Ok(RegistrationPeriod::OneYear),
            2 => Ok(RegistrationPeriod::TwoYears),
            other => Err(KdnError::DomainValidation(format!(
                "Unsupported registration period: {other}"
            ))),
        }
    }
}

/// Every registry function the SDK calls, with its arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryCall {
    GetAddress { name: String },
    GetName { address: String },
    GetSaleState { name: String },
    GetNameInfo { name: String },
    GetPrice { days: i64 },
    Register {
        owner: String,
        address: String,
        name: String,
        days: i64,
        affiliate: String,
    },
    AddAffiliate {
        affiliate_name: String,
        fee_address: String,
        fee: f64,
    },
}

impl RegistryCall {
    pub fn function_name(&self) -> &'static str {
        match self {
            RegistryCall::GetAddress { .. } => "get-address",
            RegistryCall::GetName { .. } => "get-name",
            RegistryCall::GetSaleState { .. } => "get-sale-state",
            RegistryCall::GetNameInfo { .. } => "get-name-info",
            RegistryCall::GetPrice { .. } => "get-price",
            RegistryCall::Register { .. } => "register",
            RegistryCall::AddAffiliate { .. } => "add-affiliate",
        }
    }

    pub fn args(&self) -> Vec<PactValue> {
        match self {
            RegistryCall::GetAddress { name }
            | RegistryCall::GetSaleState { name }
            | RegistryCall::GetNameInfo { name } => vec![PactValue::from(name.as_str())],
            RegistryCall::GetName { address } => vec![PactValue::from(address.as_str())],
            RegistryCall::GetPrice { days } => vec![PactValue::Integer(*days)],
            RegistryCall::Register {
                owner,
                address,
                name,
                days,
                affiliate,
            } => vec![
                PactValue::from(owner.as_str()),
                PactValue::from(address.as_str()),
                PactValue::from(name.as_str()),
                PactValue::Integer(*days),
                PactValue::from(affiliate.as_str()),
            ],
            RegistryCall::AddAffiliate {
                affiliate_name,
                fee_address,
                fee,
            } => vec![
                PactValue::from(affiliate_name.as_str()),
                PactValue::from(fee_address.as_str()),
                PactValue::Decimal((*fee).into()),
            ],
        }
    }

    /// Pact code invoking this function on `module`.
    pub fn code(&self, module: &str) -> String {
        function_call(&format!("{module}.{}", self.function_name()), &self.args())
    }
}

/// Capabilities a registration must be signed with, in the order the
/// contract checks them.
pub fn register_capabilities(
    module: &str,
    vault: &str,
    owner: &str,
    price: impl Into<PactDecimal>,
) -> Vec<Capability> {
    vec![
        Capability::new("coin.GAS", vec![]),
        Capability::new(
            "coin.TRANSFER",
            vec![
                PactValue::from(owner),
                PactValue::from(vault),
                PactValue::Decimal(price.into()),
            ],
        ),
        Capability::new(format!("{module}.ACCOUNT_GUARD"), vec![PactValue::from(owner)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_follows_network_family() {
        let config = RegistryConfig::new("main.registry", "test.registry", "c:vault");
        assert_eq!(config.module_for("mainnet01"), "main.registry");
        assert_eq!(config.module_for("testnet04"), "test.registry");
        assert_eq!(config.module_for("testnet05"), "test.registry");
    }

    #[test]
    fn periods_map_to_days() {
        assert_eq!(RegistrationPeriod::try_from(1).unwrap().days(), 365);
        assert_eq!(RegistrationPeriod::try_from(2).unwrap().days(), 730);
        assert!(RegistrationPeriod::try_from(3).is_err());
        assert_eq!(
            RegistrationPeriod::ALL.iter().map(|p| p.years()).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn call_code() {
        let call = RegistryCall::GetAddress {
            name: "turkiye.kda".to_string(),
        };
        assert_eq!(call.code("ns.registry"), r#"(ns.registry.get-address "turkiye.kda")"#);

        let call = RegistryCall::Register {
            owner: "k:owner".to_string(),
            address: "k:addr".to_string(),
            name: "example.kda".to_string(),
            days: 365,
            affiliate: String::new(),
        };
        assert_eq!(
            call.code("ns.registry"),
            r#"(ns.registry.register "k:owner" "k:addr" "example.kda" 365 "")"#
        );

        let call = RegistryCall::AddAffiliate {
            affiliate_name: "partner".to_string(),
            fee_address: "k:fees".to_string(),
            fee: 0.1,
        };
        assert_eq!(
            call.code("ns.registry"),
            r#"(ns.registry.add-affiliate "partner" "k:fees" 0.1)"#
        );
    }

    #[test]
    fn registration_capabilities_in_contract_order() {
        let caps = register_capabilities("ns.registry", "vault", "k:owner", 5.0);
        let names: Vec<_> = caps.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["coin.GAS", "coin.TRANSFER", "ns.registry.ACCOUNT_GUARD"]);
        assert_eq!(
            caps[1].args,
            vec![
                PactValue::from("k:owner"),
                PactValue::from("vault"),
                PactValue::Decimal(5.0.into())
            ]
        );
        assert_eq!(caps[2].args, vec![PactValue::from("k:owner")]);
    }
}
