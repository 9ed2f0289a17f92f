//! Resolve a name, then reverse-resolve the address it points at.
//!
//! The registry deployment comes from the environment:
//!
//! ```text
//! KDN_REGISTRY_MAINNET_MODULE=.. KDN_REGISTRY_TESTNET_MODULE=.. KDN_REGISTRY_VAULT=.. \
//!     cargo run --example resolve --features logging -- turkiye.kda mainnet01
//! ```

use kadenanames_sdk::{logging::init_logging, KadenaNames, SdkConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging("info", false)?;

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "turkiye.kda".to_string());
    let network_id = args.next().unwrap_or_else(|| "mainnet01".to_string());

    let sdk = KadenaNames::with_config(SdkConfig::from_env())?;

    let Some(address) = sdk.name_to_address(&name, &network_id).await? else {
        println!("{name} is not registered on {network_id}");
        return Ok(());
    };
    println!("{name} -> {address}");

    match sdk.address_to_name(&address, &network_id).await? {
        Some(primary) => println!("{address} -> {primary}"),
        None => println!("{address} has no primary name"),
    }

    let info = sdk.fetch_name_info(&name, &network_id, &address).await?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
