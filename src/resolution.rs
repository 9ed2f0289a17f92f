//! Name pricing and availability.

use crate::client::ChainClient;
use crate::error::{KdnError, Result};
use crate::expiry::{is_name_expired_at, transform_pact_date};
use crate::names::ensure_kda_extension;
use crate::pact::{pact_number, PactDecimal};
use crate::query::SaleStateRow;
use crate::registry::RegistrationPeriod;
use crate::sdk::KadenaNames;
use crate::types::{NameInfo, RawNameInfo};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Combine a name-info row with the sale state fetched alongside it.
///
/// Past the grace period a name is neither available nor for sale and its
/// prices are zeroed. Otherwise availability and price come from the sale
/// state, and the market price falls back to the last paid price.
pub(crate) fn merge_name_info(raw: &RawNameInfo, sale: &SaleStateRow, now: DateTime<Utc>) -> NameInfo {
    let expiry_date = raw.expiry_date.as_ref().and_then(transform_pact_date);
    let last_price = raw.last_price.as_ref().and_then(pact_number);

    if let Some(expiry) = expiry_date {
        if is_name_expired_at(expiry, now) {
            return NameInfo {
                price: 0.0,
                market_price: 0.0,
                is_available: false,
                is_for_sale: false,
                expiry_date,
                last_price: None,
            };
        }
    }

    let sale_price = sale.price.as_ref().map(PactDecimal::value);
    NameInfo {
        price: sale_price.unwrap_or(0.0),
        market_price: sale_price.or(last_price).unwrap_or(0.0),
        is_available: sale.sellable,
        is_for_sale: sale.sellable,
        expiry_date,
        last_price,
    }
}

impl<C: ChainClient> KadenaNames<C> {
    /// Price and availability of `name`, as seen by `owner`.
    ///
    /// Name info is read first, then the sale state; either failing fails
    /// the call.
    pub async fn fetch_name_info(&self, name: &str, network_id: &str, owner: &str) -> Result<NameInfo> {
        let (info, _) = self.name_info_with_sale_price(name, network_id, owner).await?;
        Ok(info)
    }

    /// [`Self::fetch_name_info`] plus the current price exactly as the node
    /// rendered it, zero once the name has expired.
    pub(crate) async fn name_info_with_sale_price(
        &self,
        name: &str,
        network_id: &str,
        owner: &str,
    ) -> Result<(NameInfo, PactDecimal)> {
        let endpoint = self.endpoint(network_id)?;
        let formatted = ensure_kda_extension(name);

        let raw = self.query_name_info(&endpoint, &formatted, owner).await?;
        let sale = self.query_sale_state(&endpoint, &formatted).await?;

        let info = merge_name_info(&raw, &sale, Utc::now());
        debug!(name = %formatted, network_id, available = info.is_available, "fetched name info");

        let current = sale
            .price
            .filter(|price| price.value() == info.price)
            .unwrap_or_else(|| PactDecimal::from(info.price));
        Ok((info, current))
    }

    /// The registry's list price for registering over `period`.
    pub async fn fetch_price_by_period(
        &self,
        period: RegistrationPeriod,
        network_id: &str,
        owner: &str,
    ) -> Result<f64> {
        let endpoint = self.endpoint(network_id)?;
        Ok(self.query_price(&endpoint, period, owner).await?.value())
    }

    /// [`Self::fetch_price_by_period`] keyed by a year count, `1` or `2`.
    pub async fn fetch_price_by_years(&self, years: u8, network_id: &str, owner: &str) -> Result<f64> {
        let period = RegistrationPeriod::try_from(years)
            .map_err(|e| KdnError::query("fetch price by period", e))?;
        self.fetch_price_by_period(period, network_id, owner).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::GRACE_PERIOD_MS;
    use chrono::Duration;
    use serde_json::json;

    fn raw(expiry: Option<DateTime<Utc>>, last_price: Option<f64>) -> RawNameInfo {
        RawNameInfo {
            expiry_date: expiry.map(|e| json!({ "timep": e.to_rfc3339() })),
            last_price: last_price.map(|p| json!(p)),
        }
    }

    #[test]
    fn sale_state_overrides_availability() {
        let now = Utc::now();
        let info = merge_name_info(
            &raw(Some(now + Duration::days(100)), Some(9.0)),
            &SaleStateRow { sellable: false, price: Some(0.0.into()) },
            now,
        );
        assert!(!info.is_available);
        assert!(!info.is_for_sale);
        assert_eq!(info.price, 0.0);
        assert_eq!(info.market_price, 0.0);
        assert_eq!(info.last_price, Some(9.0));

        let info = merge_name_info(
            &raw(None, None),
            &SaleStateRow { sellable: true, price: Some(42.0.into()) },
            now,
        );
        assert!(info.is_available && info.is_for_sale);
        assert_eq!(info.price, 42.0);
        assert_eq!(info.market_price, 42.0);
        assert_eq!(info.expiry_date, None);
    }

    #[test]
    fn market_price_falls_back_to_last_price() {
        let now = Utc::now();
        let info = merge_name_info(&raw(None, Some(11.5)), &SaleStateRow::default(), now);
        assert_eq!(info.market_price, 11.5);
        assert_eq!(info.price, 0.0);

        let info = merge_name_info(&raw(None, None), &SaleStateRow::default(), now);
        assert_eq!(info.market_price, 0.0);
    }

    #[test]
    fn expiry_wins_over_sale_state() {
        let now = Utc::now();
        let expiry = now - Duration::days(32);
        let info = merge_name_info(
            &raw(Some(expiry), Some(20.0)),
            &SaleStateRow { sellable: true, price: Some(50.0.into()) },
            now,
        );
        assert_eq!(
            info,
            NameInfo {
                price: 0.0,
                market_price: 0.0,
                is_available: false,
                is_for_sale: false,
                expiry_date: transform_pact_date(&json!({ "timep": expiry.to_rfc3339() })),
                last_price: None,
            }
        );
    }

    #[test]
    fn grace_period_boundary_is_not_expired() {
        let expiry = Utc::now() - Duration::days(40);
        let now = expiry + Duration::milliseconds(GRACE_PERIOD_MS);
        let sale = SaleStateRow { sellable: true, price: Some(3.0.into()) };
        let info = merge_name_info(&raw(Some(expiry), None), &sale, now);
        assert!(info.is_for_sale);
        assert_eq!(info.price, 3.0);
    }

    #[test]
    fn far_future_expiry_does_not_overflow() {
        let raw = RawNameInfo {
            expiry_date: Some(json!({ "timep": DateTime::<Utc>::MAX_UTC.timestamp_millis() })),
            last_price: None,
        };
        let sale = SaleStateRow { sellable: true, price: Some(8.0.into()) };
        let info = merge_name_info(&raw, &sale, Utc::now());
        assert!(info.is_for_sale);
        assert_eq!(info.price, 8.0);
        assert!(info.expiry_date.is_some());
    }
}
