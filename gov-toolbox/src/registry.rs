use crate::client::{Error, KoiosClient};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_lib::{Power, StandingStance, VotingEntity};
use tracing::info;

pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// Converts a lovelace amount to ADA. All tallying happens in ADA; this is
/// the only place the subunit appears.
pub fn lovelace_to_ada(lovelace: u64) -> Power {
    Decimal::from(lovelace) / Decimal::from(LOVELACE_PER_ADA)
}

#[derive(Deserialize)]
struct PoolListRow {
    pool_id_bech32: Option<String>,
}

#[derive(Deserialize)]
pub struct PoolInfoRow {
    pub pool_id_bech32: Option<String>,
    /// Voting power in lovelace; absent means zero.
    #[serde(default)]
    pub voting_power: Option<u64>,
    /// Raw delegation literal of the pool's reward account, e.g.
    /// `drep_always_abstain` or a drep id.
    #[serde(default)]
    pub reward_addr_delegated_drep: Option<String>,
    /// Pool metadata; Koios may return it as a JSON object or as an escaped
    /// string.
    #[serde(default)]
    pub meta_json: Option<serde_json::Value>,
}

/// One registry entry: the core voting entity plus the presentation fields
/// the report carries.
#[derive(Clone, Debug)]
pub struct PoolRecord {
    pub entity: VotingEntity,
    pub ticker: String,
    pub homepage: String,
}

impl From<PoolInfoRow> for PoolRecord {
    fn from(row: PoolInfoRow) -> Self {
        let meta = parse_meta_json(row.meta_json.as_ref());
        let entity = VotingEntity {
            id: row.pool_id_bech32.unwrap_or_default(),
            weight: lovelace_to_ada(row.voting_power.unwrap_or(0)),
            standing_stance: StandingStance::from_delegation_literal(
                row.reward_addr_delegated_drep.as_deref(),
            ),
        };
        Self {
            ticker: meta_field(&meta, &["ticker", "pool_ticker"]),
            homepage: meta_field(&meta, &["homepage", "pool_homepage"]),
            entity,
        }
    }
}

/// Metadata arrives either as an object or as a string holding JSON; both
/// collapse to an object, anything else to an empty one.
fn parse_meta_json(raw: Option<&serde_json::Value>) -> serde_json::Map<String, serde_json::Value> {
    match raw {
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(serde_json::Value::String(s)) => serde_json::from_str::<serde_json::Value>(s)
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default(),
        _ => Default::default(),
    }
}

fn meta_field(meta: &serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| meta.get(*k))
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .next()
        .unwrap_or_default()
}

/// Loads the full stake-pool registry: pool ids first, then details in
/// batches. Pools the detail endpoint does not know are simply absent.
pub fn load_registry(client: &KoiosClient) -> Result<Vec<PoolRecord>, Error> {
    let pool_list: Vec<PoolListRow> = client.get_paginated("pool_list")?;
    let pool_ids: Vec<String> = pool_list
        .into_iter()
        .filter_map(|row| row.pool_id_bech32)
        .collect();
    info!(pools = pool_ids.len(), "fetched pool list");

    let rows: Vec<PoolInfoRow> = client.post_batched("pool_info", "_pool_bech32_ids", &pool_ids)?;
    let records: Vec<PoolRecord> = rows
        .into_iter()
        .map(PoolRecord::from)
        .filter(|record| !record.entity.id.is_empty())
        .collect();
    info!(pools = records.len(), "fetched pool details");
    Ok(records)
}

/// Strips the registry down to the core entity collection.
pub fn entities(records: &[PoolRecord]) -> Vec<VotingEntity> {
    records.iter().map(|r| r.entity.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lovelace_conversion_is_exact() {
        assert_eq!(lovelace_to_ada(1_500_000), dec!(1.5));
        assert_eq!(lovelace_to_ada(0), Power::ZERO);
        assert_eq!(lovelace_to_ada(1), dec!(0.000001));
    }

    #[test]
    fn pool_row_with_object_metadata() {
        let row: PoolInfoRow = serde_json::from_str(
            r#"{
                "pool_id_bech32": "pool1abc",
                "voting_power": 2000000,
                "reward_addr_delegated_drep": "drep_always_abstain",
                "meta_json": {"ticker": "TICK", "homepage": "https://example.org"}
            }"#,
        )
        .unwrap();
        let record = PoolRecord::from(row);
        assert_eq!(record.entity.id, "pool1abc");
        assert_eq!(record.entity.weight, dec!(2));
        assert_eq!(record.entity.standing_stance, StandingStance::AlwaysAbstain);
        assert_eq!(record.ticker, "TICK");
        assert_eq!(record.homepage, "https://example.org");
    }

    #[test]
    fn pool_row_with_string_metadata_and_missing_fields() {
        let row: PoolInfoRow = serde_json::from_str(
            r#"{
                "pool_id_bech32": "pool1def",
                "meta_json": "{\"pool_ticker\": \"ALT\"}"
            }"#,
        )
        .unwrap();
        let record = PoolRecord::from(row);
        assert_eq!(record.entity.weight, Power::ZERO);
        assert_eq!(record.entity.standing_stance, StandingStance::None);
        assert_eq!(record.ticker, "ALT");
        assert_eq!(record.homepage, "");
    }

    #[test]
    fn malformed_metadata_collapses_to_empty() {
        let row: PoolInfoRow = serde_json::from_str(
            r#"{"pool_id_bech32": "pool1ghi", "meta_json": "not json"}"#,
        )
        .unwrap();
        let record = PoolRecord::from(row);
        assert_eq!(record.ticker, "");
        assert_eq!(record.homepage, "");
    }
}
