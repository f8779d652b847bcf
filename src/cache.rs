use crate::extract::types::StatementType;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// Fixed expiry for reconciliation results.
pub const CACHE_TTL_HOURS: i64 = 24;

/// TTL memoization keyed by (company identifier, statement type).
/// Entries expire after the TTL and are otherwise never evicted. There
/// is no coalescing of concurrent misses: two callers racing on the
/// same key both do the work and the last write wins.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<(String, StatementType), (DateTime<Utc>, V)>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(CACHE_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        TtlCache {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, company: &str, statement_type: StatementType) -> Option<V> {
        let entries = self.entries.read().unwrap();
        entries
            .get(&(company.to_string(), statement_type))
            .and_then(|(stored_at, value)| {
                if Utc::now() - *stored_at < self.ttl {
                    Some(value.clone())
                } else {
                    None
                }
            })
    }

    pub fn insert(&self, company: &str, statement_type: StatementType, value: V) {
        self.entries
            .write()
            .unwrap()
            .insert((company.to_string(), statement_type), (Utc::now(), value));
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl_returns_the_stored_value() {
        let cache = TtlCache::new();
        cache.insert("AAPL", StatementType::Income, 42u32);
        assert_eq!(cache.get("AAPL", StatementType::Income), Some(42));
    }

    #[test]
    fn keys_are_company_and_statement_type() {
        let cache = TtlCache::new();
        cache.insert("AAPL", StatementType::Income, 1u32);
        assert_eq!(cache.get("AAPL", StatementType::BalanceSheet), None);
        assert_eq!(cache.get("MSFT", StatementType::Income), None);
    }

    #[test]
    fn expired_entries_miss() {
        let cache = TtlCache::with_ttl(Duration::zero());
        cache.insert("AAPL", StatementType::Income, 1u32);
        assert_eq!(cache.get("AAPL", StatementType::Income), None);
    }

    #[test]
    fn last_write_wins() {
        let cache = TtlCache::new();
        cache.insert("AAPL", StatementType::Income, 1u32);
        cache.insert("AAPL", StatementType::Income, 2u32);
        assert_eq!(cache.get("AAPL", StatementType::Income), Some(2));
    }
}
