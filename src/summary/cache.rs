// reservoir-core/src/summary/cache.rs

use super::address::SummaryAddress;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Decoded value vectors by address. Never evicts; the owner clears it when
/// its set of sources changes.
#[derive(Debug, Default)]
pub struct ValueCache {
    values: RwLock<HashMap<SummaryAddress, Vec<f64>>>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &SummaryAddress) -> Option<Vec<f64>> {
        self.values.read().get(address).cloned()
    }

    pub fn put(&self, address: SummaryAddress, values: Vec<f64>) {
        self.values.write().insert(address, values);
    }

    pub fn contains(&self, address: &SummaryAddress) -> bool {
        self.values.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_clear() {
        let cache = ValueCache::new();
        let address = SummaryAddress::field("FOPT", None);
        assert_eq!(cache.get(&address), None);
        cache.put(address.clone(), vec![1.0, 2.0]);
        assert!(cache.contains(&address));
        assert_eq!(cache.get(&address), Some(vec![1.0, 2.0]));
        cache.put(address.clone(), vec![3.0]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&address), Some(vec![3.0]));
        cache.clear();
        assert!(cache.is_empty());
    }
}
