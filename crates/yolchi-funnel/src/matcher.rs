// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Set-membership join between phone lists and registry rows on the last-9 key.

use std::collections::{HashMap, HashSet};

use yolchi_core::{Driver, DriverStatus};

use crate::phone;

/// Last-9 keys of a phone list.
#[derive(Debug, Clone, Default)]
pub struct PhoneKeySet {
    keys: HashSet<String>,
}

impl PhoneKeySet {
    pub fn from_phones<I, S>(phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = phones
            .into_iter()
            .map(|p| phone::last_nine(p.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    /// True when `raw` (any format) shares a key with the list.
    pub fn contains_phone(&self, raw: &str) -> bool {
        let key = phone::last_nine(raw);
        !key.is_empty() && self.keys.contains(&key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A registry row whose phone matched the list.
#[derive(Debug, Clone, Copy)]
pub struct DriverMatch<'a> {
    pub driver: &'a Driver,
    pub status: DriverStatus,
    pub is_full_register: bool,
    /// Account has the driver role (as opposed to a passenger or staff account).
    pub is_driver: bool,
}

impl<'a> DriverMatch<'a> {
    fn new(driver: &'a Driver, driver_role_id: &str) -> Self {
        Self {
            driver,
            status: driver.status,
            is_full_register: driver.is_fully_registered(),
            is_driver: driver.role_id == driver_role_id,
        }
    }
}

fn driver_key(driver: &Driver) -> Option<String> {
    let key = phone::last_nine(driver.phone_number.as_deref()?);
    (!key.is_empty()).then_some(key)
}

/// Every row whose phone key is in `keys`, in registry order.
pub fn match_drivers<'a>(
    keys: &PhoneKeySet,
    drivers: &'a [Driver],
    driver_role_id: &str,
) -> Vec<DriverMatch<'a>> {
    drivers
        .iter()
        .filter(|d| driver_key(d).is_some_and(|k| keys.contains_key(&k)))
        .map(|d| DriverMatch::new(d, driver_role_id))
        .collect()
}

/// At most one matched row per key; the first row in registry order wins.
///
/// Keeps per-contact funnels monotone when the registry holds several rows
/// for one number.
pub fn match_unique<'a>(
    keys: &PhoneKeySet,
    drivers: &'a [Driver],
    driver_role_id: &str,
) -> Vec<DriverMatch<'a>> {
    let mut seen = HashSet::new();
    drivers
        .iter()
        .filter_map(|d| driver_key(d).map(|k| (k, d)))
        .filter(|(k, _)| keys.contains_key(k) && seen.insert(k.clone()))
        .map(|(_, d)| DriverMatch::new(d, driver_role_id))
        .collect()
}

/// Lookup from last-9 key to registry row, restricted to keys in a list.
///
/// When several rows share a key the last one in registry order is kept.
#[derive(Debug)]
pub struct RegistryIndex<'a> {
    by_key: HashMap<String, &'a Driver>,
    driver_role_id: String,
}

impl<'a> RegistryIndex<'a> {
    pub fn build(keys: &PhoneKeySet, drivers: &'a [Driver], driver_role_id: &str) -> Self {
        let by_key = drivers
            .iter()
            .filter_map(|d| driver_key(d).map(|k| (k, d)))
            .filter(|(k, _)| keys.contains_key(k))
            .collect();
        Self {
            by_key,
            driver_role_id: driver_role_id.to_string(),
        }
    }

    /// Registry row for a phone in any format.
    pub fn lookup(&self, raw: &str) -> Option<DriverMatch<'a>> {
        let key = phone::last_nine(raw);
        self.by_key
            .get(&key)
            .map(|&d| DriverMatch::new(d, &self.driver_role_id))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
