// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Yolchi campaign service.
//!
//! Holds the error type, registry row types and the trait seams
//! ([`DriverRegistry`], [`StateStore`], [`Document`]) every other crate builds on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::YolchiError;
pub use traits::{Document, DriverRegistry, StateStore};
pub use types::{
    Corridor, DailyStats, Driver, DriverFilter, DriverStatus, InactiveReason, Ordering,
    PageRequest, Region, RegionStats, Route, RouteScope, SortKey, SortOrder, StatusScope,
    StatusSummary, SubRegion, SubRegionStats, has_full_profile,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render() {
        let storage = YolchiError::storage(std::io::Error::other("disk gone"));
        assert_eq!(storage.to_string(), "storage error: disk gone");

        let missing = YolchiError::not_found("expense", "exp_1");
        assert_eq!(missing.to_string(), "expense not found: exp_1");

        let bad = YolchiError::InvalidInput("amount is required".into());
        assert!(bad.to_string().contains("amount is required"));
    }

    #[test]
    fn filter_parts_resolve_from_the_crate_root() {
        let filter = DriverFilter {
            status: StatusScope::In(vec![DriverStatus::Active]),
            route: Some(RouteScope::Corridor(Corridor::new("9", "2"))),
            ordering: Ordering::By(SortKey::CreatedAt, SortOrder::Desc),
            page: Some(PageRequest { page: 1, limit: 20 }),
            ..DriverFilter::role("2")
        };
        assert_eq!(filter.role_id.as_deref(), Some("2"));
        assert!(matches!(filter.route, Some(RouteScope::Corridor(_))));
    }

    #[test]
    fn traits_are_object_safe() {
        fn _registry(_: &dyn DriverRegistry) {}
        fn _store(_: &dyn StateStore) {}
    }
}
