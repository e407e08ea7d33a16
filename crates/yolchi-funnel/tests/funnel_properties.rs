// SPDX-FileCopyrightText: 2026 Yolchi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests over generated cohorts.

use proptest::prelude::*;
use yolchi_core::{Corridor, Driver, DriverStatus, Route};
use yolchi_funnel::{Funnel, ImportMode, PhoneKeySet, import_contacts, match_unique};

fn status() -> impl Strategy<Value = DriverStatus> {
    prop_oneof![
        Just(DriverStatus::Pending),
        Just(DriverStatus::Active),
        Just(DriverStatus::Inactive),
        Just(DriverStatus::Blocked),
    ]
}

fn driver() -> impl Strategy<Value = Driver> {
    (
        "9[0-9]{8}",
        prop_oneof![Just(String::new()), Just("  ".to_string()), "[A-Za-z]{1,8}"],
        status(),
        prop_oneof![Just("9"), Just("2"), Just("3")],
        prop_oneof![Just("9"), Just("2"), Just("3")],
    )
        .prop_map(|(phone, name, status, dep, arr)| Driver {
            id: phone.clone(),
            role_id: "2".into(),
            first_name: Some(name),
            last_name: None,
            phone_number: Some(phone),
            status,
            created_at: "2026-01-27T00:00:00.000Z".into(),
            source_tag: None,
            region_id: None,
            region_name: None,
            sub_region_id: None,
            sub_region_name: None,
            route: Route {
                departure_region_id: Some(dep.into()),
                arrival_region_id: Some(arr.into()),
                ..Route::default()
            },
            inactive_reasons: Vec::new(),
        })
}

proptest! {
    #[test]
    fn stages_never_increase(
        registry in prop::collection::vec(driver(), 0..40),
        extra in prop::collection::vec("9[0-9]{8}", 0..20),
    ) {
        let uploaded: Vec<String> = registry
            .iter()
            .step_by(2)
            .filter_map(|d| d.phone_number.clone())
            .chain(extra)
            .collect();
        let outcome = import_contacts(&uploaded.join("\n"), ImportMode::default());
        let keys = PhoneKeySet::from_phones(outcome.phones());
        let cohort: Vec<&Driver> = match_unique(&keys, &registry, "2")
            .into_iter()
            .map(|m| m.driver)
            .collect();

        let corridor = Corridor::new("9", "2");
        let funnel = Funnel::from_contacted(outcome.entries.len() as u64, cohort, &corridor);
        for stages in [funnel.with_route(), funnel.without_route()] {
            prop_assert!(stages.active <= stages.full_register);
            prop_assert!(stages.full_register <= stages.login);
            prop_assert!(stages.login <= funnel.contacted);
        }
        prop_assert!(funnel.with_route().login <= funnel.without_route().login);
        prop_assert_eq!(funnel.contacted, outcome.entries.len() as u64);
    }
}
