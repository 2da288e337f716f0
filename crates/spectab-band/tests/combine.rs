//! Combination laws for bands.

use proptest::prelude::*;

use spectab_band::{Allocation, Band, Bounds, CombineOptions};
use spectab_core::{Frequency, Jurisdiction};

const LINES: &[&str] = &[
    "FIXED",
    "MOBILE 5.384A",
    "Amateur",
    "RADIO ASTRONOMY 5.149",
    "Space research (passive)",
    "EARTH EXPLORATION-SATELLITE (passive)",
];

fn band(start_mhz: u32, width_mhz: u32, picks: &[usize], footnotes: &[&str], j: Jurisdiction) -> Band {
    let bounds = Bounds::new(
        Frequency::mhz(f64::from(start_mhz)),
        Frequency::mhz(f64::from(start_mhz + width_mhz)),
    )
    .unwrap();
    let mut builder = Band::builder(bounds)
        .jurisdiction(j)
        .footnotes(footnotes.iter().copied());
    for &i in picks {
        builder = builder.allocation(Allocation::parse(LINES[i]).unwrap());
    }
    builder.build().unwrap()
}

#[test]
fn fcc_rules_union_only_when_present() {
    let a = Band::builder(Bounds::parse("1-2 MHz", None).unwrap())
        .fcc_rules(["Amateur Radio (97)"])
        .build()
        .unwrap();
    let b = Band::builder(Bounds::parse("1-2 MHz", None).unwrap()).build().unwrap();
    assert_eq!(a.combine(&b).unwrap().fcc_rules().map(|r| r.len()), Some(1));
    assert!(b.combine(&b).unwrap().fcc_rules().is_none());
}

#[test]
fn derived_flags_recomputed_after_combine() {
    let a = band(100, 100, &[0], &[], Jurisdiction::ItuRegion1);
    let b = band(100, 100, &[1], &[], Jurisdiction::ItuRegion1);
    assert!(a.primary_allocations()[0].is_exclusive());
    let c = a.combine(&b).unwrap();
    assert!(c.primary_allocations().iter().all(|x| x.is_co_primary()));
    assert!(c.primary_allocations().iter().all(|x| !x.is_exclusive()));
}

proptest! {
    /// Combining is commutative for overlapping bands.
    #[test]
    fn combine_commutes(
        start_a in 100u32..200,
        width_a in 1u32..100,
        start_b in 100u32..200,
        width_b in 1u32..100,
        picks_a in proptest::collection::vec(0usize..6, 0..4),
        picks_b in proptest::collection::vec(0usize..6, 0..4),
        ja in 0usize..5,
        jb in 0usize..5,
    ) {
        let a = band(start_a, width_a, &picks_a, &["5.1"], Jurisdiction::all()[ja]);
        let b = band(start_b, width_b, &picks_b, &["5.2"], Jurisdiction::all()[jb]);
        prop_assume!(a.overlaps(&b) || a.is_adjacent(&b));
        let ab = a.combine(&b).unwrap();
        let ba = b.combine(&a).unwrap();
        prop_assert_eq!(ab, ba);
    }

    /// A band combined with itself is unchanged.
    #[test]
    fn self_combine_is_identity(
        start in 1u32..1000,
        width in 1u32..100,
        picks in proptest::collection::vec(0usize..6, 0..6),
        j in 0usize..5,
    ) {
        let a = band(start, width, &picks, &["US246"], Jurisdiction::all()[j]);
        let forced = CombineOptions::forced();
        let aa = a.combine_with(&a, forced).unwrap();
        // Input lists are unsorted; compare against the self-combination's
        // own sort of the same content.
        prop_assert_eq!(aa.bounds(), a.bounds());
        prop_assert_eq!(aa.jurisdictions(), a.jurisdictions());
        prop_assert_eq!(aa.footnotes(), a.footnotes());
        let mut expected: Vec<String> = a.allocations().map(ToString::to_string).collect();
        expected.sort();
        expected.dedup();
        let mut got: Vec<String> = aa.allocations().map(ToString::to_string).collect();
        got.sort();
        prop_assert_eq!(got, expected);
    }
}
