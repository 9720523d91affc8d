use std::collections::HashSet;

use chordring::{Id, Table};
use rand::{seq::SliceRandom, thread_rng};

mod common;
use crate::common::{build_table, expected_owner, random_ids};

// Stamps out the property suite for an identifier width and a number of random draws.
macro_rules! ring_properties {
    ($($name:ident: $width:expr, $draws:expr;)*) => {
        $(
            paste::paste! {
                #[test]
                fn [<ownership_partition_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let table = build_table($width, &ids);

                    for x in 0..1u64 << $width {
                        let owners: Vec<_> = ids
                            .iter()
                            .filter(|&&id| table.member(id).unwrap().owns(x, table.space()))
                            .collect();

                        // A singleton ring has a zero-width arc but owns everything.
                        if ids.len() > 1 {
                            assert_eq!(owners.len(), 1, "{x} has owners {owners:?}");
                        }

                        let owner = expected_owner($width, &ids, x);
                        assert_eq!(table.search(x), Ok(owner));
                        assert_eq!(table.linear_search(x), Ok(owner));
                    }
                }

                #[test]
                fn [<search_agreement_from_every_member_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let table = build_table($width, &ids);
                    let ring = table.ring();

                    for &start in &ids {
                        for x in 0..1u64 << $width {
                            assert_eq!(
                                ring.circular_search(x, start),
                                ring.linear_search(x, start)
                            );
                        }
                    }
                }

                #[test]
                fn [<fingers_after_every_insertion_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let mut table = Table::new($width);

                    for (n, &id) in ids.iter().enumerate() {
                        assert!(table.insert(id).is_ok());
                        assert_eq!(table.len(), n + 1);

                        for &member in &ids[..=n] {
                            let member = table.member(member).unwrap();
                            for (i, &finger) in member.fingers().iter().enumerate() {
                                let target = table.space().finger_target(member.id(), i as u32);
                                assert_eq!(
                                    finger,
                                    expected_owner($width, &ids[..=n], target),
                                    "finger {i} of {} after inserting {id}",
                                    member.id()
                                );
                            }
                        }
                    }

                    table.assert_invariants();
                }

                #[test]
                fn [<ring_closure_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let table = build_table($width, &ids);

                    for &start in &ids {
                        let walk: Vec<Id> = table
                            .entries_from(start)
                            .unwrap()
                            .map(|entry| entry.id)
                            .collect();

                        assert_eq!(walk.len(), ids.len());
                        assert_eq!(walk.iter().collect::<HashSet<_>>().len(), ids.len());

                        // One more step comes back to the start.
                        let last = table.member(*walk.last().unwrap()).unwrap();
                        assert_eq!(last.successor(), start);

                        for &id in &walk {
                            let member = table.member(id).unwrap();
                            assert_eq!(table.member(member.successor()).unwrap().pred(), id);
                            assert_eq!(table.member(member.pred()).unwrap().successor(), id);
                        }
                    }
                }

                #[test]
                fn [<insertion_order_independence_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let mut shuffled = ids.clone();
                    shuffled.shuffle(&mut thread_rng());

                    let a = build_table($width, &ids);
                    let b = build_table($width, &shuffled);

                    for &id in &ids {
                        let (ma, mb) = (a.member(id).unwrap(), b.member(id).unwrap());
                        assert_eq!(ma.pred(), mb.pred());
                        assert_eq!(ma.arc_width(), mb.arc_width());
                        assert_eq!(ma.successor(), mb.successor());
                    }

                    for x in 0..1u64 << $width {
                        assert_eq!(a.search(x), b.search(x));
                    }
                }

                #[test]
                fn [<hop_bound_ $name>]() {
                    let ids = random_ids($width, $draws);
                    let table = build_table($width, &ids);

                    for x in 0..1u64 << $width {
                        let route = table.route(x).unwrap();

                        assert!(route.hops.len() <= $width as usize);
                        assert_eq!(route.owner, table.search(x).unwrap());
                        if let Some(&last) = route.hops.last() {
                            assert_eq!(last, route.owner);
                        } else {
                            assert_eq!(route.start, route.owner);
                        }
                    }
                }
            }
        )*
    };
}

ring_properties! {
    k1: 1, 2;
    k3_sparse: 3, 3;
    k4: 4, 250;
    k6_sparse: 6, 8;
    k6_dense: 6, 100;
    k8: 8, 60;
    k10_sparse: 10, 24;
    k12: 12, 40;
}
