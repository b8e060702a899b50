//! Turn-order comparator and ally classification.
//!
//! There is exactly one comparator. The dexterity step can be switched off
//! through [`OrderingPolicy`], which keeps display order and propagation
//! order from drifting apart.

use std::cmp::Ordering;

use bi_core::CombatantRecord;

use crate::config::OrderingPolicy;

/// Returns true if the combatant fights on the party's side.
///
/// Player ownership wins regardless of disposition; otherwise only a
/// friendly token counts.
pub fn is_ally(record: &CombatantRecord) -> bool {
    record.has_player_owner || record.disposition.is_friendly()
}

/// Compare two combatants for turn order. `Less` means `a` acts first.
///
/// Precedence, each step only consulted on a tie:
/// 1. higher initiative (unrolled sorts last),
/// 2. allies before non-allies,
/// 3. player-owned before the rest,
/// 4. higher dexterity (a missing score loses, even against 0),
/// 5. smaller name.
pub fn compare(policy: OrderingPolicy, a: &CombatantRecord, b: &CombatantRecord) -> Ordering {
    // `None < Some(_)` for Option, so reversing puts unrolled last.
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| is_ally(b).cmp(&is_ally(a)))
        .then_with(|| b.has_player_owner.cmp(&a.has_player_owner))
        .then_with(|| {
            if policy.dexterity_tiebreak {
                b.dexterity.cmp(&a.dexterity)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.name.cmp(&b.name))
}

/// Stable in-place sort into turn order.
pub fn sort_combatants(policy: OrderingPolicy, records: &mut [CombatantRecord]) {
    records.sort_by(|a, b| compare(policy, a, b));
}

#[cfg(test)]
mod tests {
    use bi_core::Disposition;
    use proptest::prelude::*;

    use super::*;

    fn ids(records: &[CombatantRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn ally_by_owner_or_friendly_token() {
        let owned = CombatantRecord::new("a", "A")
            .owned_by_player()
            .with_disposition(Disposition::HOSTILE);
        let friendly = CombatantRecord::new("b", "B").with_disposition(Disposition::FRIENDLY);
        let neutral = CombatantRecord::new("c", "C");
        let hostile = CombatantRecord::new("d", "D").with_disposition(Disposition::HOSTILE);
        assert!(is_ally(&owned));
        assert!(is_ally(&friendly));
        assert!(!is_ally(&neutral));
        assert!(!is_ally(&hostile));
    }

    #[test]
    fn higher_initiative_first_unrolled_last() {
        let mut list = vec![
            CombatantRecord::new("low", "Low").with_initiative(-4),
            CombatantRecord::new("none", "None"),
            CombatantRecord::new("high", "High").with_initiative(20),
        ];
        sort_combatants(OrderingPolicy::default(), &mut list);
        assert_eq!(ids(&list), vec!["high", "low", "none"]);
    }

    #[test]
    fn ties_break_on_ally_then_owner() {
        let mut list = vec![
            CombatantRecord::new("npc", "Aaron").with_initiative(10),
            CombatantRecord::new("friend", "Zed")
                .with_initiative(10)
                .with_disposition(Disposition::FRIENDLY),
            CombatantRecord::new("pc", "Zora")
                .with_initiative(10)
                .owned_by_player(),
        ];
        sort_combatants(OrderingPolicy::default(), &mut list);
        assert_eq!(ids(&list), vec!["pc", "friend", "npc"]);
    }

    #[test]
    fn missing_dexterity_loses_to_zero() {
        let zero = CombatantRecord::new("zero", "Zero")
            .with_initiative(5)
            .with_dexterity(0);
        let missing = CombatantRecord::new("missing", "Alpha").with_initiative(5);
        assert_eq!(
            compare(OrderingPolicy::default(), &zero, &missing),
            Ordering::Less
        );
    }

    #[test]
    fn dexterity_step_can_be_disabled() {
        let policy = OrderingPolicy {
            dexterity_tiebreak: false,
        };
        let nimble = CombatantRecord::new("n", "Nimble")
            .with_initiative(5)
            .with_dexterity(18);
        let clumsy = CombatantRecord::new("c", "Clumsy")
            .with_initiative(5)
            .with_dexterity(6);
        // Falls through to the name comparison.
        assert_eq!(compare(policy, &clumsy, &nimble), Ordering::Less);
        assert_eq!(
            compare(OrderingPolicy::default(), &clumsy, &nimble),
            Ordering::Greater
        );
    }

    #[test]
    fn full_tie_is_equal_and_stable() {
        let mut list = vec![
            CombatantRecord::new("first", "Twin").with_initiative(7),
            CombatantRecord::new("second", "Twin").with_initiative(7),
        ];
        sort_combatants(OrderingPolicy::default(), &mut list);
        assert_eq!(ids(&list), vec!["first", "second"]);
    }

    fn record_strategy() -> impl Strategy<Value = CombatantRecord> {
        (
            0u32..1000,
            prop::option::of(-3i32..6),
            any::<bool>(),
            -2i8..=1,
            prop::option::of(0i32..4),
            "[a-c]{1,2}",
        )
            .prop_map(|(n, init, owner, disp, dex, name)| CombatantRecord {
                initiative: init,
                has_player_owner: owner,
                disposition: Disposition(disp),
                dexterity: dex,
                ..CombatantRecord::new(format!("id{n}"), name)
            })
    }

    proptest! {
        #[test]
        fn compare_is_antisymmetric(a in record_strategy(), b in record_strategy()) {
            let p = OrderingPolicy::default();
            prop_assert_eq!(compare(p, &a, &b), compare(p, &b, &a).reverse());
        }

        #[test]
        fn compare_is_transitive(
            a in record_strategy(),
            b in record_strategy(),
            c in record_strategy(),
        ) {
            let p = OrderingPolicy::default();
            if compare(p, &a, &b) != Ordering::Greater && compare(p, &b, &c) != Ordering::Greater {
                prop_assert_ne!(compare(p, &a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn sorting_twice_is_stable(mut list in prop::collection::vec(record_strategy(), 0..12)) {
            let p = OrderingPolicy::default();
            sort_combatants(p, &mut list);
            let once = list.clone();
            sort_combatants(p, &mut list);
            prop_assert_eq!(once, list);
        }

        #[test]
        fn allies_lead_on_equal_initiative(a in record_strategy(), b in record_strategy()) {
            let p = OrderingPolicy::default();
            if a.initiative == b.initiative && is_ally(&a) && !is_ally(&b) {
                prop_assert_eq!(compare(p, &a, &b), Ordering::Less);
            }
            if a.initiative == b.initiative
                && is_ally(&a) == is_ally(&b)
                && a.has_player_owner
                && !b.has_player_owner
            {
                prop_assert_eq!(compare(p, &a, &b), Ordering::Less);
            }
        }
    }
}
