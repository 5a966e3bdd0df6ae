use proptest::prelude::*;
use slabfit::{reconcile, select, simulate, worst_case};

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn slot_and_space() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=4096).prop_flat_map(|space| (1..=space, Just(space)))
}

proptest! {
    #[test]
    fn test_cycle_shape((slot, space) in slot_and_space()) {
        let packing = simulate(slot, space).unwrap();
        let g = gcd(slot, space);

        prop_assert_eq!(packing.cycle_len(), slot / g);
        prop_assert_eq!(packing.slots_per_cycle(), space / g);
        prop_assert!(packing.worst_case() >= 1);
        prop_assert!(packing.best_case() <= packing.worst_case() + 1);
        prop_assert!(packing.instances().iter().all(|r| r.first_offset < slot));
    }

    #[test]
    fn test_worst_case_is_floor((slot, space) in slot_and_space()) {
        prop_assert_eq!(worst_case(slot, space).unwrap(), space / slot);
        prop_assert_eq!(simulate(slot, space).unwrap().worst_case(), space / slot);
    }

    #[test]
    fn test_monotone_in_slot_size((a, space) in slot_and_space(), b in 1usize..=4096) {
        let b = b.min(space);
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(worst_case(small, space).unwrap() >= worst_case(large, space).unwrap());
    }

    #[test]
    fn test_candidates_are_distinct(space in 1usize..=1 << 16) {
        let table = select(space).unwrap();
        let pairs: Vec<(usize, usize)> = table.iter().collect();

        prop_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 > w[1].1));
        prop_assert_eq!(table.get(1), Some(space));
        prop_assert_eq!(table.get(space), Some(1));
    }

    #[test]
    fn test_reconcile_ignores_order(mut spaces in proptest::collection::vec(1usize..=1024, 1..6)) {
        let forward = reconcile(&spaces).unwrap();
        spaces.reverse();
        let backward = reconcile(&spaces).unwrap();

        prop_assert_eq!(&forward, &backward);
        prop_assert!(forward.as_slice().windows(2).all(|w| w[0] < w[1]));
        for &space in &spaces {
            prop_assert!(forward.is_superset_of(&reconcile(&[space]).unwrap()));
        }
    }
}
