use proptest::prelude::*;

use tomekeep_core::packer::{PackerConfig, SpatialPacker, WorldBounds};
use tomekeep_core::rng::RandomStream;
use tomekeep_core::types::Rect;

fn assert_no_pair_overlaps(rooms: &[Rect]) -> Result<(), TestCaseError> {
    for left in 0..rooms.len() {
        for right in (left + 1)..rooms.len() {
            prop_assert!(
                !rooms[left].overlaps(&rooms[right]),
                "rooms overlap: {:?} vs {:?}",
                rooms[left],
                rooms[right]
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn initial_layouts_never_overlap_for_any_seed(
        seed in any::<u64>(),
        count in 1_usize..=12,
    ) {
        let mut rng = RandomStream::seed_from_u64(seed);
        let mut packer = SpatialPacker::new(WorldBounds::default(), PackerConfig::default());
        let rooms = packer.place_initial_rooms(count, &mut rng);
        prop_assert!(rooms.len() <= count);
        assert_no_pair_overlaps(&rooms)?;
        for room in &rooms {
            prop_assert!(room.x >= 50 && room.y >= 60);
            prop_assert!(room.right() <= 4_000 - 50);
            prop_assert!(room.bottom() <= 4_000 - 50);
        }
    }

    #[test]
    fn expansion_bursts_preserve_non_overlap(
        seed in any::<u64>(),
        expansions in 1_usize..=8,
    ) {
        let mut rng = RandomStream::seed_from_u64(seed);
        let mut packer = SpatialPacker::new(WorldBounds::default(), PackerConfig::default());
        let mut rooms = packer.place_initial_rooms(3, &mut rng);
        prop_assume!(!rooms.is_empty());
        for _ in 0..expansions {
            let base_index =
                rng.next_int(0, rooms.len() as i32 - 1) as usize;
            if let Some(placed) = packer.place_adjacent(rooms[base_index], &rooms, &mut rng) {
                rooms.push(placed);
            }
        }
        assert_no_pair_overlaps(&rooms)?;
        for room in &rooms {
            prop_assert!(room.x >= 50 && room.y >= 60);
            prop_assert!(room.right() <= 4_000 - 50);
            prop_assert!(room.bottom() <= 4_000 - 50);
        }
    }

    #[test]
    fn same_seed_places_identical_layouts(seed in any::<u64>()) {
        let mut first_rng = RandomStream::seed_from_u64(seed);
        let mut second_rng = RandomStream::seed_from_u64(seed);
        let mut first = SpatialPacker::new(WorldBounds::default(), PackerConfig::default());
        let mut second = SpatialPacker::new(WorldBounds::default(), PackerConfig::default());
        let first_rooms = first.place_initial_rooms(6, &mut first_rng);
        let second_rooms = second.place_initial_rooms(6, &mut second_rng);
        prop_assert_eq!(first_rooms, second_rooms);
    }
}
