//! Property-based tests for the playback controller
//!
//! Uses proptest to verify sequencing and volume invariants across many
//! random inputs.

mod common;

use cadence_playback::{
    MemoryEngine, PlaybackConfig, PlaybackController, ShuffleOrder, Direction, Domain,
};
use cadence_core::SongId;
use common::{library_of, Harness};
use proptest::prelude::*;
use std::collections::HashSet;

// ===== Helpers =====

fn harness_at(len: usize, start: usize, shuffle_seed: Option<u64>) -> (Harness, Vec<SongId>) {
    let (library, ids) = library_of(len);
    let config = PlaybackConfig {
        shuffle: shuffle_seed.is_some(),
        shuffle_seed,
        ..PlaybackConfig::default()
    };
    let mut h = Harness::with_engine(library, MemoryEngine::new(), config);
    h.select(&ids[start]);
    (h, ids)
}

fn domain_and_start() -> impl Strategy<Value = (usize, usize)> {
    (1usize..25).prop_flat_map(|len| (Just(len), 0..len))
}

// ===== Property Tests =====

proptest! {
    /// Property: N calls to next() return to the starting song
    #[test]
    fn next_is_cyclic((len, start) in domain_and_start()) {
        let (mut h, ids) = harness_at(len, start, None);
        for _ in 0..len {
            h.next();
        }
        prop_assert_eq!(h.current(), Some(ids[start].clone()));
    }

    /// Property: N calls to previous() return to the starting song
    #[test]
    fn previous_is_cyclic((len, start) in domain_and_start()) {
        let (mut h, ids) = harness_at(len, start, None);
        for _ in 0..len {
            h.previous();
        }
        prop_assert_eq!(h.current(), Some(ids[start].clone()));
    }

    /// Property: next() then previous() (and the reverse) is the identity
    #[test]
    fn next_then_previous_round_trips(
        (len, start) in (2usize..25).prop_flat_map(|len| (Just(len), 0..len)),
        next_first in any::<bool>(),
    ) {
        let (mut h, ids) = harness_at(len, start, None);
        if next_first {
            h.next();
            h.previous();
        } else {
            h.previous();
            h.next();
        }
        prop_assert_eq!(h.current(), Some(ids[start].clone()));
    }

    /// Property: any shuffled walk is undone by replaying it in reverse,
    /// including walks that cross either end of the cycle
    #[test]
    fn shuffled_walk_retraces(
        (len, start) in (2usize..25).prop_flat_map(|len| (Just(len), 0..len)),
        seed in any::<u64>(),
        moves in prop::collection::vec(any::<bool>(), 1..60),
    ) {
        let (mut h, ids) = harness_at(len, start, Some(seed));
        for forward in &moves {
            if *forward { h.next() } else { h.previous() }
        }
        for forward in moves.iter().rev() {
            if *forward { h.previous() } else { h.next() }
        }
        prop_assert_eq!(h.current(), Some(ids[start].clone()));
    }

    /// Property: with shuffle on, N calls to next() return to the start
    #[test]
    fn shuffled_next_is_cyclic(
        (len, start) in domain_and_start(),
        seed in any::<u64>(),
    ) {
        let (mut h, ids) = harness_at(len, start, Some(seed));
        h.next();
        for _ in 1..len {
            prop_assert_ne!(h.current(), Some(ids[start].clone()));
            h.next();
        }
        prop_assert_eq!(h.current(), Some(ids[start].clone()));
    }

    /// Property: toggle_mute() twice restores volume and mute flag exactly
    #[test]
    fn toggle_mute_is_involutive(volume in 0.0f32..=1.0, muted_first in any::<bool>()) {
        let mut controller =
            PlaybackController::new(MemoryEngine::new(), PlaybackConfig::default());
        controller.set_volume(volume);
        if muted_first {
            controller.toggle_mute();
        }

        let before = controller.state().clone();
        controller.toggle_mute();
        controller.toggle_mute();
        let after = controller.state();

        prop_assert_eq!(before.volume, after.volume);
        prop_assert_eq!(before.is_muted, after.is_muted);
    }

    /// Property: set_volume(x > 0) unmutes and remembers x
    #[test]
    fn audible_volume_is_remembered(volume in 0.001f32..=1.0) {
        let mut controller =
            PlaybackController::new(MemoryEngine::new(), PlaybackConfig::default());
        controller.toggle_mute();
        controller.set_volume(volume);

        prop_assert!(!controller.state().is_muted);
        prop_assert_eq!(controller.state().previous_volume, volume);
        prop_assert_eq!(controller.state().volume, volume);
    }

    /// Property: volume always stays in [0, 1]
    #[test]
    fn volume_is_clamped(volume in prop::num::f32::ANY) {
        let mut controller =
            PlaybackController::new(MemoryEngine::new(), PlaybackConfig::default());
        controller.set_volume(volume);

        let level = controller.state().volume;
        prop_assert!((0.0..=1.0).contains(&level));
        prop_assert_eq!(controller.state().is_muted, level == 0.0);
    }

    /// Property: every shuffle cycle is a permutation and a new cycle never
    /// starts with the song that just finished
    #[test]
    fn shuffle_cycles_cover_domain(len in 1usize..30, seed in any::<u64>(), cycles in 1usize..4) {
        let domain = Domain::from_ids((0..len).map(|i| SongId::new(format!("s{}", i))).collect());
        let mut shuffle = ShuffleOrder::new(Some(seed));

        let mut current = 0;
        for _ in 0..cycles {
            let mut seen = HashSet::new();
            seen.insert(current);
            for _ in 1..len {
                current = shuffle.step(&domain, current, Direction::Next).unwrap();
                seen.insert(current);
            }
            prop_assert_eq!(seen.len(), len);

            let next = shuffle.step(&domain, current, Direction::Next).unwrap();
            if len > 1 {
                prop_assert_ne!(next, current);
            }
            current = next;
        }
    }

    /// Property: seeking never leaves [0, duration]
    #[test]
    fn seek_stays_in_bounds(
        duration in 1.0f64..600.0,
        deltas in prop::collection::vec(-700.0f64..700.0, 1..20),
    ) {
        let (library, ids) = library_of(1);
        let probe = MemoryEngine::new().with_duration("/music/s0.mp3", duration);
        let mut h = Harness::with_engine(library, probe, PlaybackConfig::default());
        h.select(&ids[0]);
        h.drain();

        for delta in deltas {
            h.controller.seek_by(delta);
            let position = cadence_playback::AudioEngine::position(&h.probe);
            prop_assert!(position >= 0.0 && position <= duration);
        }
    }
}
