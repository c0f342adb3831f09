mod common;

use common::reference_map;
use keylattice::effect::{
    EditCommand, EffectState, KeyValidity, MidiEvent, NoteLookup, RingEffect, RingScaling,
};
use keylattice::hex::ring;
use keylattice::hexmap::KeyAddress;
use rstest::rstest;
use std::collections::HashSet;

/// Note n on any channel is key n of board 0; channel 15 has nothing mapped.
struct BoardZero;

impl NoteLookup for BoardZero {
    fn address_for(&self, channel: u8, note: u8) -> Option<KeyAddress> {
        (channel != 15 && note < 56).then_some(KeyAddress::new(0, note))
    }
}

struct OnlyBoard(u8);

impl KeyValidity for OnlyBoard {
    fn is_key_coord_valid(&self, address: KeyAddress) -> bool {
        address.board == self.0
    }
}

fn note_on(note: u8, velocity: u8) -> MidiEvent {
    MidiEvent::NoteOn {
        channel: 0,
        note,
        velocity,
    }
}

#[test]
fn test_full_velocity_ring_in_traversal_order() {
    let map = reference_map(5);
    let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 1);

    // Key 27 sits mid-board; a radius 4 ring around it spills onto empty points
    let queued = effect.handle(note_on(27, 127), &BoardZero, &map, &map).unwrap();
    assert!(queued > 0);
    assert_eq!(effect.state(), EffectState::Expanding);

    let mut sink: Vec<EditCommand> = Vec::new();
    effect.drain(&mut sink);
    assert_eq!(effect.state(), EffectState::Idle);
    assert_eq!(sink.len(), queued);

    let origin = map.key_to_hex(KeyAddress::new(0, 27)).unwrap();
    let expected: Vec<_> = ring(origin, 4)
        .unwrap()
        .into_iter()
        .map(|p| map.hex_to_key(p))
        .filter(|a| a.is_valid())
        .collect();
    let emitted: Vec<_> = sink.iter().map(|c| c.address).collect();
    assert_eq!(emitted, expected);

    for c in &sink {
        assert_eq!(c.color.a, 255);
        let point = map.key_to_hex(c.address).unwrap();
        assert_eq!(point.distance(origin), 4);
    }
}

#[rstest]
#[case(1)]
#[case(64)]
#[case(126)]
fn test_truncated_scaling_lights_only_struck_key(#[case] velocity: u8) {
    let map = reference_map(1);
    let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 1);
    assert_eq!(effect.handle(note_on(10, velocity), &BoardZero, &map, &map).unwrap(), 1);

    let mut sink = Vec::new();
    assert!(effect.tick(&mut sink));
    assert_eq!(sink[0].address, KeyAddress::new(0, 10));
    assert_eq!(effect.state(), EffectState::Idle);
}

#[test]
fn test_proportional_scaling_rings_at_half_velocity() {
    let map = reference_map(1);
    let mut effect = RingEffect::with_seed(RingScaling::Proportional, 4, 1);
    let queued = effect.handle(note_on(27, 64), &BoardZero, &map, &map).unwrap();
    // Radius 2 around an interior key is fully on the board
    assert_eq!(queued, 12);
}

#[test]
fn test_validity_predicate_filters_boards() {
    let map = reference_map(2);
    let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 1);
    // Key 12 ends row 2; its ring reaches into board 1
    let origin = map.key_to_hex(KeyAddress::new(0, 12)).unwrap();
    let unfiltered: HashSet<_> = ring(origin, 4)
        .unwrap()
        .into_iter()
        .map(|p| map.hex_to_key(p))
        .filter(|a| a.is_valid())
        .collect();
    assert!(unfiltered.iter().any(|a| a.board == 1));

    effect.handle(note_on(12, 127), &BoardZero, &map, &OnlyBoard(0)).unwrap();
    let mut sink = Vec::new();
    effect.drain(&mut sink);
    assert!(!sink.is_empty());
    assert!(sink.iter().all(|c| c.address.board == 0));
}

#[test]
fn test_one_command_per_tick() {
    let map = reference_map(1);
    let mut effect = RingEffect::with_seed(RingScaling::Proportional, 4, 1);
    let queued = effect.handle(note_on(27, 127), &BoardZero, &map, &map).unwrap();

    let mut sink = Vec::new();
    for i in 1..=queued {
        assert!(effect.tick(&mut sink));
        assert_eq!(sink.len(), i);
    }
    assert!(!effect.tick(&mut sink));
    assert_eq!(effect.pending(), 0);
    assert_eq!(effect.state(), EffectState::Idle);
}

#[rstest]
#[case(MidiEvent::NoteOff { channel: 0, note: 27, velocity: 127 })]
#[case(MidiEvent::Aftertouch { channel: 0, note: 27, pressure: 127 })]
#[case(MidiEvent::Controller { channel: 0, controller: 64, value: 127 })]
#[case(MidiEvent::NoteOn { channel: 15, note: 27, velocity: 127 })]
fn test_other_events_are_no_ops(#[case] event: MidiEvent) {
    let map = reference_map(1);
    let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 1);
    assert_eq!(effect.handle(event, &BoardZero, &map, &map).unwrap(), 0);
    assert_eq!(effect.state(), EffectState::Idle);
}

#[test]
fn test_seeded_colours_are_reproducible() {
    let map = reference_map(1);
    let run = || {
        let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 99);
        effect.handle(note_on(27, 127), &BoardZero, &map, &map).unwrap();
        let mut sink = Vec::new();
        effect.drain(&mut sink);
        sink
    };
    assert_eq!(run(), run());
}

#[test]
fn test_alpha_scales_with_velocity() {
    let map = reference_map(1);
    let mut effect = RingEffect::with_seed(RingScaling::Truncated, 4, 3);
    effect.handle(note_on(5, 64), &BoardZero, &map, &map).unwrap();
    let mut sink = Vec::new();
    effect.drain(&mut sink);
    assert_eq!(sink[0].color.a, 129);
}
