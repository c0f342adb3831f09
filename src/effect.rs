//! Note-driven ring effect.
//!
//! A note-on lights the ring of keys around the struck key. Commands are
//! queued in ring order and handed to an [`EditSink`] one per tick.

use crate::consts::{DEFAULT_MAX_RING_RADIUS, MIDI_MAX_VALUE};
use crate::error::LatticeResult;
use crate::hex::ring;
use crate::hexmap::{HexMap, KeyAddress};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    Aftertouch { channel: u8, note: u8, pressure: u8 },
    Controller { channel: u8, controller: u8, value: u8 },
}

/// How velocity becomes a ring radius.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RingScaling {
    /// `(v / 127) * max`, integer division first: only full velocity reaches past radius 0.
    #[default]
    Truncated,
    /// `round(v / 127 * max)`.
    Proportional,
}

impl RingScaling {
    pub fn radius(&self, velocity: u8, max_radius: i32) -> i32 {
        let v = velocity.min(MIDI_MAX_VALUE) as i32;
        let max_v = MIDI_MAX_VALUE as i32;
        match self {
            Self::Truncated => (v / max_v) * max_radius,
            Self::Proportional => (v as f32 / max_v as f32 * max_radius as f32).round() as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Random RGB with alpha proportional to `velocity`.
    pub fn random(rng: &mut fastrand::Rng, velocity: u8) -> Self {
        let level = velocity.min(MIDI_MAX_VALUE) as f32 / MIDI_MAX_VALUE as f32;
        Self {
            r: rng.u8(..),
            g: rng.u8(..),
            b: rng.u8(..),
            a: (level * 255.0).round() as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCommand {
    pub address: KeyAddress,
    pub color: Color,
}

/// Channel/note to hardware key lookup, owned by the MIDI layer.
pub trait NoteLookup {
    fn address_for(&self, channel: u8, note: u8) -> Option<KeyAddress>;
}

/// Board/key validity predicate, owned by the keyboard model.
pub trait KeyValidity {
    fn is_key_coord_valid(&self, address: KeyAddress) -> bool;
}

/// Receives colour edits, typically applied through an undoable action.
pub trait EditSink {
    fn push(&mut self, command: EditCommand);
}

impl EditSink for Vec<EditCommand> {
    fn push(&mut self, command: EditCommand) {
        Vec::push(self, command);
    }
}

/// Accepts every address inside the map's bounds.
impl KeyValidity for HexMap {
    fn is_key_coord_valid(&self, address: KeyAddress) -> bool {
        address.board < self.num_boards() && (address.key as usize) < self.board_size()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EffectState {
    Idle,
    Expanding,
}

#[derive(Debug)]
pub struct RingEffect {
    scaling: RingScaling,
    max_radius: i32,
    rng: fastrand::Rng,
    pending: VecDeque<EditCommand>,
    state: EffectState,
}

impl RingEffect {
    pub fn new(scaling: RingScaling, max_radius: i32) -> Self {
        Self::with_rng(scaling, max_radius, fastrand::Rng::new())
    }

    pub fn with_seed(scaling: RingScaling, max_radius: i32, seed: u64) -> Self {
        Self::with_rng(scaling, max_radius, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(scaling: RingScaling, max_radius: i32, rng: fastrand::Rng) -> Self {
        Self {
            scaling,
            max_radius,
            rng,
            pending: VecDeque::new(),
            state: EffectState::Idle,
        }
    }

    pub fn state(&self) -> EffectState {
        self.state
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queues the ring for a note-on; every other event is ignored.
    /// Returns the number of commands queued.
    pub fn handle(
        &mut self,
        event: MidiEvent,
        lookup: &impl NoteLookup,
        map: &HexMap,
        validity: &impl KeyValidity,
    ) -> LatticeResult<usize> {
        let MidiEvent::NoteOn {
            channel,
            note,
            velocity,
        } = event
        else {
            return Ok(0);
        };

        let Some(address) = lookup.address_for(channel, note) else {
            warn!("Ring effect: channel {} note {} has no key", channel, note);
            return Ok(0);
        };

        let origin = map.key_to_hex(address)?;
        let radius = self.scaling.radius(velocity, self.max_radius);

        let mut seen = HashSet::new();
        let mut queued = 0;
        for point in ring(origin, radius)? {
            let target = map.hex_to_key(point);
            if !target.is_valid() || !validity.is_key_coord_valid(target) || !seen.insert(target) {
                continue;
            }
            let color = Color::random(&mut self.rng, velocity);
            self.pending.push_back(EditCommand {
                address: target,
                color,
            });
            queued += 1;
        }

        if !self.pending.is_empty() {
            self.state = EffectState::Expanding;
        }
        debug!(
            "Ring effect: key {} velocity {} radius {} queued {}",
            address, velocity, radius, queued
        );
        Ok(queued)
    }

    /// Hands the next queued command to `sink`. Returns false once drained.
    pub fn tick(&mut self, sink: &mut impl EditSink) -> bool {
        match self.pending.pop_front() {
            Some(command) => {
                sink.push(command);
                if self.pending.is_empty() {
                    self.state = EffectState::Idle;
                }
                true
            }
            None => {
                self.state = EffectState::Idle;
                false
            }
        }
    }

    pub fn drain(&mut self, sink: &mut impl EditSink) -> usize {
        let mut count = 0;
        while self.tick(sink) {
            count += 1;
        }
        count
    }
}

impl Default for RingEffect {
    fn default() -> Self {
        Self::new(RingScaling::default(), DEFAULT_MAX_RING_RADIUS)
    }
}
