use crate::reports;
use clap::Args;
use keylattice::api::LatticeSession;
use keylattice::config::Config;
use keylattice::effect::{MidiEvent, NoteLookup};
use keylattice::error::{LatticeError, LatticeResult};
use keylattice::geometry::BoardGeometry;
use keylattice::hex::ring;
use keylattice::hexmap::KeyAddress;

#[derive(Args, Debug, Clone)]
pub struct RingArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long, default_value_t = 0)]
    pub board: u8,

    #[arg(long, default_value_t = 0)]
    pub key: u8,

    /// Ring radius, at most 1024
    #[arg(
        long,
        default_value_t = 1,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(..=MAX_CLI_RING_RADIUS)
    )]
    pub radius: i32,

    /// Run the ring effect at this velocity instead of listing a plain ring
    #[arg(long)]
    pub velocity: Option<u8>,
}

const MAX_CLI_RING_RADIUS: i64 = 1024;

/// Every note resolves to the key given on the command line.
struct FixedKey(KeyAddress);

impl NoteLookup for FixedKey {
    fn address_for(&self, _channel: u8, _note: u8) -> Option<KeyAddress> {
        Some(self.0)
    }
}

pub fn run(args: &RingArgs, config: &Config, geometry: BoardGeometry) -> LatticeResult<()> {
    let session = LatticeSession::from_config(geometry, config)?;
    let address = KeyAddress::new(args.board, args.key);

    if let Some(velocity) = args.velocity {
        let event = MidiEvent::NoteOn {
            channel: 0,
            note: 0,
            velocity,
        };
        let commands = session.trigger(event, &FixedKey(address))?;
        println!(
            "\n💡 === RING EFFECT: key {} velocity {} -> {} edits ===",
            address,
            velocity,
            commands.len()
        );
        reports::effect_table(&commands);
        return Ok(());
    }

    let map = session
        .map
        .read()
        .map_err(|e| LatticeError::Poisoned(e.to_string()))?;
    let origin = map.key_to_hex(address)?;
    let points = ring(origin, args.radius)?;
    let rows: Vec<_> = points.iter().map(|&p| (p, map.hex_to_key(p))).collect();

    println!(
        "\n⬡ === RING: key {} at {} radius {} ({} points, {} occupied) ===",
        address,
        origin,
        args.radius,
        rows.len(),
        rows.iter().filter(|(_, a)| a.is_valid()).count()
    );
    reports::ring_table(&rows);
    Ok(())
}
