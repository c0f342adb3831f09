use crate::reports;
use clap::Args;
use keylattice::config::Config;
use keylattice::error::LatticeResult;
use keylattice::geometry::BoardGeometry;
use keylattice::hexmap::HexMap;

#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    #[command(flatten)]
    pub config: Config,

    /// Only list this board
    #[arg(short, long)]
    pub board: Option<u8>,
}

pub fn run(args: &MapArgs, config: &Config, geometry: BoardGeometry) -> LatticeResult<()> {
    let map = HexMap::new(geometry, config.map.num_boards, config.map.origin())?;

    println!(
        "\n🗺️  === HEX MAP: {} boards x {} keys, origin {} -> {} ===",
        map.num_boards(),
        map.board_size(),
        map.origin().address,
        map.origin().point
    );

    let keys: Vec<_> = map
        .mapped_keys()
        .filter(|k| args.board.map_or(true, |b| b == k.address.board))
        .collect();
    reports::map_table(&keys);
    Ok(())
}
