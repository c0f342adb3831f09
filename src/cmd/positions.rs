use crate::reports;
use clap::Args;
use keylattice::api::LatticeSession;
use keylattice::config::Config;
use keylattice::error::{LatticeError, LatticeResult};
use keylattice::geometry::BoardGeometry;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PositionsArgs {
    #[command(flatten)]
    pub config: Config,

    /// Write board,key,q,r,x,y rows here instead of printing a table
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: &PositionsArgs, config: &Config, geometry: BoardGeometry) -> LatticeResult<()> {
    let session = LatticeSession::from_config(geometry, config)?;
    let positions = session.positions()?;
    let map = session
        .map
        .read()
        .map_err(|e| LatticeError::Poisoned(e.to_string()))?;

    let rows: Vec<_> = map.mapped_keys().zip(positions).collect();

    match &args.csv {
        Some(path) => {
            reports::write_positions_csv(path, &rows)?;
            info!("💾 Wrote {} positions to {}", rows.len(), path.display());
        }
        None => {
            let tiling = session
                .tiling
                .read()
                .map_err(|e| LatticeError::Poisoned(e.to_string()))?;
            println!(
                "\n📐 === POSITIONS: {} tiling, radius {:.2} ===",
                tiling.mode(),
                tiling.radius()
            );
            reports::positions_table(&rows);
        }
    }
    Ok(())
}
