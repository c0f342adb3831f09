use clap::{CommandFactory, FromArgMatches, Parser};
use keylattice::config::Config;
use keylattice::effect::RingScaling;
use keylattice::error::LatticeError;
use keylattice::geometry::BoardGeometry;
use keylattice::hex::HexCoord;
use keylattice::hexmap::KeyAddress;
use keylattice::tiling::{Point, TilingMode};
use std::fs;

#[derive(Parser, Debug)]
struct Harness {
    #[command(flatten)]
    config: Config,
}

fn parse_cli(args: &[&str]) -> (Config, clap::ArgMatches) {
    let argv = std::iter::once("keylattice").chain(args.iter().copied());
    let matches = Harness::command().get_matches_from(argv);
    let harness = Harness::from_arg_matches(&matches).unwrap();
    (harness.config, matches)
}

fn write_config(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("lattice.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_defaults_match_cli_defaults() {
    let (cli, _) = parse_cli(&[]);
    let default = Config::default();

    assert_eq!(cli.map.num_boards, default.map.num_boards);
    assert_eq!(cli.map.num_boards, 5);
    assert_eq!(cli.tiling.tiling_mode, TilingMode::Regular);
    assert_eq!(cli.tiling.viewport_width, default.tiling.viewport_width);
    assert_eq!(cli.tiling.row_steps, default.tiling.row_steps);
    assert_eq!(cli.effect.ring_scaling, RingScaling::Truncated);
    assert_eq!(cli.effect.max_ring_radius, default.effect.max_ring_radius);
    assert_eq!(cli.effect.seed, None);
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{
            "map": { "num_boards": 3, "origin_key": 27, "origin_q": -4 },
            "effect": { "ring_scaling": "proportional", "seed": 42 }
        }"#,
    );

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.map.num_boards, 3);
    assert_eq!(config.effect.ring_scaling, RingScaling::Proportional);
    assert_eq!(config.effect.seed, Some(42));
    assert_eq!(config.tiling.viewport_height, 720.0);

    let origin = config.map.origin();
    assert_eq!(origin.address, KeyAddress::new(0, 27));
    assert_eq!(origin.point, HexCoord::new(-4, 0));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LatticeError::Io(_)));
}

#[test]
fn test_malformed_file_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "{ \"map\": ");
    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, LatticeError::Json(_)));
}

#[test]
fn test_explicit_cli_args_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"{ "map": { "num_boards": 2 }, "tiling": { "margin": 20.0, "rotation": 0.5 } }"#,
    );
    let mut config = Config::load_from_file(&path).unwrap();

    let (cli, matches) = parse_cli(&["--num-boards", "4", "--rotation", "-0.25"]);
    config.merge_from_cli(&cli, &matches);

    assert_eq!(config.map.num_boards, 4);
    assert_eq!(config.tiling.rotation, -0.25);
    // Untouched on the command line, so the file wins over the clap default
    assert_eq!(config.tiling.margin, 20.0);
}

#[test]
fn test_regular_fit_uses_viewport() {
    let (cli, _) = parse_cli(&["--viewport-width", "640", "--margin", "4", "--scale-to-fit"]);
    let fit = cli.tiling.regular_fit(BoardGeometry::lumatone().extent(5));
    assert_eq!(fit.bounds.w, 640.0);
    assert_eq!(fit.bounds.h, 720.0);
    assert_eq!(fit.margin, 4.0);
    assert!(fit.scale_to_fit);
    assert_eq!((fit.widest_row, fit.longest_column), (30, 19));
    assert_eq!((fit.first_column, fit.first_row), (0, 0));
}

#[test]
fn test_skewed_fit_parses_calibration() {
    let (cli, _) = parse_cli(&[
        "--tiling-mode",
        "skewed",
        "--calibration",
        "10,20; 110.5,220 ;-30,4",
        "--row-steps",
        "8",
        "--column-steps",
        "1",
    ]);
    assert_eq!(cli.tiling.tiling_mode, TilingMode::Skewed);

    let fit = cli.tiling.skewed_fit().unwrap();
    assert_eq!(fit.first, Point::new(10.0, 20.0));
    assert_eq!(fit.second, Point::new(110.5, 220.0));
    assert_eq!(fit.third, Point::new(-30.0, 4.0));
    assert_eq!(fit.row_steps, 8);
    assert_eq!(fit.column_steps, 1);
}

#[test]
fn test_bad_calibration_is_config_error() {
    let mut config = Config::default();
    for calibration in ["", "1,2;3,4", "1,2;3,4;5", "1,2;3,x;5,6", "1,2;3,4;5,6;7,8"] {
        config.tiling.calibration = calibration.to_string();
        let err = config.tiling.skewed_fit().unwrap_err();
        assert!(
            matches!(err, LatticeError::Config(_)),
            "'{}' gave {:?}",
            calibration,
            err
        );
    }
}
