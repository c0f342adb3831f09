use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keylattice::effect::EditCommand;
use keylattice::error::LatticeResult;
use keylattice::hex::HexCoord;
use keylattice::hexmap::{KeyAddress, MappedKey};
use keylattice::tiling::Point;
use serde::Serialize;
use std::path::Path;

fn new_table(headers: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let columns = headers.len();
    table.set_header(headers);
    for i in 0..columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

pub fn map_table(keys: &[MappedKey]) {
    let mut table = new_table(vec![
        Cell::new("Board").add_attribute(Attribute::Bold),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("q").fg(Color::Cyan),
        Cell::new("r").fg(Color::Cyan),
    ]);

    for k in keys {
        table.add_row(vec![
            Cell::new(k.address.board),
            Cell::new(k.address.key),
            Cell::new(k.point.q),
            Cell::new(k.point.r),
        ]);
    }
    println!("{table}");
}

pub fn ring_table(rows: &[(HexCoord, KeyAddress)]) {
    let mut table = new_table(vec![
        Cell::new("#"),
        Cell::new("Point").fg(Color::Cyan),
        Cell::new("Key").add_attribute(Attribute::Bold),
    ]);

    for (i, (point, address)) in rows.iter().enumerate() {
        let key_cell = if address.is_valid() {
            Cell::new(address).fg(Color::Green)
        } else {
            Cell::new(address).fg(Color::DarkGrey)
        };
        table.add_row(vec![Cell::new(i), Cell::new(point), key_cell]);
    }
    println!("{table}");
}

pub fn effect_table(commands: &[EditCommand]) {
    let mut table = new_table(vec![
        Cell::new("#"),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Colour"),
        Cell::new("Alpha"),
    ]);

    for (i, c) in commands.iter().enumerate() {
        let rgb = format!("#{:02x}{:02x}{:02x}", c.color.r, c.color.g, c.color.b);
        table.add_row(vec![
            Cell::new(i),
            Cell::new(c.address),
            Cell::new(rgb).fg(Color::Rgb {
                r: c.color.r,
                g: c.color.g,
                b: c.color.b,
            }),
            Cell::new(c.color.a),
        ]);
    }
    println!("{table}");
}

pub fn positions_table(rows: &[(MappedKey, Point)]) {
    let mut table = new_table(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Hex").fg(Color::Cyan),
        Cell::new("x"),
        Cell::new("y"),
    ]);

    for (k, p) in rows {
        table.add_row(vec![
            Cell::new(k.address),
            Cell::new(k.point),
            Cell::new(format!("{:.2}", p.x)),
            Cell::new(format!("{:.2}", p.y)),
        ]);
    }
    println!("{table}");
}

#[derive(Debug, Serialize)]
struct PositionRecord {
    board: u8,
    key: u8,
    q: i32,
    r: i32,
    x: f32,
    y: f32,
}

pub fn write_positions_csv(path: &Path, rows: &[(MappedKey, Point)]) -> LatticeResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (k, p) in rows {
        writer.serialize(PositionRecord {
            board: k.address.board,
            key: k.address.key,
            q: k.point.q,
            r: k.point.r,
            x: p.x,
            y: p.y,
        })?;
    }
    writer.flush()?;
    Ok(())
}
