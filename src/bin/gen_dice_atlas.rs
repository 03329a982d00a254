//! Render a die's numbered atlas to a PNG for inspection.
//!
//! Usage: `gen_dice_atlas [sides] [out.png]`

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use shelfrolls::dice3d::atlas::build_atlas;
use shelfrolls::dice3d::config::resolve_render_config;
use shelfrolls::dice3d::types::DiceType;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);

    let sides = match args.next() {
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => DiceType::from_sides(n).sides(),
            Err(_) => {
                eprintln!("invalid side count {raw:?}");
                return ExitCode::FAILURE;
            }
        },
        None => 20,
    };
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("dice_atlas_d{sides}.png")));

    let config = resolve_render_config(sides, None);
    let atlas = build_atlas(sides, &config, None);

    if let Err(e) = atlas.bitmap.save(&out) {
        eprintln!("failed to write {}: {e}", out.display());
        return ExitCode::FAILURE;
    }

    println!(
        "Wrote d{sides} atlas ({}x{} tiles) to {}",
        atlas.layout.columns,
        atlas.layout.rows,
        out.display()
    );
    ExitCode::SUCCESS
}
