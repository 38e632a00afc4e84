//! Traversal of the world graph into generated lookup-table files.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use retrodisc::strg::Strg;
use retrodisc::{AssetSource, Error as DiscError};

use crate::error::GenError;
use crate::game::Game;
use crate::naming::filter_name;
use crate::overrides;
use crate::template::render_table;

/// Walk every world on the disc and write one `<world>.rs` constants file
/// per resolvable world plus an aggregate `world.rs` into `output_dir`.
///
/// World names resolve from the world's name STRG; when that asset is
/// unknown, the per-game override table is consulted, and a world that is
/// still unresolved is skipped with a diagnostic. Area names fall back to
/// the area's internal name, which is always present.
///
/// Only the unknown-asset condition is recovered. Any other failure —
/// I/O, malformed asset data, a name reference of the wrong type —
/// propagates and aborts the run.
pub fn create_asset_id_files<R: Read + Seek>(
    source: &mut AssetSource<R>,
    game: Game,
    output_dir: &Path,
) -> Result<(), GenError> {
    fs::create_dir_all(output_dir)?;

    let mut world_names: BTreeMap<String, u32> = BTreeMap::new();

    for id in source.asset_ids() {
        if &source.asset_type(id)? != b"MLVL" {
            continue;
        }
        let mlvl = source.mlvl(id)?;

        let world_name = match source.strg(mlvl.world_name_id) {
            Ok(strg) => main_string(&strg, mlvl.world_name_id)?,
            Err(DiscError::UnknownAssetId { .. }) => match overrides::world_name(game, id) {
                Some(name) => name.to_owned(),
                None => {
                    eprintln!("[skip] MLVL {id:#010X}: no name found");
                    continue;
                }
            },
            Err(e) => return Err(e.into()),
        };

        let stem = filter_name(&world_name).to_ascii_lowercase();
        if stem.is_empty() {
            eprintln!("[skip] MLVL {id:#010X}: name {world_name:?} filters to nothing");
            continue;
        }

        let mut names: BTreeMap<String, u32> = BTreeMap::new();
        for area in &mlvl.areas {
            let area_name = match source.strg(area.name_id) {
                Ok(strg) => main_string(&strg, area.name_id)?,
                Err(DiscError::UnknownAssetId { .. }) => area.internal_name.clone(),
                Err(e) => return Err(e.into()),
            };
            if names.insert(area_name.clone(), area.mrea_id).is_some() {
                eprintln!(
                    "[warn] {world_name}: duplicate area name {area_name:?}; keeping the last ID"
                );
            }
        }

        fs::write(
            output_dir.join(format!("{stem}.rs")),
            render_table(&names, "_MREA"),
        )?;

        if world_names.insert(world_name.clone(), id).is_some() {
            eprintln!("[warn] duplicate world name {world_name:?}; keeping the last ID");
        }
    }

    fs::write(output_dir.join("world.rs"), render_table(&world_names, "_MLVL"))?;
    Ok(())
}

fn main_string(strg: &Strg, id: u32) -> Result<String, GenError> {
    strg.main_string()
        .map(str::to_owned)
        .ok_or(GenError::EmptyStringTable { id })
}
