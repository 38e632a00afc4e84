use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Magic word at the start of every MLVL asset.
pub const MLVL_MAGIC: u32 = 0xDEAF_BABE;

/// MLVL format version this crate understands.
pub const MLVL_VERSION: u32 = 0x17;

/// One area within a world.
#[derive(Debug, Clone)]
pub struct MlvlArea {
    /// STRG asset holding the area's display name.
    pub name_id: u32,
    /// The area's MREA asset ID.
    pub mrea_id: u32,
    /// Internal area ID (stable across repacks).
    pub internal_id: u32,
    /// Non-localized editor name, always present.
    pub internal_name: String,
}

/// A parsed world definition.
#[derive(Debug)]
pub struct Mlvl {
    /// STRG asset holding the world's display name.
    pub world_name_id: u32,
    /// STRG asset for the dark-world variant name.
    pub dark_name_id: u32,
    /// Index of this world in the temple key ordering.
    pub temple_key_world: u32,
    /// SAVW asset for this world.
    pub save_info_id: u32,
    /// CMDL asset used as the default skybox.
    pub skybox_id: u32,
    /// Areas in world order.
    pub areas: Vec<MlvlArea>,
}

impl Mlvl {
    /// Parse an MLVL asset.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        let magic = c.read_u32()?;
        if magic != MLVL_MAGIC {
            return Err(Error::InvalidMagic {
                offset: 0,
                expected: MLVL_MAGIC,
                found: magic,
            });
        }
        let version = c.read_u32()?;
        if version != MLVL_VERSION {
            return Err(Error::UnsupportedVersion {
                what: "MLVL",
                found: version,
                expected: MLVL_VERSION,
            });
        }

        let world_name_id = c.read_u32()?;
        let dark_name_id = c.read_u32()?;
        let temple_key_world = c.read_u32()?;
        let save_info_id = c.read_u32()?;
        let skybox_id = c.read_u32()?;

        let area_count = c.read_u32()? as usize;
        let mut areas = Vec::with_capacity(area_count);
        for _ in 0..area_count {
            areas.push(Self::parse_area(&mut c)?);
        }

        Ok(Self {
            world_name_id,
            dark_name_id,
            temple_key_world,
            save_info_id,
            skybox_id,
            areas,
        })
    }

    fn parse_area(c: &mut Cursor<'_>) -> Result<MlvlArea> {
        let name_id = c.read_u32()?;
        // Area transform (3x4) and bounding box, not needed for name extraction.
        c.skip(12 * 4)?;
        c.skip(6 * 4)?;
        let mrea_id = c.read_u32()?;
        let internal_id = c.read_u32()?;

        let attached_count = c.read_u32()? as usize;
        c.skip(attached_count * 2)?;

        let internal_name = c.read_cstring()?;

        Ok(MlvlArea {
            name_id,
            mrea_id,
            internal_id,
            internal_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    #[test]
    fn world_round_trip() {
        let data = build::mlvl(
            0x100,
            &[
                (0x201, 0x9301, "01_Over_Mainplaza"),
                (0x202, 0x9302, "02_Over_Hall"),
            ],
        );
        let mlvl = Mlvl::parse(&data).expect("parse mlvl");

        assert_eq!(mlvl.world_name_id, 0x100);
        assert_eq!(mlvl.areas.len(), 2);
        assert_eq!(mlvl.areas[0].name_id, 0x201);
        assert_eq!(mlvl.areas[0].mrea_id, 0x9301);
        assert_eq!(mlvl.areas[1].internal_name, "02_Over_Hall");
    }

    #[test]
    fn bad_version_is_rejected() {
        let mut data = build::mlvl(0x100, &[]);
        data[7] = 0x11;
        assert!(matches!(
            Mlvl::parse(&data),
            Err(Error::UnsupportedVersion { what: "MLVL", .. })
        ));
    }
}
