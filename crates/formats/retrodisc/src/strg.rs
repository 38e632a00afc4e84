use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Magic word at the start of every STRG asset.
pub const STRG_MAGIC: u32 = 0x8765_4321;

/// STRG format version this crate understands.
pub const STRG_VERSION: u32 = 0x1;

/// One language's table of strings.
#[derive(Debug, Clone)]
pub struct StringTable {
    /// Language code, e.g. `ENGL`.
    pub lang: [u8; 4],
    pub strings: Vec<String>,
}

/// A parsed localized string table.
#[derive(Debug)]
pub struct Strg {
    /// Per-language tables, in file order. Every table holds the same
    /// number of strings.
    pub tables: Vec<StringTable>,
}

impl Strg {
    /// Parse a STRG asset.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        let magic = c.read_u32()?;
        if magic != STRG_MAGIC {
            return Err(Error::InvalidMagic {
                offset: 0,
                expected: STRG_MAGIC,
                found: magic,
            });
        }
        let version = c.read_u32()?;
        if version != STRG_VERSION {
            return Err(Error::UnsupportedVersion {
                what: "STRG",
                found: version,
                expected: STRG_VERSION,
            });
        }

        let lang_count = c.read_u32()? as usize;
        let string_count = c.read_u32()? as usize;

        // Language table: fourcc + size of that language's block.
        let mut langs = Vec::with_capacity(lang_count);
        for _ in 0..lang_count {
            let lang = c.read_fourcc()?;
            let size = c.read_u32()? as usize;
            langs.push((lang, size));
        }

        // Per-language blocks follow back to back: a table of offsets
        // (relative to the block start), then the string data.
        let mut tables = Vec::with_capacity(lang_count);
        let mut block_start = c.position();
        for (lang, size) in langs {
            let mut block = c.at_offset(block_start);
            let mut offsets = Vec::with_capacity(string_count);
            for _ in 0..string_count {
                offsets.push(block.read_u32()? as usize);
            }
            let mut strings = Vec::with_capacity(string_count);
            for offset in offsets {
                let mut s = c.at_offset(block_start + offset);
                strings.push(s.read_utf16_cstring()?);
            }
            tables.push(StringTable { lang, strings });
            block_start += size;
        }

        Ok(Self { tables })
    }

    /// The canonical display string: the first string of the first table.
    ///
    /// `None` when the asset has no tables or the first table is empty.
    pub fn main_string(&self) -> Option<&str> {
        self.tables
            .first()
            .and_then(|t| t.strings.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    #[test]
    fn single_language_round_trip() {
        let data = build::strg(&[(*b"ENGL", &["Landing Site", "Hive Chamber A"])]);
        let strg = Strg::parse(&data).expect("parse strg");

        assert_eq!(strg.tables.len(), 1);
        assert_eq!(&strg.tables[0].lang, b"ENGL");
        assert_eq!(strg.tables[0].strings, ["Landing Site", "Hive Chamber A"]);
        assert_eq!(strg.main_string(), Some("Landing Site"));
    }

    #[test]
    fn multi_language_blocks() {
        let data = build::strg(&[
            (*b"ENGL", &["Agon Wastes"]),
            (*b"FREN", &["D\u{e9}sert d'Agon"]),
        ]);
        let strg = Strg::parse(&data).expect("parse strg");

        assert_eq!(strg.tables.len(), 2);
        assert_eq!(strg.tables[1].strings, ["D\u{e9}sert d'Agon"]);
        // First table wins for display purposes.
        assert_eq!(strg.main_string(), Some("Agon Wastes"));
    }

    #[test]
    fn non_bmp_characters_survive_utf16() {
        let data = build::strg(&[(*b"ENGL", &["Chozo \u{1F47E} Ruins"])]);
        let strg = Strg::parse(&data).expect("parse strg");
        assert_eq!(strg.main_string(), Some("Chozo \u{1F47E} Ruins"));
    }

    #[test]
    fn empty_table_yields_no_main_string() {
        let data = build::strg(&[(*b"ENGL", &[])]);
        let strg = Strg::parse(&data).expect("parse strg");
        assert_eq!(strg.main_string(), None);
    }
}
