use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::disc::{DiscHeader, FstFile, GcDisc};
use crate::error::{Error, Result};
use crate::mlvl::Mlvl;
use crate::pak::{decode_resource, Pak, ResourceEntry};
use crate::strg::Strg;

struct PakFile {
    file: FstFile,
    pak: Pak,
}

/// Table counts for one PAK, for reporting.
pub struct PakSummary<'a> {
    pub path: &'a str,
    pub resources: usize,
    pub named: usize,
}

/// Asset index spanning every PAK on a disc.
///
/// `scan` parses the tables of each `*.pak` file once; payloads are fetched
/// from the disc on demand with ranged reads. Duplicate asset IDs across
/// PAKs keep the first occurrence — discs duplicate shared resources into
/// each level archive.
pub struct AssetSource<R> {
    disc: GcDisc<R>,
    paks: Vec<PakFile>,
    /// asset ID -> (pak index, resource table index).
    index: HashMap<u32, (usize, usize)>,
}

impl<R: Read + Seek> AssetSource<R> {
    /// Index every PAK on the disc.
    pub fn scan(mut disc: GcDisc<R>) -> Result<Self> {
        let pak_files: Vec<FstFile> = disc
            .files()
            .iter()
            .filter(|f| f.path.to_ascii_lowercase().ends_with(".pak"))
            .cloned()
            .collect();

        let mut paks = Vec::with_capacity(pak_files.len());
        let mut index = HashMap::new();
        for file in pak_files {
            let bytes = disc.read_file(&file)?;
            let pak = Pak::parse(&bytes)?;
            let pak_idx = paks.len();
            for (entry_idx, entry) in pak.resources.iter().enumerate() {
                index.entry(entry.asset_id).or_insert((pak_idx, entry_idx));
            }
            paks.push(PakFile { file, pak });
        }

        Ok(Self { disc, paks, index })
    }

    /// The disc's boot header.
    pub fn header(&self) -> &DiscHeader {
        self.disc.header()
    }

    /// Number of distinct asset IDs on the disc.
    pub fn asset_count(&self) -> usize {
        self.index.len()
    }

    /// All known asset IDs, sorted.
    pub fn asset_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The 4-byte type tag for an asset ID.
    pub fn asset_type(&self, id: u32) -> Result<[u8; 4]> {
        Ok(self.entry(id)?.1.fourcc)
    }

    /// The decoded payload bytes for an asset ID.
    pub fn raw_asset(&mut self, id: u32) -> Result<Vec<u8>> {
        let (file, entry) = {
            let (pak_file, entry) = self.entry(id)?;
            (pak_file.file.clone(), *entry)
        };
        let raw = self.disc.read_range(&file, entry.offset, entry.size as usize)?;
        decode_resource(&raw, entry.compressed, id)
    }

    /// Parse an asset as a world definition.
    pub fn mlvl(&mut self, id: u32) -> Result<Mlvl> {
        self.expect_type(id, *b"MLVL")?;
        Mlvl::parse(&self.raw_asset(id)?)
    }

    /// Parse an asset as a string table.
    pub fn strg(&mut self, id: u32) -> Result<Strg> {
        self.expect_type(id, *b"STRG")?;
        Strg::parse(&self.raw_asset(id)?)
    }

    /// Per-PAK table counts, in disc order.
    pub fn paks(&self) -> impl Iterator<Item = PakSummary<'_>> {
        self.paks.iter().map(|p| PakSummary {
            path: &p.file.path,
            resources: p.pak.resources.len(),
            named: p.pak.named.len(),
        })
    }

    fn entry(&self, id: u32) -> Result<(&PakFile, &ResourceEntry)> {
        self.index
            .get(&id)
            .map(|&(pak_idx, entry_idx)| {
                let pak_file = &self.paks[pak_idx];
                (pak_file, &pak_file.pak.resources[entry_idx])
            })
            .ok_or(Error::UnknownAssetId { id })
    }

    fn expect_type(&self, id: u32, expected: [u8; 4]) -> Result<()> {
        let found = self.asset_type(id)?;
        if found != expected {
            return Err(Error::WrongAssetType {
                id,
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{self, DiscBuilder, PakBuilder};

    fn two_pak_disc() -> AssetSource<std::io::Cursor<Vec<u8>>> {
        let strg = build::strg(&[(*b"ENGL", &["Temple Grounds"])]);
        let pak_a = PakBuilder::new()
            .resource(*b"STRG", 0x100, strg)
            .resource(*b"TXTR", 0x200, vec![1; 8])
            .build();
        // Same TXTR duplicated in a second pak with different content.
        let pak_b = PakBuilder::new()
            .resource(*b"TXTR", 0x200, vec![2; 8])
            .resource(*b"CMDL", 0x300, vec![3; 8])
            .build();
        let image = DiscBuilder::new("Two Paks")
            .file("A.pak", pak_a)
            .file("B.pak", pak_b)
            .build();
        AssetSource::scan(GcDisc::new(std::io::Cursor::new(image)).unwrap()).unwrap()
    }

    #[test]
    fn scan_indexes_all_paks() {
        let source = two_pak_disc();
        assert_eq!(source.asset_ids(), vec![0x100, 0x200, 0x300]);
        assert_eq!(&source.asset_type(0x300).unwrap(), b"CMDL");
    }

    #[test]
    fn duplicate_ids_keep_first_pak() {
        let mut source = two_pak_disc();
        assert_eq!(source.raw_asset(0x200).unwrap(), vec![1; 8]);
    }

    #[test]
    fn typed_lookup_checks_the_tag() {
        let mut source = two_pak_disc();
        let strg = source.strg(0x100).unwrap();
        assert_eq!(strg.main_string(), Some("Temple Grounds"));
        assert!(matches!(
            source.mlvl(0x100),
            Err(Error::WrongAssetType { id: 0x100, .. })
        ));
    }

    #[test]
    fn unknown_id_is_distinguished() {
        let mut source = two_pak_disc();
        assert!(matches!(
            source.raw_asset(0xDEAD),
            Err(Error::UnknownAssetId { id: 0xDEAD })
        ));
    }
}
