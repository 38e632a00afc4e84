use std::io::Read;

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// PAK format version, major.minor.
const PAK_VERSION: (u16, u16) = (3, 5);

/// An entry in the named-resource table (assets reachable by name).
#[derive(Debug, Clone)]
pub struct NamedResource {
    pub fourcc: [u8; 4],
    pub asset_id: u32,
    pub name: String,
}

/// An entry in the resource table.
#[derive(Debug, Clone, Copy)]
pub struct ResourceEntry {
    pub compressed: bool,
    pub fourcc: [u8; 4],
    pub asset_id: u32,
    /// Stored size in bytes (compressed size when `compressed`).
    pub size: u32,
    /// Absolute offset of the stored bytes within the PAK.
    pub offset: u32,
}

/// Parsed PAK tables. Resource payloads are not retained; fetch them with
/// [`Pak::resource_data`] or a ranged read of the backing file.
#[derive(Debug)]
pub struct Pak {
    pub named: Vec<NamedResource>,
    pub resources: Vec<ResourceEntry>,
}

impl Pak {
    /// Parse the header and both tables from PAK bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);
        let major = c.read_u16()?;
        let minor = c.read_u16()?;
        if (major, minor) != PAK_VERSION {
            return Err(Error::UnsupportedVersion {
                what: "PAK",
                found: (u32::from(major) << 16) | u32::from(minor),
                expected: (u32::from(PAK_VERSION.0) << 16) | u32::from(PAK_VERSION.1),
            });
        }
        let _reserved = c.read_u32()?;

        let named_count = c.read_u32()? as usize;
        let mut named = Vec::with_capacity(named_count);
        for _ in 0..named_count {
            let fourcc = c.read_fourcc()?;
            let asset_id = c.read_u32()?;
            let name_len = c.read_u32()? as usize;
            let offset = c.position();
            let name_bytes = c.read_bytes(name_len)?;
            let name = String::from_utf8(name_bytes.to_vec())
                .map_err(|e| Error::InvalidString { offset, source: e })?;
            named.push(NamedResource {
                fourcc,
                asset_id,
                name,
            });
        }

        let resource_count = c.read_u32()? as usize;
        let mut resources = Vec::with_capacity(resource_count);
        for _ in 0..resource_count {
            let compressed = c.read_u32()? != 0;
            let fourcc = c.read_fourcc()?;
            let asset_id = c.read_u32()?;
            let size = c.read_u32()?;
            let offset = c.read_u32()?;
            resources.push(ResourceEntry {
                compressed,
                fourcc,
                asset_id,
                size,
                offset,
            });
        }

        Ok(Self { named, resources })
    }

    /// Find a resource table entry by asset ID. Returns the first match.
    pub fn find(&self, asset_id: u32) -> Option<&ResourceEntry> {
        self.resources.iter().find(|r| r.asset_id == asset_id)
    }

    /// Fetch and decode a resource's payload from the full PAK bytes.
    pub fn resource_data(&self, entry: &ResourceEntry, data: &[u8]) -> Result<Vec<u8>> {
        let start = entry.offset as usize;
        let end = start + entry.size as usize;
        if end > data.len() {
            return Err(Error::UnexpectedEof {
                offset: start,
                need: entry.size as usize,
                have: data.len().saturating_sub(start),
            });
        }
        decode_resource(&data[start..end], entry.compressed, entry.asset_id)
    }
}

/// Decode a resource's stored bytes.
///
/// Compressed resources are a u32 decompressed size followed by a zlib
/// stream; the inflated length is checked against the header.
pub fn decode_resource(raw: &[u8], compressed: bool, asset_id: u32) -> Result<Vec<u8>> {
    if !compressed {
        return Ok(raw.to_vec());
    }
    let mut c = Cursor::new(raw);
    let expected = c.read_u32()? as usize;
    let stream = &raw[c.position()..];
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(stream)
        .read_to_end(&mut out)
        .map_err(|e| Error::Decompress {
            id: asset_id,
            source: e,
        })?;
    if out.len() != expected {
        return Err(Error::DecompressedSize {
            id: asset_id,
            expected,
            actual: out.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::PakBuilder;

    #[test]
    fn tables_round_trip() {
        let data = PakBuilder::new()
            .named(*b"MLVL", 0x42B935E4, "Metroid3")
            .resource(*b"MLVL", 0x42B935E4, vec![1, 2, 3, 4])
            .resource(*b"STRG", 0x00000099, vec![9; 10])
            .build();
        let pak = Pak::parse(&data).expect("parse pak");

        assert_eq!(pak.named.len(), 1);
        assert_eq!(pak.named[0].name, "Metroid3");
        assert_eq!(pak.resources.len(), 2);

        let entry = pak.find(0x42B935E4).expect("entry");
        assert_eq!(&entry.fourcc, b"MLVL");
        assert_eq!(pak.resource_data(entry, &data).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn compressed_resource_inflates() {
        let payload: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
        let data = PakBuilder::new()
            .compressed_resource(*b"MREA", 0x1000_0001, payload.clone())
            .build();
        let pak = Pak::parse(&data).expect("parse pak");

        let entry = pak.find(0x1000_0001).expect("entry");
        assert!(entry.compressed);
        assert!((entry.size as usize) < payload.len());
        assert_eq!(pak.resource_data(entry, &data).unwrap(), payload);
    }

    #[test]
    fn truncated_stream_is_a_decompress_error() {
        let data = PakBuilder::new()
            .compressed_resource(*b"MREA", 0x2, vec![7; 1024])
            .build();
        let pak = Pak::parse(&data).expect("parse pak");
        let entry = pak.find(0x2).expect("entry");

        // Chop the tail off the zlib stream.
        let start = entry.offset as usize;
        let truncated = &data[start..start + entry.size as usize - 4];
        assert!(matches!(
            decode_resource(truncated, true, 0x2),
            Err(Error::Decompress { id: 0x2, .. })
        ));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut data = PakBuilder::new().build();
        data[1] = 4; // major 3 -> 0x0304
        assert!(matches!(
            Pak::parse(&data),
            Err(Error::UnsupportedVersion { what: "PAK", .. })
        ));
    }
}
