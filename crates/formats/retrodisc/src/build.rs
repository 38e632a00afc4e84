//! Builders for synthetic disc images and assets.
//!
//! These produce byte-exact counterparts of what the parsers in this crate
//! read. Tests use them to assemble whole discs in memory instead of
//! depending on retail images.

use std::io::Write as _;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::cursor::Writer;
use crate::disc::{DISC_MAGIC, HEADER_LEN};
use crate::mlvl::{MLVL_MAGIC, MLVL_VERSION};
use crate::strg::{STRG_MAGIC, STRG_VERSION};

/// Builds a minimal but well-formed GameCube disc image.
pub struct DiscBuilder {
    title: String,
    files: Vec<(String, Vec<u8>)>,
}

impl DiscBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            files: Vec::new(),
        }
    }

    /// Add a file at a `/`-separated path. Intermediate directories are
    /// created in the FST as needed.
    pub fn file(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.push((path.to_owned(), data));
        self
    }

    pub fn build(self) -> Vec<u8> {
        assert!(self.title.len() < 0x3E0, "title too long for header field");

        // Build the directory tree preserving insertion order.
        let mut root = DirNode::default();
        for (path, data) in self.files {
            insert(&mut root, &path, data);
        }

        // Flatten to FST entries. Entry 0 is the root.
        let mut entries = vec![FstEntry {
            is_dir: true,
            name: String::new(),
            a: 0,
            b: 0,
        }];
        let mut payloads = Vec::new();
        walk(&root, 0, &mut entries, &mut payloads);
        let count = entries.len();
        entries[0].b = count as u32;

        // String table: root's empty name sits at offset 0.
        let mut strings = Writer::new();
        strings.write_u8(0);
        let mut name_offsets = vec![0u32; count];
        for (i, entry) in entries.iter().enumerate().skip(1) {
            name_offsets[i] = strings.position() as u32;
            strings.write_cstring(&entry.name);
        }
        let strings = strings.into_bytes();

        let fst_offset = HEADER_LEN;
        let fst_size = count * 12 + strings.len();

        // Lay out file payloads after the FST, 32-byte aligned.
        let mut data_offset = fst_offset + fst_size;
        data_offset += (32 - data_offset % 32) % 32;
        let mut file_offsets = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            file_offsets.push(data_offset as u32);
            data_offset += payload.len();
            data_offset += (32 - data_offset % 32) % 32;
        }
        for entry in entries.iter_mut().filter(|e| !e.is_dir) {
            entry.a = file_offsets[entry.b as usize];
            // b still indexes payloads; patch it to the real length below.
        }

        let mut w = Writer::with_capacity(data_offset);

        // Boot header.
        w.write_bytes(b"G2ME");
        w.write_bytes(b"01");
        w.write_u8(0); // disc id
        w.write_u8(0); // version
        w.pad_to(0x1C);
        w.write_u32(DISC_MAGIC);
        w.write_bytes(self.title.as_bytes());
        w.pad_to(0x420);
        w.write_u32(0); // main DOL offset, unused here
        w.write_u32(fst_offset as u32);
        w.write_u32(fst_size as u32);
        w.write_u32(fst_size as u32);
        w.pad_to(HEADER_LEN);

        // FST entries, then the string table.
        let mut payload_idx = 0usize;
        for (i, entry) in entries.iter().enumerate() {
            let flags: u32 = if entry.is_dir { 1 } else { 0 };
            w.write_u32(flags << 24 | name_offsets[i]);
            if entry.is_dir {
                w.write_u32(entry.a);
                w.write_u32(entry.b);
            } else {
                w.write_u32(entry.a);
                w.write_u32(payloads[payload_idx].len() as u32);
                payload_idx += 1;
            }
        }
        w.write_bytes(&strings);

        // File contents.
        for (payload, offset) in payloads.iter().zip(&file_offsets) {
            w.pad_to(*offset as usize);
            w.write_bytes(payload);
        }

        w.into_bytes()
    }
}

#[derive(Default)]
struct DirNode {
    children: Vec<(String, Node)>,
}

enum Node {
    Dir(DirNode),
    File(Vec<u8>),
}

fn insert(dir: &mut DirNode, path: &str, data: Vec<u8>) {
    match path.split_once('/') {
        None => dir.children.push((path.to_owned(), Node::File(data))),
        Some((head, rest)) => {
            let pos = dir
                .children
                .iter()
                .position(|(n, node)| n == head && matches!(node, Node::Dir(_)));
            let idx = match pos {
                Some(i) => i,
                None => {
                    dir.children
                        .push((head.to_owned(), Node::Dir(DirNode::default())));
                    dir.children.len() - 1
                }
            };
            if let Node::Dir(sub) = &mut dir.children[idx].1 {
                insert(sub, rest, data);
            }
        }
    }
}

struct FstEntry {
    is_dir: bool,
    name: String,
    /// Directories: parent index. Files: payload index during `walk`,
    /// patched to the absolute content offset during layout.
    a: u32,
    /// Directories: end index. Files: payload index during layout.
    b: u32,
}

fn walk(dir: &DirNode, parent: usize, entries: &mut Vec<FstEntry>, payloads: &mut Vec<Vec<u8>>) {
    for (name, node) in &dir.children {
        let idx = entries.len();
        match node {
            Node::File(data) => {
                entries.push(FstEntry {
                    is_dir: false,
                    name: name.clone(),
                    a: 0,
                    b: payloads.len() as u32,
                });
                payloads.push(data.clone());
            }
            Node::Dir(sub) => {
                entries.push(FstEntry {
                    is_dir: true,
                    name: name.clone(),
                    a: parent as u32,
                    b: 0,
                });
                walk(sub, idx, entries, payloads);
                entries[idx].b = entries.len() as u32;
            }
        }
    }
}

/// Builds a PAK archive.
#[derive(Default)]
pub struct PakBuilder {
    named: Vec<([u8; 4], u32, String)>,
    /// (compressed flag, fourcc, asset id, stored bytes).
    resources: Vec<(bool, [u8; 4], u32, Vec<u8>)>,
}

impl PakBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named-resource table entry.
    pub fn named(mut self, fourcc: [u8; 4], asset_id: u32, name: &str) -> Self {
        self.named.push((fourcc, asset_id, name.to_owned()));
        self
    }

    /// Add an uncompressed resource.
    pub fn resource(mut self, fourcc: [u8; 4], asset_id: u32, data: Vec<u8>) -> Self {
        self.resources.push((false, fourcc, asset_id, data));
        self
    }

    /// Add a zlib-compressed resource (u32 decompressed size + stream).
    pub fn compressed_resource(mut self, fourcc: [u8; 4], asset_id: u32, data: Vec<u8>) -> Self {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&data).expect("in-memory deflate");
        let stream = enc.finish().expect("in-memory deflate");

        let mut stored = Writer::with_capacity(4 + stream.len());
        stored.write_u32(data.len() as u32);
        stored.write_bytes(&stream);
        self.resources
            .push((true, fourcc, asset_id, stored.into_bytes()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u16(3);
        w.write_u16(5);
        w.write_u32(0);

        w.write_u32(self.named.len() as u32);
        for (fourcc, asset_id, name) in &self.named {
            w.write_fourcc(fourcc);
            w.write_u32(*asset_id);
            w.write_u32(name.len() as u32);
            w.write_bytes(name.as_bytes());
        }

        w.write_u32(self.resources.len() as u32);
        let mut offset = w.position() + self.resources.len() * 20;
        for (compressed, fourcc, asset_id, stored) in &self.resources {
            w.write_u32(u32::from(*compressed));
            w.write_fourcc(fourcc);
            w.write_u32(*asset_id);
            w.write_u32(stored.len() as u32);
            w.write_u32(offset as u32);
            offset += stored.len();
        }
        for (_, _, _, stored) in &self.resources {
            w.write_bytes(stored);
        }

        w.into_bytes()
    }
}

/// Build a STRG asset. Every language must carry the same number of strings.
pub fn strg(tables: &[([u8; 4], &[&str])]) -> Vec<u8> {
    let string_count = tables.first().map(|(_, s)| s.len()).unwrap_or(0);
    assert!(
        tables.iter().all(|(_, s)| s.len() == string_count),
        "all languages must have the same string count"
    );

    let blocks: Vec<Vec<u8>> = tables
        .iter()
        .map(|(_, strings)| {
            let mut block = Writer::new();
            let mut data = Writer::new();
            let table_len = strings.len() * 4;
            for s in strings.iter() {
                block.write_u32((table_len + data.position()) as u32);
                data.write_utf16_cstring(s);
            }
            block.write_bytes(&data.into_bytes());
            block.into_bytes()
        })
        .collect();

    let mut w = Writer::new();
    w.write_u32(STRG_MAGIC);
    w.write_u32(STRG_VERSION);
    w.write_u32(tables.len() as u32);
    w.write_u32(string_count as u32);
    for ((lang, _), block) in tables.iter().zip(&blocks) {
        w.write_fourcc(lang);
        w.write_u32(block.len() as u32);
    }
    for block in &blocks {
        w.write_bytes(block);
    }
    w.into_bytes()
}

/// Build an MLVL asset. `areas` entries are (name STRG ID, MREA ID,
/// internal name).
pub fn mlvl(world_name_id: u32, areas: &[(u32, u32, &str)]) -> Vec<u8> {
    let mut w = Writer::new();
    w.write_u32(MLVL_MAGIC);
    w.write_u32(MLVL_VERSION);
    w.write_u32(world_name_id);
    w.write_u32(0); // dark world name
    w.write_u32(0); // temple key world index
    w.write_u32(0); // save info
    w.write_u32(0); // skybox
    w.write_u32(areas.len() as u32);
    for (i, (name_id, mrea_id, internal_name)) in areas.iter().enumerate() {
        w.write_u32(*name_id);
        for _ in 0..18 {
            w.write_f32(0.0); // transform + bounds
        }
        w.write_u32(*mrea_id);
        w.write_u32(0x0010_0000 + i as u32);
        w.write_u32(0); // attached areas
        w.write_cstring(internal_name);
    }
    w.into_bytes()
}
