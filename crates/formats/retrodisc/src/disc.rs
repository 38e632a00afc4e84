use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Magic word at offset 0x1C of every GameCube disc.
pub const DISC_MAGIC: u32 = 0xC233_9F3D;

/// Size of the boot header block at the start of the disc.
pub const HEADER_LEN: usize = 0x440;

/// Boot header fields relevant to asset extraction.
#[derive(Debug, Clone)]
pub struct DiscHeader {
    /// Console/game/region code, e.g. `G2ME`.
    pub game_code: [u8; 4],
    /// Publisher code, e.g. `01`.
    pub maker_code: [u8; 2],
    /// Disc number within a multi-disc set.
    pub disc_id: u8,
    /// Game revision.
    pub version: u8,
    /// Game title from the header, NUL padding stripped.
    pub game_title: String,
    /// Absolute offset of the FST.
    pub fst_offset: u32,
    /// Size of the FST in bytes.
    pub fst_size: u32,
}

impl DiscHeader {
    /// Game code as a string (for display).
    pub fn game_code_str(&self) -> &str {
        std::str::from_utf8(&self.game_code).unwrap_or("????")
    }
}

/// A file entry from the FST, with its full `/`-joined path.
#[derive(Debug, Clone)]
pub struct FstFile {
    pub path: String,
    /// Absolute offset of the file content on disc.
    pub offset: u32,
    /// File size in bytes.
    pub size: u32,
}

/// A GameCube disc image over any seekable reader.
///
/// The boot header and FST are parsed eagerly; file contents are read on
/// demand, so a full-size retail image never has to fit in memory.
pub struct GcDisc<R> {
    reader: R,
    header: DiscHeader,
    files: Vec<FstFile>,
}

impl GcDisc<File> {
    /// Open a disc image from a path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> GcDisc<R> {
    /// Parse the boot header and FST from a seekable reader.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut header_buf = [0u8; HEADER_LEN];
        reader.seek(SeekFrom::Start(0))?;
        reader.read_exact(&mut header_buf)?;
        let header = parse_header(&header_buf)?;

        let mut fst = vec![0u8; header.fst_size as usize];
        reader.seek(SeekFrom::Start(header.fst_offset as u64))?;
        reader.read_exact(&mut fst)?;
        let files = parse_fst(&fst)?;

        Ok(Self {
            reader,
            header,
            files,
        })
    }

    /// Boot header fields.
    pub fn header(&self) -> &DiscHeader {
        &self.header
    }

    /// All files on the disc, in FST order.
    pub fn files(&self) -> &[FstFile] {
        &self.files
    }

    /// Find a file by its full path.
    pub fn find(&self, path: &str) -> Option<&FstFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Read a whole file by path.
    pub fn read(&mut self, path: &str) -> Result<Vec<u8>> {
        let entry = self
            .find(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound {
                path: path.to_owned(),
            })?;
        self.read_file(&entry)
    }

    /// Read a whole file's content.
    pub fn read_file(&mut self, file: &FstFile) -> Result<Vec<u8>> {
        self.read_range(file, 0, file.size as usize)
    }

    /// Read `len` bytes starting `offset` bytes into a file.
    pub fn read_range(&mut self, file: &FstFile, offset: u32, len: usize) -> Result<Vec<u8>> {
        let end = offset as usize + len;
        if end > file.size as usize {
            return Err(Error::UnexpectedEof {
                offset: offset as usize,
                need: len,
                have: (file.size as usize).saturating_sub(offset as usize),
            });
        }
        let mut buf = vec![0u8; len];
        self.reader
            .seek(SeekFrom::Start(file.offset as u64 + offset as u64))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

fn parse_header(buf: &[u8]) -> Result<DiscHeader> {
    let mut c = Cursor::new(buf);
    let game_code = c.read_fourcc()?;
    let maker = c.read_bytes(2)?;
    let maker_code = [maker[0], maker[1]];
    let disc_id = c.read_u8()?;
    let version = c.read_u8()?;

    c.seek(0x1C);
    let magic = c.read_u32()?;
    if magic != DISC_MAGIC {
        return Err(Error::InvalidMagic {
            offset: 0x1C,
            expected: DISC_MAGIC,
            found: magic,
        });
    }

    // Title field is 0x3E0 bytes of NUL-padded ASCII at 0x20.
    let title_bytes = c.read_bytes(0x3E0)?;
    let title_end = title_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(title_bytes.len());
    let game_title = String::from_utf8(title_bytes[..title_end].to_vec())
        .map_err(|e| Error::InvalidString {
            offset: 0x20,
            source: e,
        })?;

    c.seek(0x424);
    let fst_offset = c.read_u32()?;
    let fst_size = c.read_u32()?;

    Ok(DiscHeader {
        game_code,
        maker_code,
        disc_id,
        version,
        game_title,
        fst_offset,
        fst_size,
    })
}

/// Flatten the FST into a list of files with full paths.
///
/// Entries are 12 bytes: a flag byte (0 file, 1 directory), a 24-bit offset
/// into the trailing string table, and two u32 fields. For files these are
/// the content offset and length; for directories, the parent index and the
/// index one past the last descendant. Entry 0 is the root directory and its
/// second field holds the total entry count.
fn parse_fst(fst: &[u8]) -> Result<Vec<FstFile>> {
    let mut c = Cursor::new(fst);
    let root_word = c.read_u32()?;
    if root_word >> 24 != 1 {
        return Err(Error::Parse {
            context: "FST",
            message: "root entry is not a directory".to_owned(),
        });
    }
    let _root_parent = c.read_u32()?;
    let count = c.read_u32()? as usize;

    let strings_start = count * 12;
    if strings_start > fst.len() {
        return Err(Error::UnexpectedEof {
            offset: 0,
            need: strings_start,
            have: fst.len(),
        });
    }

    let mut files = Vec::new();
    // Directory stack: (end index, accumulated path prefix). The root entry
    // spans the whole FST and is never popped.
    let mut dirs: Vec<(usize, String)> = vec![(count, String::new())];

    for i in 1..count {
        while dirs.len() > 1 && dirs.last().is_some_and(|(end, _)| i >= *end) {
            dirs.pop();
        }
        let prefix = dirs.last().map(|(_, p)| p.clone()).unwrap_or_default();

        let mut e = c.at_offset(i * 12);
        let word = e.read_u32()?;
        let is_dir = word >> 24 != 0;
        let name_offset = (word & 0x00FF_FFFF) as usize;
        let a = e.read_u32()?;
        let b = e.read_u32()?;

        let mut name_cursor = c.at_offset(strings_start + name_offset);
        let name = name_cursor.read_cstring()?;

        if is_dir {
            dirs.push((b as usize, format!("{prefix}{name}/")));
        } else {
            files.push(FstFile {
                path: format!("{prefix}{name}"),
                offset: a,
                size: b,
            });
        }
    }

    Ok(files)
}
