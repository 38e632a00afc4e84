use std::fs;

use retrodisc::build::{self, DiscBuilder, PakBuilder};
use retrodisc::{AssetSource, GcDisc};
use varia_core::{create_asset_id_files, Game};

const TEMPLE_GROUNDS: u32 = 0x42B9_35E4;
const FRONTEND: u32 = 0x6980_2220;
const NAMELESS: u32 = 0x0BAD_0BAD;

/// A disc with three worlds: one fully resolvable, one resolved through
/// the override table, one unresolvable (skipped).
fn synthetic_source() -> AssetSource<std::io::Cursor<Vec<u8>>> {
    let temple = build::mlvl(
        0x100,
        &[
            (0x201, 0x1, "01_landing"),
            (0x202, 0x2, "02_hive_a"),
            // Dangling name STRG: the internal name is the fallback.
            (0xBAD1, 0x3, "00_fallback_room"),
        ],
    );
    let frontend = build::mlvl(0xBAD2, &[(0xBAD4, 0x10, "01_menu")]);
    let nameless = build::mlvl(0xBAD3, &[]);

    let pak = PakBuilder::new()
        .named(*b"MLVL", TEMPLE_GROUNDS, "Metroid1")
        .compressed_resource(*b"MLVL", TEMPLE_GROUNDS, temple)
        .resource(*b"MLVL", FRONTEND, frontend)
        .resource(*b"MLVL", NAMELESS, nameless)
        .resource(*b"STRG", 0x100, build::strg(&[(*b"ENGL", &["Temple Grounds"])]))
        .resource(*b"STRG", 0x201, build::strg(&[(*b"ENGL", &["Landing Site"])]))
        .resource(*b"STRG", 0x202, build::strg(&[(*b"ENGL", &["Hive Chamber A"])]))
        .build();

    let image = DiscBuilder::new("Synthetic Echoes")
        .file("Metroid1.pak", pak)
        .build();
    AssetSource::scan(GcDisc::new(std::io::Cursor::new(image)).unwrap()).unwrap()
}

#[test]
fn generates_expected_files() {
    let mut source = synthetic_source();
    let out = tempfile::tempdir().expect("tempdir");

    create_asset_id_files(&mut source, Game::Echoes, out.path()).expect("generate");

    let mut produced: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    produced.sort();
    assert_eq!(produced, ["frontend.rs", "temple_grounds.rs", "world.rs"]);
}

#[test]
fn area_file_matches_expected_output() {
    let mut source = synthetic_source();
    let out = tempfile::tempdir().expect("tempdir");
    create_asset_id_files(&mut source, Game::Echoes, out.path()).expect("generate");

    let content = fs::read_to_string(out.path().join("temple_grounds.rs")).unwrap();
    assert_eq!(
        content,
        "// Generated by varia. Do not edit.\n\
         \n\
         pub const FALLBACK_ROOM_MREA: u32 = 0x00000003;\n\
         pub const HIVE_CHAMBER_A_MREA: u32 = 0x00000002;\n\
         pub const LANDING_SITE_MREA: u32 = 0x00000001;\n\
         \n\
         pub static NAME_TO_ID: &[(&str, u32)] = &[\n\
         \x20   (\"00_fallback_room\", 0x00000003),\n\
         \x20   (\"Hive Chamber A\", 0x00000002),\n\
         \x20   (\"Landing Site\", 0x00000001),\n\
         ];\n"
    );
}

#[test]
fn world_file_uses_override_and_skips_nameless() {
    let mut source = synthetic_source();
    let out = tempfile::tempdir().expect("tempdir");
    create_asset_id_files(&mut source, Game::Echoes, out.path()).expect("generate");

    let world = fs::read_to_string(out.path().join("world.rs")).unwrap();
    assert!(world.contains("pub const FRONTEND_MLVL: u32 = 0x69802220;"));
    assert!(world.contains("pub const TEMPLE_GROUNDS_MLVL: u32 = 0x42B935E4;"));
    assert!(world.contains("(\"FrontEnd\", 0x69802220)"));
    assert!(world.contains("(\"Temple Grounds\", 0x42B935E4)"));
    // The unresolvable world is omitted entirely.
    assert!(!world.contains("0x0BAD0BAD"));

    // The override world still gets an area file, from the internal name.
    let frontend = fs::read_to_string(out.path().join("frontend.rs")).unwrap();
    assert!(frontend.contains("pub const MENU_MREA: u32 = 0x00000010;"));
    assert!(frontend.contains("(\"01_menu\", 0x00000010)"));
}
