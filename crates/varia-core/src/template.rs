//! Rendering of generated constants files.

use std::collections::{BTreeMap, HashMap};

use crate::naming::filter_name;

/// Render a display-name → asset-ID mapping as generated Rust source.
///
/// One `pub const` per entry, named from the filtered display name plus
/// `suffix`, sorted by (pre-filter) display name; then a `NAME_TO_ID`
/// table mapping the original names to their IDs in the same order.
/// Deterministic for a given mapping.
///
/// Names that filter to an empty identifier are dropped with a diagnostic.
/// Display names that collide after filtering keep the last one in sort
/// order, also with a diagnostic.
pub fn render_table(items: &BTreeMap<String, u32>, suffix: &str) -> String {
    let mut consts: Vec<(String, u32)> = Vec::new();
    let mut by_ident: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<(&str, u32)> = Vec::new();

    for (name, &id) in items {
        let ident = filter_name(name);
        if ident.is_empty() {
            eprintln!("[warn] dropping {name:?}: name filters to an empty identifier");
            continue;
        }
        kept.push((name, id));
        match by_ident.get(&ident) {
            Some(&i) => {
                eprintln!("[warn] {name:?} collides with an earlier name on {ident}; keeping the later ID");
                consts[i].1 = id;
            }
            None => {
                by_ident.insert(ident.clone(), consts.len());
                consts.push((ident, id));
            }
        }
    }

    let mut out = String::from("// Generated by varia. Do not edit.\n\n");
    for (ident, id) in &consts {
        out.push_str(&format!("pub const {ident}{suffix}: u32 = {id:#010X};\n"));
    }
    out.push_str("\npub static NAME_TO_ID: &[(&str, u32)] = &[\n");
    for (name, id) in &kept {
        out.push_str(&format!("    (\"{}\", {id:#010X}),\n", name.escape_debug()));
    }
    out.push_str("];\n");
    out
}
