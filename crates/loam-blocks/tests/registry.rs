use loam_blocks::{AIR, BlockRegistry};
use proptest::prelude::*;

#[test]
fn default_palette_names_resolve() {
    let reg = BlockRegistry::default_palette();
    for name in ["grass", "dirt", "stone", "sand"] {
        let id = reg.id_by_name(name).expect("palette name");
        assert_ne!(id, AIR);
        assert_eq!(reg.get(id).unwrap().name, name);
    }
    assert_eq!(reg.id_by_name("obsidian"), None);
}

#[test]
fn air_has_no_def() {
    let reg = BlockRegistry::default_palette();
    assert!(reg.get(AIR).is_none());
}

#[test]
fn palette_parses_from_toml() {
    let text = r#"
        [[blocks]]
        name = "grass"
        color = [96, 160, 62, 255]

        [[blocks]]
        name = "snow"
    "#;
    let dir = std::env::temp_dir().join("loam-blocks-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("palette.toml");
    std::fs::write(&path, text).unwrap();

    let reg = BlockRegistry::load_from_path(&path).unwrap();
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.color_of(reg.id_by_name("grass").unwrap()), [96, 160, 62, 255]);
    // missing color falls back to the placeholder
    assert_eq!(reg.color_of(reg.id_by_name("snow").unwrap()), [255, 0, 255, 255]);
}

proptest! {
    // every registered name round-trips through its id
    #[test]
    fn names_round_trip(names in proptest::collection::hash_set("[a-z]{1,8}", 1..20)) {
        let defs = names
            .iter()
            .map(|n| loam_blocks::BlockDef { name: n.clone(), color: [1, 2, 3, 255] })
            .collect::<Vec<_>>();
        let reg = BlockRegistry::from_defs(defs);
        for name in &names {
            let id = reg.id_by_name(name).unwrap();
            prop_assert_eq!(&reg.get(id).unwrap().name, name);
        }
    }
}
