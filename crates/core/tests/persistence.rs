//! On-disk persistence tests
//!
//! These tests write real files into a temporary directory and read them
//! back through `VarStore`, covering both plain and gzip framing.

use dynvar_core::{StoreConfig, Value, Variant, VarMap, VarStore};
use std::fs;
use tempfile::tempdir;

fn sample_map() -> VarMap {
    let mut map = VarMap::new();
    map.put("enabled", true)
        .put("ratio", 0.25f32)
        .put("threshold", 1.5e-3)
        .put("id", 9_007_199_254_740_993i64)
        .put("count", -12)
        .put("title", "hello = world");
    map
}

#[test]
fn test_plain_round_trip() {
    let dir = tempdir().unwrap();
    let store = VarStore::new(dir.path().join("vars.ini"));
    let map = sample_map();

    assert!(store.save(&map));
    let text = fs::read_to_string(store.path()).unwrap();
    assert!(!text.ends_with('\n'));
    assert_eq!(text.lines().count(), map.len());

    let mut loaded = VarMap::new();
    assert!(store.load(&mut loaded));
    assert_eq!(loaded, map);
}

#[test]
fn test_gzip_round_trip() {
    let dir = tempdir().unwrap();
    let store = VarStore::gzip(dir.path().join("vars.ini.gz")).with_compression_level(9);
    let map = sample_map();

    store.try_save(&map).unwrap();
    let raw = fs::read(store.path()).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);

    let mut loaded = VarMap::new();
    let report = store.try_load(&mut loaded).unwrap();
    assert_eq!(report.loaded, map.len());
    assert_eq!(loaded, map);
}

#[test]
fn test_round_trip_keeps_variants() {
    let dir = tempdir().unwrap();
    let store = VarStore::new(dir.path().join("vars.ini"));
    store.save(&sample_map());

    let mut loaded = VarMap::new();
    store.load(&mut loaded);
    let variants: Vec<Variant> = loaded.iter().map(|(_, var)| var.variant()).collect();
    assert_eq!(
        variants,
        vec![
            Variant::Boolean,
            Variant::Float,
            Variant::Double,
            Variant::Long,
            Variant::Int,
            Variant::String,
        ]
    );
}

#[test]
fn test_reload_keeps_live_time_field() {
    let dir = tempdir().unwrap();
    let store = VarStore::new(dir.path().join("times.ini"));

    let mut vars = VarMap::new();
    let stamp = vars.get_var_time_or("last_sync", 1_700_000_000_000);
    assert!(store.save(&vars));
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "$$last_sync=1700000000000"
    );

    stamp.set(5i64);
    assert!(store.load(&mut vars));

    let reloaded = vars.get("last_sync");
    assert!(reloaded.ptr_eq(&stamp));
    assert_eq!(reloaded.variant(), Variant::Time);
    assert_eq!(stamp.get_time(), 1_700_000_000_000);
}

#[test]
fn test_missing_file_is_not_an_error_for_callers() {
    let dir = tempdir().unwrap();
    let store = VarStore::new(dir.path().join("never-written.ini"));

    let mut map = VarMap::new();
    map.put("existing", "value");
    assert!(!store.load(&mut map));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_string("existing"), "value");
}

#[test]
fn test_comment_and_blank_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hand.ini");
    fs::write(&path, "# comment\n\nkey=value").unwrap();

    let mut map = VarMap::new();
    let report = VarStore::new(&path).try_load(&mut map).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_value("key"), Some(Value::from("value")));
}

#[test]
fn test_malformed_line_is_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed.ini");
    fs::write(&path, "$port=8080\n$=1\n^debug=true\n&name=svc").unwrap();

    let mut map = VarMap::new();
    let report = VarStore::new(&path).try_load(&mut map).unwrap();
    assert_eq!(report.loaded, 3);
    assert_eq!(report.malformed, 1);
    assert_eq!(map.get_int("port"), 8080);
    assert!(map.get_bool("debug"));
    assert_eq!(map.get_string("name"), "svc");
}

#[test]
fn test_hand_authored_file_infers_types() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hand.ini");
    fs::write(
        &path,
        "// settings\r\nverbose=False\r\nretries=3\r\nscale=2.5\r\nmotd=hi there\r\n",
    )
    .unwrap();

    let mut map = VarMap::new();
    assert!(VarStore::new(&path).load(&mut map));
    assert_eq!(map.get_value("verbose"), Some(Value::Bool(false)));
    assert_eq!(map.get_value("retries"), Some(Value::Int(3)));
    assert_eq!(map.get_value("scale"), Some(Value::Double(2.5)));
    assert_eq!(map.get_value("motd"), Some(Value::from("hi there")));
}

#[test]
fn test_store_from_toml_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("dynvar.toml");
    fs::write(&config_path, "path = \"state.gz\"\ngzip = true\n").unwrap();

    let config = StoreConfig::load(&config_path).unwrap();
    let store = VarStore::from_config(&config);
    assert!(store.is_gzip());
    assert_eq!(store.path(), dir.path().join("state.gz"));

    let mut map = VarMap::new();
    map.put("k", 1);
    assert!(store.save(&map));
    assert!(dir.path().join("state.gz").exists());
}

#[test]
fn test_counter_survives_restart() {
    let dir = tempdir().unwrap();
    let store = VarStore::new(dir.path().join("session.ini"));

    for run in 1..=3 {
        let mut vars = VarMap::new();
        store.load(&mut vars);
        vars.get_var_long("launches").add(1).unwrap();
        vars.get_var_time("first_seen");
        assert!(store.save(&vars));
        assert_eq!(vars.get_long("launches"), run);
    }

    let mut vars = VarMap::new();
    store.load(&mut vars);
    assert_eq!(vars.get_long("launches"), 3);
    assert!(vars.get_time("first_seen") > 0);
}
