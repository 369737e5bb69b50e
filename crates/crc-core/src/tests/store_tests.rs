//! Tests for loading profiles from disk and matching them against queries

use super::fixtures::*;
use crate::ProfileStore;
use crate::profile::{FixedDir, InstallDirLookup, LocalAppDataDir, contains_ignore_case};
use proptest::prelude::*;
use std::sync::Arc;
use tracing_test::traced_test;

fn ids(profiles: &[crate::Profile]) -> Vec<&str> {
    profiles.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_new_store_is_empty() {
    let dir = profile_dir(JFK_PROFILES);
    let store = ProfileStore::new(FixedDir::new(dir.path()));

    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.get_matching(None).is_empty());
    assert!(store.get_matching(Some("jfk")).is_empty());
}

#[test]
fn test_load_reads_every_json_file() {
    let dir = profile_dir(JFK_PROFILES);
    let store = ProfileStore::new(FixedDir::new(dir.path()));

    assert_eq!(store.load(), 2);

    let all = store.get_matching(None);
    assert_eq!(ids(&all), vec!["A1", "A2"]);
    assert_eq!(all[0].file_path, dir.path().join("p1.json"));
    assert_eq!(all[1].file_path, dir.path().join("p2.json"));
}

#[test]
fn test_load_ignores_non_json_files_and_subdirectories() {
    let dir = profile_dir(&[
        ("p1.json", profile_json("A1", "Alpha").as_str()),
        ("notes.txt", profile_json("T1", "Text").as_str()),
        ("p1.json.bak", profile_json("B1", "Backup").as_str()),
    ]);
    let nested = dir.path().join("archive");
    std::fs::create_dir(&nested).unwrap();
    write_profiles(&nested, &[("old.json", profile_json("O1", "Old").as_str())]);

    let store = loaded_store(dir.path());
    assert_eq!(ids(&store.get_matching(None)), vec!["A1"]);
}

#[test]
fn test_load_accepts_uppercase_extension() {
    let dir = profile_dir(&[("P1.JSON", profile_json("A1", "Alpha").as_str())]);
    let store = loaded_store(dir.path());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_load_skips_malformed_file() {
    let dir = profile_dir(&[
        ("a.json", profile_json("A1", "Alpha").as_str()),
        ("b.json", "{ this is not json"),
        ("c.json", "[1, 2, 3]"),
        ("d.json", r#"{"id": "D1", "version": "not a number"}"#),
        ("e.json", profile_json("E1", "Echo").as_str()),
    ]);

    let store = loaded_store(dir.path());
    assert_eq!(ids(&store.get_matching(None)), vec!["A1", "E1"]);
}

#[test]
#[traced_test]
fn test_load_logs_skipped_file_and_total() {
    let dir = profile_dir(&[
        ("a.json", profile_json("A1", "Alpha").as_str()),
        ("broken.json", "{"),
    ]);

    loaded_store(dir.path());

    assert!(logs_contain("Error loading profile"));
    assert!(logs_contain("broken.json"));
    assert!(logs_contain("Loaded 1 profiles."));
}

#[test]
fn test_load_accepts_byte_order_mark_and_latin1_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut with_bom = b"\xEF\xBB\xBF".to_vec();
    with_bom.extend_from_slice(br#"{"id":"A1","name":"JFK Approach"}"#);
    std::fs::write(dir.path().join("p1.json"), with_bom).unwrap();
    std::fs::write(
        dir.path().join("p2.json"),
        b"{\"id\":\"A2\",\"name\":\"Montr\xE9al Center\"}",
    )
    .unwrap();

    let store = loaded_store(dir.path());
    assert_eq!(ids(&store.get_matching(None)), vec!["A1", "A2"]);
    assert_eq!(
        store.find_by_id("A2").unwrap().name.as_deref(),
        Some("Montr\u{FFFD}al Center")
    );
    assert_eq!(ids(&store.get_matching(Some("jfk"))), vec!["A1"]);
}

#[test]
fn test_load_keeps_extra_fields_out() {
    let dir = profile_dir(&[(
        "a.json",
        r#"{"Id": "A1", "Name": "Alpha", "windowLayout": {"x": 1}, "filePath": "elsewhere.json"}"#,
    )]);

    let store = loaded_store(dir.path());
    let profile = store.find_by_id("A1").unwrap();
    assert_eq!(profile.name.as_deref(), Some("Alpha"));
    assert_eq!(profile.file_path, dir.path().join("a.json"));
}

#[test]
fn test_load_preserves_controller_info() {
    let dir = profile_dir(&[(
        "a.json",
        r#"{"id": "A1", "controllerInfo": {"cid": 1, "facilities": ["ZNY", "N90"]}}"#,
    )]);

    let store = loaded_store(dir.path());
    let profile = store.find_by_id("A1").unwrap();
    assert_eq!(
        profile.controller_info,
        Some(serde_json::json!({"cid": 1, "facilities": ["ZNY", "N90"]}))
    );
}

#[test]
#[traced_test]
fn test_load_missing_directory_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(FixedDir::new(dir.path().join("Profiles")));

    assert_eq!(store.load(), 0);
    assert!(store.is_empty());
    assert!(logs_contain("Profile folder not found"));
}

#[test]
fn test_load_unresolved_directory_leaves_store_empty() {
    let store = ProfileStore::new(InstallDirLookup::new(|| None::<String>));
    assert_eq!(store.resolve_profile_directory(), None);
    assert_eq!(store.load(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_load_through_install_dir_setting() {
    let install = tempfile::tempdir().unwrap();
    let profiles = install.path().join("Profiles");
    std::fs::create_dir(&profiles).unwrap();
    write_profiles(&profiles, JFK_PROFILES);

    let install_dir = install.path().to_string_lossy().into_owned();
    let store = ProfileStore::new(InstallDirLookup::new(move || Some(install_dir.clone())));

    assert_eq!(store.resolve_profile_directory(), Some(profiles.clone()));
    assert_eq!(store.load(), 2);
}

#[test]
fn test_load_through_local_app_data() {
    let base = tempfile::tempdir().unwrap();
    let profiles = base.path().join("CRC").join("Profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    write_profiles(&profiles, &[("p.json", profile_json("L1", "Local").as_str())]);

    let store = ProfileStore::new(LocalAppDataDir::with_base(base.path()));
    assert_eq!(store.load(), 1);
}

#[test]
fn test_reload_replaces_previous_generation() {
    let dir = profile_dir(JFK_PROFILES);
    let store = loaded_store(dir.path());
    let before = store.profiles();

    std::fs::remove_file(dir.path().join("p1.json")).unwrap();
    write_profiles(dir.path(), &[("p3.json", profile_json("A3", "Newark Tower").as_str())]);
    assert_eq!(store.load(), 2);

    assert_eq!(ids(&store.get_matching(None)), vec!["A2", "A3"]);
    // Earlier snapshots stay intact
    assert_eq!(ids(&before), vec!["A1", "A2"]);
}

#[test]
fn test_reload_after_directory_removed_empties_store() {
    let dir = profile_dir(JFK_PROFILES);
    let path = dir.path().to_path_buf();
    let store = loaded_store(&path);
    assert_eq!(store.len(), 2);

    drop(dir);
    assert_eq!(store.load(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_get_matching_blank_queries_return_everything_in_order() {
    let dir = profile_dir(&[
        ("1.json", profile_json("Z", "Zulu").as_str()),
        ("2.json", profile_json("A", "Alpha").as_str()),
        ("3.json", r#"{"id": "N"}"#),
    ]);
    let store = loaded_store(dir.path());

    for query in [None, Some(""), Some("   "), Some("\t\n")] {
        assert_eq!(ids(&store.get_matching(query)), vec!["Z", "A", "N"]);
    }
}

#[test]
fn test_get_matching_jfk_example() {
    let dir = profile_dir(JFK_PROFILES);
    let store = loaded_store(dir.path());

    let matches = store.get_matching(Some("jfk"));
    assert_eq!(ids(&matches), vec!["A1", "A2"]);

    let matches = store.get_matching(Some("JFK"));
    assert_eq!(ids(&matches), vec!["A1", "A2"]);

    let matches = store.get_matching(Some("ground"));
    assert_eq!(ids(&matches), vec!["A2"]);
}

#[test]
fn test_get_matching_skips_unnamed_profiles() {
    let dir = profile_dir(&[
        ("1.json", r#"{"id": "N1"}"#),
        ("2.json", r#"{"id": "N2", "name": null}"#),
        ("3.json", profile_json("A1", "Alpha").as_str()),
    ]);
    let store = loaded_store(dir.path());

    assert_eq!(ids(&store.get_matching(Some("a"))), vec!["A1"]);
}

#[test]
fn test_get_matching_query_is_not_trimmed() {
    let dir = profile_dir(&[
        ("1.json", profile_json("A1", "JFK Approach").as_str()),
        ("2.json", profile_json("A2", "Approach JFK").as_str()),
    ]);
    let store = loaded_store(dir.path());

    assert_eq!(ids(&store.get_matching(Some("jfk "))), vec!["A1"]);
}

#[test]
fn test_get_matching_no_match_is_empty() {
    let dir = profile_dir(JFK_PROFILES);
    let store = loaded_store(dir.path());
    assert!(store.get_matching(Some("boston")).is_empty());
}

#[test]
fn test_find_and_require() {
    let dir = profile_dir(JFK_PROFILES);
    let store = loaded_store(dir.path());

    assert_eq!(store.find_by_id("A2").unwrap().name.as_deref(), Some("jfk ground"));
    assert!(store.find_by_id("A9").is_none());
    assert!(matches!(
        store.require("A9"),
        Err(crate::Error::ProfileNotFound(id)) if id == "A9"
    ));
}

#[test]
fn test_readers_never_see_partial_generation() {
    let files: Vec<(String, String)> = (0..40)
        .map(|i| (format!("{i:02}.json"), profile_json(&format!("P{i}"), "Profile")))
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_str()))
        .collect();
    let dir = profile_dir(&borrowed);
    let store = loaded_store(dir.path());

    let reader = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let len = store.get_matching(None).len();
                assert_eq!(len, 40, "observed partial list of {len}");
            }
        })
    };
    for _ in 0..20 {
        assert_eq!(store.load(), 40);
    }
    reader.join().unwrap();
}

proptest! {
    #[test]
    fn matching_ignores_case_of_query_and_name(
        name in "[a-zA-Z0-9 ]{0,24}",
        query in "[a-zA-Z0-9 ]{1,6}",
    ) {
        let expected = name.to_lowercase().contains(&query.to_lowercase());
        prop_assert_eq!(contains_ignore_case(&name, &query), expected);
        prop_assert_eq!(contains_ignore_case(&name.to_uppercase(), &query), expected);
        prop_assert_eq!(contains_ignore_case(&name, &query.to_uppercase()), expected);
        prop_assert_eq!(
            contains_ignore_case(&name.to_lowercase(), &query.to_uppercase()),
            expected
        );
    }

    #[test]
    fn every_substring_matches(
        name in "[a-zA-Z ]{1,24}",
        start in 0usize..24,
        len in 1usize..8,
    ) {
        let start = start % name.len();
        let end = (start + len).min(name.len());
        let query = name[start..end].to_uppercase();
        prop_assert!(contains_ignore_case(&name, &query));
    }
}
