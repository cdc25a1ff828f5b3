use lawtree::pipeline;
use std::path::PathBuf;

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

#[test]
fn test_demo_files_exist() {
    let demos = demos_dir();
    assert!(demos.join("lawtree.toml").exists(), "demo manifest should exist");
    assert!(
        demos.join("feeds/criminal-code.jsonl").exists(),
        "criminal code feed should exist"
    );
    assert!(
        demos.join("feeds/revenue-code.csv").exists(),
        "revenue code feed should exist"
    );
}

#[test]
fn test_demo_manifest_converts() {
    let out = tempfile::tempdir().unwrap();

    let reports =
        pipeline::run_manifest_file(&demos_dir().join("lawtree.toml"), None, out.path(), None)
            .unwrap();

    let rows: Vec<(&str, usize)> = reports
        .iter()
        .map(|report| (report.title.as_str(), report.rows))
        .collect();
    // The amended repeat of article 3 is dropped
    assert_eq!(rows, vec![("ประมวลกฎหมายอาญา", 5), ("ประมวลรัษฎากร", 3)]);

    let tree: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&reports[0].files.json).unwrap(),
    )
    .unwrap();
    assert_eq!(tree["body"]["division"]["2"]["title"], "ความผิด");
    assert!(tree["body"]["provision"]["บทเฉพาะกาล"]["article"]["371"].is_object());
    assert_eq!(
        tree["law_footer"]["text"],
        "ผู้รับสนองพระบรมราชโองการ\nจอมพล ป. พิบูลสงคราม\nนายกรัฐมนตรี\n"
    );
}
