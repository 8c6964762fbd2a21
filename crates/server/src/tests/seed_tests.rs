use super::*;
use shared::domain::Question;

const SEED: &str = r#"{
  "groups": {
    "personal": [
      {"id": "p1", "question": "Age?", "options": ["Under 3", "3 to 5"], "imagekey": "personal1"}
    ],
    "empty": [],
    "behavioral": [
      {"id": "b1", "question": "Eye contact?", "options": ["Often", "Rarely"], "type": "behavioral"}
    ]
  }
}"#;

fn write_seed(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("questions.json");
    fs::write(&path, contents).expect("write seed");
    path
}

#[tokio::test]
async fn seeds_empty_database_in_file_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_seed(&dir, SEED);

    let imported = seed_if_empty(&storage, &path).await.expect("seed");
    assert_eq!(imported, 2);

    let groups = storage.list_question_groups().await.expect("groups");
    let names: Vec<&str> = groups.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["personal", "behavioral"]);
}

#[tokio::test]
async fn populated_database_is_left_alone() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_question("personal", &Question::new("p0", "Existing?", ["Yes", "No"]))
        .await
        .expect("insert");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_seed(&dir, SEED);

    assert_eq!(seed_if_empty(&storage, &path).await.expect("seed"), 0);
    assert_eq!(storage.count_questions().await.expect("count"), 1);
}

#[tokio::test]
async fn malformed_seed_file_is_an_error() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_seed(&dir, r#"[{"id": "p1", "question": "Age?", "options": ["A"]}]"#);

    seed_if_empty(&storage, &path)
        .await
        .expect_err("a bare array is not a seed payload");
    assert_eq!(storage.count_questions().await.expect("count"), 0);
}

#[tokio::test]
async fn duplicate_ids_in_seed_file_are_rejected() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_seed(
        &dir,
        r#"{"groups": {"a": [{"id": "x", "question": "Q", "options": ["1"]}],
                       "b": [{"id": "x", "question": "Q", "options": ["1"]}]}}"#,
    );

    seed_if_empty(&storage, &path).await.expect_err("duplicate id");
}

#[tokio::test]
async fn bundled_question_bank_is_valid() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/questions.json");

    let imported = seed_if_empty(&storage, &path).await.expect("seed");
    assert_eq!(imported, 5);
}
