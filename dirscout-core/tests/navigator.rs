use std::fs;
use std::path::Path;

use dirscout_core::text::TextTally;
use dirscout_core::{traverse, ContentVisitor, EntryKind, NavError, Navigator, Preview};
use tempfile::tempdir;

fn seed_tree(root: &Path) {
    fs::create_dir_all(root.join("docs/drafts")).unwrap();
    fs::write(root.join("readme.txt"), "hello from the root").unwrap();
    fs::write(root.join("docs/a.md"), "# Alpha\nbody text").unwrap();
    fs::write(root.join("docs/drafts/b.txt"), "draft words here").unwrap();
}

#[tokio::test]
async fn full_session_flow() {
    let temp = tempdir().unwrap();
    seed_tree(temp.path());

    let mut nav = Navigator::new();
    nav.select_root(temp.path()).await.unwrap();

    // Navigate down and back up; the cursor tracks exactly what we asked
    let docs = nav.navigate(&["docs"]).await.unwrap();
    assert_eq!(nav.current_path(), vec!["docs"]);

    let mut names: Vec<String> = docs
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.md", "drafts"]);

    // Create, copy, delete through the current directory
    docs.create_directory("published").await.unwrap();
    docs.create_directory("published").await.unwrap();

    let copy_name = docs.copy_entry("a.md").await.unwrap();
    assert_eq!(copy_name, "Copy_of_a.md");

    docs.delete_entry(&copy_name).await.unwrap();
    docs.delete_entry("published").await.unwrap();
    assert!(matches!(
        docs.delete_entry("drafts").await.unwrap_err(),
        NavError::NotEmpty { .. }
    ));

    // Preview a text file from a listing
    let entry = docs
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.kind == EntryKind::File)
        .unwrap();
    let dirscout_core::NodeHandle::File(file) = entry.handle else {
        panic!("expected file handle");
    };
    assert_eq!(
        file.preview().await.unwrap(),
        Preview::Text("# Alpha\nbody text".to_string())
    );

    // Traverse the whole grant from the root
    let root = nav.navigate::<&str>(&[]).await.unwrap();
    let mut visited = Vec::new();
    let mut visitor = ContentVisitor(|path: &Path, _| {
        visited.push(path.display().to_string());
        Ok(())
    });
    let failures = traverse(&root, &mut visitor).await;
    assert!(failures.is_empty());
    visited.sort();
    assert_eq!(visited, vec!["docs/a.md", "docs/drafts/b.txt", "readme.txt"]);
}

#[tokio::test]
async fn tally_as_processing_step() {
    let temp = tempdir().unwrap();
    seed_tree(temp.path());

    let mut nav = Navigator::new();
    nav.select_root(temp.path()).await.unwrap();
    let root = nav.current_dir().unwrap();

    let mut tally = TextTally::default();
    let failures = traverse(&root, &mut tally).await;
    assert!(failures.is_empty());
    assert_eq!(tally.files, 3);
    assert_eq!(tally.binary_files, 0);
    // "hello from the root" + "# Alpha\nbody text" + "draft words here"
    assert_eq!(tally.words, 4 + 4 + 3);
}

#[tokio::test]
async fn operations_before_grant_fail() {
    let mut nav = Navigator::new();
    assert!(matches!(
        nav.navigate(&["anywhere"]).await.unwrap_err(),
        NavError::NoGrant
    ));
    assert!(matches!(nav.current_dir().unwrap_err(), NavError::NoGrant));
}
