use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn delete_removes_file_and_reports_path() {
    let app = TestApp::spawn().await;
    let path = app.seed_png("lifeblood", "photo.png").await;

    let res = app.delete(&routes::file(&path)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["deleted"], path);

    // The file is gone; the URL no longer resolves.
    let served = app.get(&routes::file(&path)).await;
    assert_eq!(served.status, 404);
}

#[tokio::test]
async fn repeat_delete_is_distinguishable_from_first() {
    let app = TestApp::spawn().await;
    let path = app.seed_png("lifeblood", "photo.png").await;

    let first = app.delete(&routes::file(&path)).await;
    assert_eq!(first.status, 200, "{}", first.text);

    let second = app.delete(&routes::file(&path)).await;
    assert_eq!(second.status, 404, "{}", second.text);
    assert_eq!(second.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn in_flight_staged_files_are_unreachable() {
    let app = TestApp::spawn().await;
    std::fs::write(app.root.join(".tmp/deadbeef"), b"partial bytes").unwrap();

    let served = app.get(&routes::file(".tmp/deadbeef")).await;
    assert_eq!(served.status, 400, "{}", served.text);
    assert_eq!(served.error_code(), "INVALID_PATH");

    let deleted = app.delete(&routes::file(".tmp/deadbeef")).await;
    assert_eq!(deleted.status, 400, "{}", deleted.text);
    assert!(app.root.join(".tmp/deadbeef").exists());
}

#[tokio::test]
async fn delete_rejects_traversal() {
    let app = TestApp::spawn().await;

    let res = app.delete(&routes::file("..%2Fsecrets.txt")).await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.error_code(), "INVALID_PATH");
}

#[tokio::test]
async fn migration_moves_groups_between_namespaces() {
    let app = TestApp::spawn().await;
    let moved = app.seed_png("lifeblood", "one.png").await;
    app.seed_png("lifeblood", "two.png").await;

    let res = app
        .post_json(
            routes::MIGRATIONS,
            &json!({
                "name": "promote-lifeblood",
                "from": "project-assets",
                "to": "news-assets",
            }),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "promote-lifeblood");
    assert_eq!(res.body["totalMigrated"], 1);
    assert_eq!(res.body["filesMoved"], 2);
    assert_eq!(res.body["filesSkipped"], 0);

    // Files now resolve under the destination namespace only.
    let relocated = moved.replace("project-assets", "news-assets");
    assert_eq!(app.get(&routes::file(&relocated)).await.status, 200);
    assert_eq!(app.get(&routes::file(&moved)).await.status, 404);
    assert!(!app.root.join("project-assets/lifeblood").exists());
}

#[tokio::test]
async fn rerunning_a_completed_migration_changes_nothing() {
    let app = TestApp::spawn().await;
    app.seed_png("lifeblood", "one.png").await;

    let action = json!({
        "name": "promote-lifeblood",
        "from": "project-assets",
        "to": "news-assets",
    });

    let first = app.post_json(routes::MIGRATIONS, &action).await;
    assert_eq!(first.status, 200, "{}", first.text);
    assert_eq!(first.body["filesMoved"], 1);

    let second = app.post_json(routes::MIGRATIONS, &action).await;
    assert_eq!(second.status, 200, "{}", second.text);
    assert_eq!(second.body["totalMigrated"], 0);
    assert_eq!(second.body["filesMoved"], 0);
}

#[tokio::test]
async fn migration_scoped_to_listed_groups() {
    let app = TestApp::spawn().await;
    app.seed_png("lifeblood", "one.png").await;
    let untouched = app.seed_png("skyline", "cover.png").await;

    let res = app
        .post_json(
            routes::MIGRATIONS,
            &json!({
                "name": "promote-lifeblood",
                "from": "project-assets",
                "to": "news-assets",
                "groups": ["lifeblood"],
            }),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["totalMigrated"], 1);
    assert!(app.root.join("news-assets/lifeblood").is_dir());
    assert_eq!(app.get(&routes::file(&untouched)).await.status, 200);
}

#[tokio::test]
async fn migration_rejects_identical_namespaces() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::MIGRATIONS,
            &json!({
                "name": "noop",
                "from": "project-assets",
                "to": "project-assets",
            }),
        )
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.error_code(), "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn migration_rejects_unknown_namespace() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::MIGRATIONS,
            &json!({
                "name": "bogus",
                "from": "secret-assets",
                "to": "news-assets",
            }),
        )
        .await;

    // Closed namespace set; serde rejects the payload outright.
    assert_eq!(res.status, 422, "{}", res.text);
}
