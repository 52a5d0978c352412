//! Tests for the process-wide prompt loader
//!
//! Kept in their own test binary: the global loader can be installed only
//! once per process.

use std::sync::Arc;
use tempfile::TempDir;

use redink_i18n::http::{router, AppState};
use redink_i18n::i18n::{load_prompt_template, Locale, PromptLoader};

#[tokio::test]
async fn test_installed_loader_is_shared_with_free_function_and_server() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = temp_dir.path().join(Locale::SimplifiedChinese.fs_name());
    std::fs::create_dir_all(&dir).expect("Failed to create locale dir");
    std::fs::write(dir.join("only_here.txt"), "configured prompt").expect("Failed to write template");

    let loader = Arc::new(PromptLoader::new(temp_dir.path(), 8));
    let installed = PromptLoader::install(Arc::clone(&loader)).unwrap_or_else(|_| panic!("Install should succeed"));
    assert!(std::ptr::eq(installed, &*loader));
    assert!(std::ptr::eq(PromptLoader::global(), &*loader));

    // Free function reads through the installed loader
    let content = load_prompt_template("only_here.txt", None).expect("Should load from installed root");
    assert_eq!(&*content, "configured prompt");
    assert_eq!(loader.metrics().disk_reads(), 1);

    // The server's loader sees the same cache and metrics
    let app = router(AppState::new(Arc::clone(&loader)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    let body = reqwest::get(format!("http://{}/api/prompts/only_here.txt", addr))
        .await
        .expect("Request failed")
        .text()
        .await
        .expect("Invalid body");
    assert_eq!(body, "configured prompt");

    let metrics: serde_json::Value = reqwest::get(format!("http://{}/api/metrics/templates", addr))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(metrics["disk_reads"], 1);
    assert_eq!(metrics["cache_hits"], 1);

    // A second install is refused and hands the loader back
    let other = Arc::new(PromptLoader::new(temp_dir.path(), 8));
    let rejected = PromptLoader::install(Arc::clone(&other)).err().expect("Second install should fail");
    assert!(Arc::ptr_eq(&rejected, &other));
}
