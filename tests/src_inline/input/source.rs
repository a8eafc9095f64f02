use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn file_source_reads_bytes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("Democracy_Data.db");
    std::fs::write(&path, b"abc").expect("write");
    let source = FileSource::new(&path);
    assert_eq!(source.retrieve().await.expect("retrieve"), b"abc".to_vec());
    assert_eq!(source.path(), path.as_path());
}

#[tokio::test]
async fn missing_file_is_io_error_naming_resource() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.db");
    let err = FileSource::new(&path)
        .retrieve()
        .await
        .expect_err("missing file");
    match &err {
        RetrievalError::Io { resource, .. } => assert!(resource.ends_with("absent.db")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn bytes_source_serves_embedded_artifact() {
    static ARTIFACT: &[u8] = b"embedded";
    let source = BytesSource::embedded("bundle.db", ARTIFACT);
    assert_eq!(source.resource(), "bundle.db");
    assert_eq!(source.retrieve().await.expect("retrieve"), ARTIFACT.to_vec());
}

#[test]
fn status_error_mentions_code() {
    let err = RetrievalError::Status {
        resource: "Democracy_Data.db".to_string(),
        code: 404,
        reason: "Not Found".to_string(),
    };
    assert_eq!(err.to_string(), "Democracy_Data.db: status 404 Not Found");
}
