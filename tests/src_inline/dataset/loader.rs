use super::*;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::sync::Notify;

use crate::fixtures::{GatedSource, PanicOnceSource, StatusSource, database_bytes, utopia};
use crate::input::{BytesSource, RetrievalError};
use crate::model::indicators::Indicator;

#[tokio::test]
async fn concurrent_loads_share_one_retrieval() {
    let gate = Arc::new(Notify::new());
    let source = GatedSource::new(database_bytes(&utopia()), Arc::clone(&gate));
    let calls = source.calls();
    let loader = DatasetLoader::new(source);
    assert_eq!(loader.state(), LoadState::Idle);

    let (first, second) = tokio::join!(loader.load(), async {
        assert_eq!(loader.state(), LoadState::Loading);
        gate.notify_one();
        loader.load().await
    });

    let first = first.expect("first load");
    let second = second.expect("second load");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(loader.state(), LoadState::Loaded);
}

#[tokio::test]
async fn later_loads_are_memoized() {
    let loader = DatasetLoader::new(BytesSource::new("fixture.db", database_bytes(&utopia())));
    assert!(loader.get().is_none());
    let first = loader.load().await.expect("load");
    let again = loader.load().await.expect("load");
    assert!(Arc::ptr_eq(&first, &again));
    assert!(Arc::ptr_eq(&first, &loader.get().expect("cached")));
    assert_eq!(first.years_for("Utopia"), [2020, 2021]);
}

#[tokio::test]
async fn status_failure_is_reported_without_dataset() {
    let loader = DatasetLoader::new(StatusSource::always(404, "Not Found"));
    let err = loader.load().await.expect_err("status");
    assert_eq!(
        err,
        LoadError::Retrieval(RetrievalError::Status {
            resource: "Democracy_Data.db".to_string(),
            code: 404,
            reason: "Not Found".to_string(),
        })
    );
    assert!(err.to_string().contains("404"));
    assert_eq!(loader.state(), LoadState::Failed(err));
    assert!(loader.get().is_none());
}

#[tokio::test]
async fn failure_is_not_retried_until_asked() {
    let source = StatusSource::failing_first(1, 503, "Service Unavailable", database_bytes(&utopia()));
    let calls = source.calls();
    let loader = DatasetLoader::new(source);

    assert!(loader.load().await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(loader.state(), LoadState::Failed(_)));

    let dataset = loader.load().await.expect("retry");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(dataset.len(), 2);
}

#[tokio::test]
async fn attempt_continues_after_callers_leave() {
    let gate = Arc::new(Notify::new());
    let source = GatedSource::new(database_bytes(&utopia()), Arc::clone(&gate));
    let calls = source.calls();
    let loader = DatasetLoader::new(source);

    let abandoned = tokio::time::timeout(Duration::from_millis(20), loader.load()).await;
    assert!(abandoned.is_err());
    assert_eq!(loader.state(), LoadState::Loading);

    gate.notify_one();
    for _ in 0..400 {
        if loader.state() == LoadState::Loaded {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(loader.state(), LoadState::Loaded);
    loader.load().await.expect("memoized");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn parse_failure_surfaces_as_load_error() {
    let loader = DatasetLoader::new(BytesSource::new("empty.db", Vec::new()));
    let err = loader.load().await.expect_err("empty artifact");
    assert!(matches!(err, LoadError::MissingColumns { .. }), "{err:?}");
}

fn current_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

#[test]
fn attempt_cancelled_with_its_runtime_fails_then_retries() {
    let gate = Arc::new(Notify::new());
    let source = GatedSource::new(database_bytes(&utopia()), Arc::clone(&gate));
    let calls = source.calls();
    let loader = DatasetLoader::new(source);

    let first = current_thread_runtime();
    first.block_on(async {
        let abandoned = tokio::time::timeout(Duration::from_millis(20), loader.load()).await;
        assert!(abandoned.is_err());
    });
    drop(first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = current_thread_runtime();
    second.block_on(async {
        let err = loader.load().await.expect_err("cancelled attempt");
        assert!(matches!(err, LoadError::Task(_)), "{err:?}");
        assert_eq!(loader.state(), LoadState::Failed(err));

        gate.notify_one();
        let dataset = loader.load().await.expect("retry");
        assert_eq!(dataset.years_for("Utopia"), [2020, 2021]);
        assert_eq!(loader.state(), LoadState::Loaded);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn panicking_source_is_a_failed_attempt() {
    let source = PanicOnceSource::new(database_bytes(&utopia()));
    let calls = source.calls();
    let loader = DatasetLoader::new(source);

    let err = loader.load().await.expect_err("panicked attempt");
    assert!(matches!(err, LoadError::Task(_)), "{err:?}");
    assert!(matches!(loader.state(), LoadState::Failed(LoadError::Task(_))));

    let dataset = loader.load().await.expect("retry");
    assert_eq!(dataset.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unkeyed_rows_reach_the_loaded_dataset() {
    let sql_bytes = crate::fixtures::database_bytes_from_sql(&format!(
        "{}
        INSERT INTO country_metadata VALUES ('Utopia', 'UTO', 2020), ('Utopia', 'UTO', 'unknown');
        INSERT INTO dsp_variables VALUES ('UTO', 2020, 1, 1, 1, 1, 1, 1, 1), ('UTO', 'unknown', 9, 9, 9, 9, 9, 9, 9);
        INSERT INTO vdem_variables VALUES ('UTO', 2020, 0.4), ('UTO', 'unknown', 0.6);",
        crate::fixtures::SCHEMA
    ));
    let loader = DatasetLoader::new(BytesSource::new("fixture.db", sql_bytes));
    let dataset = loader.load().await.expect("load");
    assert_eq!(dataset.years_for("Utopia"), [2020]);
    assert_eq!(dataset.unkeyed_rows().len(), 1);
    assert_eq!(dataset.min_max_for(Indicator::Com).max, 9.0);
    assert_eq!(dataset.outcome_values(), [0.4, 0.6]);
}

#[test]
fn default_loader_is_a_single_instance() {
    let first = default_loader();
    let second = default_loader();
    assert!(std::ptr::eq(first, second));
    assert!(first.source().path().ends_with("Democracy_Data.db"));
    assert_eq!(first.state(), LoadState::Idle);
}
