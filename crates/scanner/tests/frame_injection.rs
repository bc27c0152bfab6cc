//! Frame traversal of the engine injector against a recorded frame tree

mod support;

use axescan_common::Error;
use axescan_scanner::FrameInjector;
use support::{frame, MockDriver};

const SCRIPT: &str = "window.axe = window.axe || {};";

fn path(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// outer -> middle -> inner, plus a sibling frame at the top
fn nested_page() -> MockDriver {
    MockDriver::new().with_frames(vec![
        frame(
            "outer",
            vec![frame("middle", vec![frame("inner", vec![])])],
        ),
        frame("sidebar", vec![]),
    ])
}

#[tokio::test]
async fn test_visits_every_frame_depth_first_then_top() {
    let driver = nested_page();

    FrameInjector::new(&driver).inject(SCRIPT, true).await.unwrap();

    assert_eq!(
        driver.injected_paths(),
        vec![
            path(&["outer"]),
            path(&["outer", "middle"]),
            path(&["outer", "middle", "inner"]),
            path(&["sidebar"]),
            path(&[]),
        ]
    );
    assert!(driver.injections().iter().all(|i| i.script == SCRIPT));
    assert!(driver.current_path().is_empty());
}

#[tokio::test]
async fn test_reenters_through_full_ancestor_chain() {
    let driver = MockDriver::new().with_frames(vec![frame(
        "outer",
        vec![frame("middle", vec![])],
    )]);

    FrameInjector::new(&driver).inject(SCRIPT, true).await.unwrap();

    assert_eq!(
        driver.switches(),
        vec![
            "default",
            "frame:outer",
            "default",
            "frame:outer",
            "frame:middle",
            "default",
        ]
    );
}

#[tokio::test]
async fn test_frames_disabled_injects_top_only() {
    let driver = nested_page();

    FrameInjector::new(&driver).inject(SCRIPT, false).await.unwrap();

    assert_eq!(driver.injected_paths(), vec![path(&[])]);
}

#[tokio::test]
async fn test_page_without_frames() {
    let driver = MockDriver::new();

    FrameInjector::new(&driver).inject(SCRIPT, true).await.unwrap();

    assert_eq!(driver.injected_paths(), vec![path(&[])]);
}

#[tokio::test]
async fn test_injecting_twice_is_harmless() {
    let driver = nested_page();
    let injector = FrameInjector::new(&driver);

    injector.inject(SCRIPT, true).await.unwrap();
    let first = driver.injected_paths();
    injector.inject(SCRIPT, true).await.unwrap();

    let all = driver.injected_paths();
    assert_eq!(all.len(), first.len() * 2);
    assert_eq!(&all[first.len()..], first.as_slice());
    assert!(driver.current_path().is_empty());
}

#[tokio::test]
async fn test_frame_switch_failure_propagates() {
    let driver = nested_page().failing_switch_into("middle");

    let err = FrameInjector::new(&driver)
        .inject(SCRIPT, true)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transport_failure());
    // The top-level document is never reached once the walk fails.
    assert_eq!(driver.injected_paths(), vec![path(&["outer"])]);
}
