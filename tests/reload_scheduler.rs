//! End-to-end tests for the self-governing reload loop.

use std::time::{Duration, Instant};

use props_reload::SchedulerState;

mod common;

use common::{eventually, wait_for_passes, ConfigDir};

#[tokio::test]
async fn test_edit_becomes_visible_within_interval() {
    let dir = ConfigDir::new();
    dir.write("base", "updateType=auto\n");
    dir.write("config", "updateTime=2\n");
    dir.write("shop", "app_id=42\n");

    let (store, mut handle) = dir.start();
    assert_eq!(store.get_value("shop", "app_id").as_deref(), Some("42"));

    dir.write("shop", "app_id=99\n");
    let fresh = eventually(
        || store.get_value("shop", "app_id").as_deref() == Some("99"),
        Duration::from_secs(3),
    )
    .await;
    assert!(fresh, "edit not picked up by the next pass");

    handle.stop().await;
    assert!(handle.is_stopped());
}

#[tokio::test]
async fn test_second_pass_follows_update_time() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=5\n");

    let (_store, mut handle) = dir.start();
    let bootstrapped = Instant::now();
    assert_eq!(handle.passes(), 1);

    let second = wait_for_passes(&handle, 2, Duration::from_secs(8))
        .await
        .expect("second pass never fired");
    let gap = second - bootstrapped;
    assert!(gap >= Duration::from_secs(5), "fired early: {gap:?}");
    assert!(gap < Duration::from_secs(6), "fired late: {gap:?}");

    handle.stop().await;
}

#[tokio::test]
async fn test_unchanged_files_are_not_reparsed() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=1\n");
    dir.write("shop", "app_id=42\n");

    let (store, mut handle) = dir.start();
    assert_eq!(store.parse_count(), 2);

    wait_for_passes(&handle, 3, Duration::from_secs(4))
        .await
        .expect("passes did not run");
    assert_eq!(store.parse_count(), 2);

    handle.stop().await;
}

#[tokio::test]
async fn test_manual_update_type_never_reloads() {
    let dir = ConfigDir::new();
    dir.write("base", "updateType=manual\n");
    dir.write("config", "updateTime=1\n");
    dir.write("shop", "app_id=42\n");

    let (store, handle) = dir.start();
    assert!(handle.is_stopped());

    dir.write("shop", "app_id=99\n");
    dir.write("base", "updateType=auto\n");
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    assert_eq!(handle.passes(), 1);
    assert_eq!(store.get_value("shop", "app_id").as_deref(), Some("42"));
    assert!(handle.is_stopped());
}

#[tokio::test]
async fn test_switching_to_manual_stops_for_good() {
    let dir = ConfigDir::new();
    dir.write("base", "updateType=auto\n");
    dir.write("config", "updateTime=1\n");

    let (_store, handle) = dir.start();
    dir.write("base", "updateType=manual\n");

    let mut state = handle.subscribe_state();
    tokio::time::timeout(
        Duration::from_secs(3),
        state.wait_for(|s| *s == SchedulerState::Stopped),
    )
    .await
    .expect("scheduler did not stop")
    .unwrap();
    assert_eq!(handle.passes(), 2);

    dir.write("base", "updateType=auto\n");
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(handle.passes(), 2);
}

#[tokio::test]
async fn test_update_time_arms_interval() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=3600\n");

    let (_store, mut handle) = dir.start();
    let mut state = handle.subscribe_state();
    let armed = *state
        .wait_for(|s| matches!(s, SchedulerState::Scheduled { .. }))
        .await
        .unwrap();
    assert_eq!(
        armed,
        SchedulerState::Scheduled { interval: Duration::from_secs(3600) }
    );

    handle.stop().await;
}

#[tokio::test]
async fn test_failed_pass_does_not_kill_loop() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=1\n");
    dir.write("shop", "app_id=42\n");

    let (store, mut handle) = dir.start();

    // Replace the directory with a plain file: listing now fails.
    std::fs::remove_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path(), "not a directory").unwrap();

    wait_for_passes(&handle, 3, Duration::from_secs(4))
        .await
        .expect("loop stopped after a failed pass");
    assert_eq!(store.get_value("shop", "app_id").as_deref(), Some("42"));

    std::fs::remove_file(dir.path()).unwrap();
    std::fs::create_dir(dir.path()).unwrap();
    dir.write("config", "updateTime=1\n");
    dir.write("shop", "app_id=99\n");

    let recovered = eventually(
        || store.get_value("shop", "app_id").as_deref() == Some("99"),
        Duration::from_secs(3),
    )
    .await;
    assert!(recovered);

    handle.stop().await;
}

#[tokio::test]
async fn test_malformed_edit_keeps_previous_value() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=1\n");
    dir.write("a", "k=old\n");

    let (store, mut handle) = dir.start();
    dir.write("a", "k=new\nbad=\\u00ZZ\n");

    wait_for_passes(&handle, 2, Duration::from_secs(3))
        .await
        .expect("pass did not run");
    assert_eq!(store.get_value("a", "k").as_deref(), Some("old"));
    assert!(!handle.is_stopped());

    handle.stop().await;
}

#[tokio::test]
async fn test_missing_directory_starts_empty() {
    let dir = ConfigDir::new();
    std::fs::remove_dir(dir.path()).unwrap();

    let (store, mut handle) = dir.start();
    assert!(store.is_empty());
    assert!(!handle.is_stopped());

    handle.stop().await;
}

#[tokio::test]
async fn test_stop_waits_for_running_pass() {
    let dir = ConfigDir::new();
    dir.write("config", "updateTime=1\n");
    for i in 0..500 {
        dir.write(&format!("set{i}"), "k=old\n");
    }

    let (store, mut handle) = dir.start();
    assert_eq!(handle.passes(), 1);
    for i in 0..500 {
        dir.write(&format!("set{i}"), "k=new\n");
    }

    // The channel starts out as Running for the bootstrap pass.
    let mut state = handle.subscribe_state();
    state
        .wait_for(|s| matches!(s, SchedulerState::Scheduled { .. }))
        .await
        .unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| *s == SchedulerState::Running),
    )
    .await
    .expect("second pass never started")
    .unwrap();

    handle.stop().await;
    assert!(handle.passes() >= 2, "stop returned before the running pass finished");
    assert!(handle.is_stopped());
    assert_eq!(store.get_value("set499", "k").as_deref(), Some("new"));
}
