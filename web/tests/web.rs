//! Browser tests for the JavaScript-facing session handle.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsError, JsValue};
use wasm_bindgen_test::*;
use winsweep_web::WebSession;

wasm_bindgen_test_configure!(run_in_browser);

fn ok<T>(result: Result<T, JsError>) -> T {
    result.map_err(JsValue::from).unwrap()
}

#[wasm_bindgen_test]
fn new_session_is_idle() {
    let session = ok(WebSession::new("expert"));

    assert_eq!(session.state(), "idle");
    assert_eq!(session.difficulty(), "expert");
    assert_eq!((session.rows(), session.cols()), (16, 30));
    assert_eq!(session.mine_counter(), 99);
    assert_eq!(session.timer(), 0);
    assert!(session.cell_codes().iter().all(|&code| code == -1));
}

#[wasm_bindgen_test]
fn first_reveal_is_safe() {
    let mut session = ok(WebSession::new("beginner"));

    let outcome = ok(session.reveal(4, 4));

    assert_ne!(outcome, "lost");
    assert_ne!(session.state(), "idle");
    assert!(session.cell_codes()[4 * 9 + 4] >= 0);
}

#[wasm_bindgen_test]
fn flag_deltas_and_counter() {
    let mut session = ok(WebSession::new("beginner"));

    assert_eq!(ok(session.toggle_flag(0, 0)), 1);
    assert_eq!(session.mine_counter(), 9);
    assert_eq!(ok(session.toggle_flag(0, 0)), -1);
    assert_eq!(session.mine_counter(), 10);
}

#[wasm_bindgen_test]
fn difficulty_change_and_reset() {
    let mut session = ok(WebSession::new("beginner"));
    ok(session.toggle_flag(1, 1));

    ok(session.change_difficulty("intermediate"));
    assert_eq!((session.rows(), session.cols()), (16, 16));
    assert_eq!(session.state(), "idle");
    assert!(session.change_difficulty("custom").is_err());

    ok(session.toggle_flag(1, 1));
    session.reset();
    assert_eq!(session.mine_counter(), 40);
    assert_eq!(session.difficulty(), "intermediate");
}

#[wasm_bindgen_test]
fn snapshot_serializes() {
    let session = ok(WebSession::new("beginner"));
    let json = ok(session.snapshot_json());

    assert!(json.contains("\"state\":\"idle\""));
    assert!(json.contains("\"difficulty\":\"beginner\""));
}
