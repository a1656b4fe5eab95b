//! receive_timeout returns None on a short bound with an empty mailbox, and
//! the real message once the bound is long enough. Run with "cargo test
//! --test s4_timeout -- --nocapture"

use std::sync::mpsc;
use std::time::Duration;

use libactor_rt::*;

#[test]
fn timeout_then_message() {
    println!("--- S4 timeout");
    let (tx, rx) = mpsc::channel::<(bool, bool)>();

    spawn(
        move |tx: mpsc::Sender<(bool, bool)>| {
            let a_id = self_id().unwrap();
            let _b = spawn(
                move |a_id: ActorId| {
                    std::thread::sleep(Duration::from_millis(200));
                    send(a_id, 9, &[]);
                },
                a_id,
            );

            let early = receive_timeout(Some(Duration::from_millis(50)));
            let got_none_early = early.is_none();

            let late = receive_timeout(Some(Duration::from_millis(500)));
            let got_msg_late = late.is_some();
            if let Some(msg) = late {
                assert_eq!(msg.msg_type, 9);
                release(msg);
            }

            tx.send((got_none_early, got_msg_late)).unwrap();
        },
        tx,
    );

    wait_finish();
    let (early, late) = rx.recv().expect("A never reported its result");
    assert!(early, "expected receive_timeout(50ms) to time out");
    assert!(late, "expected receive_timeout(500ms) to see B's message");
    println!("ok");
}
