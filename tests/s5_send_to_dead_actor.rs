//! sending to an actor that has already exited is a silent no-op: no
//! crash, no leaked allocation. Run with "cargo test --test
//! s5_send_to_dead_actor -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn send_to_dead_actor_is_noop() {
    println!("--- S5 send to dead actor");
    let (tx, rx) = mpsc::channel::<bool>();

    spawn(
        move |tx: mpsc::Sender<bool>| {
            trap_exit(true);
            let b = spawn(|_: ()| { /* exits immediately */ }, ());

            let exited = receive().expect("A expected B's EXITED notification");
            assert_eq!(exited.msg_type, EXITED);
            release(exited);

            // b is no longer registered; this must not panic or block.
            send(b, 42, b"late");

            tx.send(true).unwrap();
        },
        tx,
    );

    wait_finish();
    assert!(rx.recv().expect("A never reported its result"));
    println!("ok, no crash sending to a dead identifier");
}
