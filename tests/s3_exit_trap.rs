//! a trapping parent receives an EXITED message when its child returns.
//! Run with "cargo test --test s3_exit_trap -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn exit_trap_delivers_exited() {
    println!("--- S3 exit trap");
    let (tx, rx) = mpsc::channel::<bool>();

    spawn(
        move |tx: mpsc::Sender<bool>| {
            trap_exit(true);
            let _b = spawn(|_: ()| { /* returns immediately */ }, ());

            let msg = receive().expect("A expected an EXITED notification");
            tx.send(msg.msg_type == EXITED).unwrap();
            release(msg);
        },
        tx,
    );

    wait_finish();
    assert!(rx.recv().expect("A never reported its result"));
    println!("ok");
}
