//! alloc + retain + send(copy) + release twice: the original block is
//! freed exactly once by its own two releases, independent of the copy
//! sent to B. Run with "cargo test --test s6_dual_retain_payload -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn dual_retain_and_release() {
    println!("--- S6 dual-retain payload");
    let (tx, rx) = mpsc::channel::<Vec<u8>>();

    spawn(
        move |tx: mpsc::Sender<Vec<u8>>| {
            let block = alloc(4);
            retain(&block);

            let _b = spawn(
                move |tx: mpsc::Sender<Vec<u8>>| {
                    let msg = receive().expect("B expected its copy of the payload");
                    tx.send(msg.data().to_vec()).unwrap();
                    release(msg);
                },
                tx,
            );

            send(_b, 7, block.data());

            // two releases matching the initial alloc + the explicit retain;
            // neither touches B's independently-charged copy.
            release(block.clone());
            release(block);
        },
        tx,
    );

    wait_finish();
    let received = rx.recv().expect("B never reported its result");
    assert_eq!(received, vec![0, 0, 0, 0]);
    println!("ok, B's copy of the payload survived the sender's double release");
}
