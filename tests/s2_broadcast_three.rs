//! broadcast delivers exactly one message to every actor registered at the
//! snapshot instant. Run with "cargo test --test s2_broadcast_three -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn broadcast_to_three() {
    println!("--- S2 broadcast to three");
    let (tx, rx) = mpsc::channel::<Vec<u8>>();

    fn recipient(tx: mpsc::Sender<Vec<u8>>) {
        let msg = receive().expect("recipient expected a broadcast message");
        tx.send(msg.data().to_vec()).unwrap();
        release(msg);
    }

    spawn(
        move |tx: mpsc::Sender<Vec<u8>>| {
            // each recipient is registered (not merely spawned) before the
            // broadcast below is issued, since `spawn` registers the child
            // synchronously before starting its thread.
            let _p1 = spawn(recipient, tx.clone());
            let _p2 = spawn(recipient, tx.clone());
            let _p3 = spawn(recipient, tx.clone());

            broadcast(0, b"msg\0");
        },
        tx,
    );

    wait_finish();

    let mut received: Vec<Vec<u8>> = rx.try_iter().collect();
    received.sort();
    assert_eq!(received.len(), 3);
    for payload in &received {
        assert_eq!(payload.as_slice(), b"msg\0");
    }
    println!("all three recipients got {:?}", received[0]);
}
