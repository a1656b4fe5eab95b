//! end-to-end ping-pong: A spawns B, sends it a message, B replies, A
//! verifies the reply. Run with "cargo test --test s1_ping_pong -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn ping_pong() {
    println!("--- S1 ping-pong");
    let (tx, rx) = mpsc::channel::<(i64, Vec<u8>)>();

    spawn(
        move |tx: mpsc::Sender<(i64, Vec<u8>)>| {
            let a_id = self_id().unwrap();

            let b = spawn(
                move |a_id: ActorId| {
                    let msg = receive().expect("B expected a message from A");
                    assert_eq!(msg.sender, a_id);
                    assert_eq!(msg.msg_type, 1);
                    assert_eq!(msg.data(), b"hi");
                    reply(&msg, 2, b"ok");
                    release(msg);
                },
                a_id,
            );

            send(b, 1, b"hi");
            let reply_msg = receive().expect("A expected a reply from B");
            tx.send((reply_msg.msg_type, reply_msg.data().to_vec())).unwrap();
            release(reply_msg);
        },
        tx,
    );

    wait_finish();
    let (msg_type, data) = rx.recv().expect("A never reported its result");
    assert_eq!(msg_type, 2);
    assert_eq!(data, b"ok");
    println!("ok");
}
