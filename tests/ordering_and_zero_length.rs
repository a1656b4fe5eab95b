//! messages from a single sender arrive at the receiver in send order, and
//! a zero-length send delivers a message with an empty (not missing)
//! payload. Run with "cargo test --test ordering_and_zero_length -- --nocapture"

use std::sync::mpsc;

use libactor_rt::*;

#[test]
fn fifo_order_and_empty_payload() {
    println!("--- ordering + zero-length boundary");
    let (tx, rx) = mpsc::channel::<(Vec<i64>, bool)>();

    spawn(
        move |tx: mpsc::Sender<(Vec<i64>, bool)>| {
            let b = spawn(
                |tx: mpsc::Sender<(Vec<i64>, bool)>| {
                    let mut types = Vec::new();
                    let mut zero_len_ok = false;
                    for _ in 0..5 {
                        let msg = receive().expect("B expected 5 messages");
                        if msg.msg_type == 99 {
                            zero_len_ok = msg.data().is_empty();
                        }
                        types.push(msg.msg_type);
                        release(msg);
                    }
                    tx.send((types, zero_len_ok)).unwrap();
                },
                tx,
            );

            for t in 0..4 {
                send(b, t, b"x");
            }
            send(b, 99, &[]);
        },
        tx,
    );

    wait_finish();
    let (types, zero_len_ok) = rx.recv().expect("B never reported its result");
    assert_eq!(types, vec![0, 1, 2, 3, 99]);
    assert!(zero_len_ok, "zero-length send must deliver an empty payload, not be dropped");
    println!("ok");
}
