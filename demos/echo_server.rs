/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */
#![allow(unused)]

//! a minimal HTTP server: one actor accepts connections, spawns a fresh
//! actor per connection, and each client actor writes a fixed response.
//! The HTTP handling itself is intentionally trivial — it doesn't parse
//! headers or routes.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use libactor_rt::prelude::*;

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 14\r\n\r\nHello, World!\n";

fn http_client(stream: TcpStream) {
    let mut stream = stream;
    let mut buf = [0u8; 512];
    // drain whatever the client sent until it stops pushing bytes or closes.
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) if buf[..n].ends_with(b"\r\n\r\n") || n < buf.len() => break,
            Ok(_) => continue,
        }
    }
    let _ = stream.write_all(RESPONSE);
}

fn http_listener(port: u16) {
    let listener = match TcpListener::bind(("127.0.0.1", port)) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("bind failed: {e}");
            return;
        }
    };
    println!("listening on 127.0.0.1:{port}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                spawn(http_client, stream);
            }
            Err(e) => eprintln!("accept failed: {e}"),
        }
    }
}

// manual init/wait/shutdown instead of run_actor_main!, mirroring the
// ?-propagating main() style used throughout the rest of this workspace.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let port: u16 = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(8080);

    try_spawn(http_listener, port)?;
    wait_finish();
    shutdown();
    Ok(())
}
