/*
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * http://www.apache.org/licenses/LICENSE-2.0.
 */
#![allow(unused)]

use libactor_rt::prelude::*;

/// a greeter actor: receives a name, prints a greeting, exits.
fn greeter(_args: EntryArgs) {
    let msg = receive().expect("greeter expected a Greet message");
    let name = String::from_utf8_lossy(msg.data()).into_owned();
    println!("hello {}!", name);
    release(msg);
}

fn main_actor(args: EntryArgs) {
    tracing_subscriber::fmt::init();

    let greeter_id = spawn(greeter, EntryArgs { args: args.args.clone() });
    send(greeter_id, 0, b"world");
}

run_actor_main!(main_actor);
