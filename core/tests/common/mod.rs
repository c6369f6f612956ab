//! Shared setup for tests that talk to the mock pet store over real HTTP.

#![allow(dead_code)]

use std::net::SocketAddr;

use petstore_harness::{Dispatcher, HarnessConfig};
use rstest::fixture;

/// Route harness logs to the test writer; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a seeded pet store on a random port in a background thread.
pub fn spawn_petstore() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            petstore_mock::run(listener).await
        })
        .unwrap();
    });

    addr
}

/// A dispatcher bound to a fresh pet store of its own.
#[fixture]
pub fn petstore() -> Dispatcher {
    init_tracing();
    let addr = spawn_petstore();
    Dispatcher::new(HarnessConfig::new(&format!("http://{addr}")))
}
