//! Local sockets for adapter tests. Nothing here leaves the loopback interface.

use std::net::TcpListener;
use std::time::Duration;

/// Timeout used against endpoints that never answer
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(300);

/// URL of a loopback port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Listener that completes the TCP handshake but never reads or replies.
/// Keep the listener alive for the duration of the test.
pub fn silent_endpoint() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}
