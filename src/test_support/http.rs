use std::future::Future;

use httpmock::MockServer;
use tokio::runtime::Builder;

/// Start a fresh `httpmock::MockServer` instance for use in unit tests.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}

/// Drives `future` to completion on a fresh current-thread Tokio runtime.
///
/// Lets synchronous `#[test]` functions talk to a blocking `MockServer` through `reqwest`.
pub fn block_on<F: Future>(future: F) -> F::Output {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime")
        .block_on(future)
}
