/// Mock-server tests need a loopback listener; some sandboxes refuse one.
pub fn should_skip_httpmock() -> bool {
    match std::net::TcpListener::bind(("127.0.0.1", 0)) {
        Ok(_) => false,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping mock server test: binding to localhost is not permitted");
            true
        }
        Err(err) => panic!("failed to bind localhost for mock server tests: {err}"),
    }
}
