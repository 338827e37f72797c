

/// Base url of the service under test, overridable with `BOOKINVENTORY_URL`
#[cfg(all(test, any(feature = "system_tests", feature = "load_tests")))]
fn service_url() -> String {
    std::env::var("BOOKINVENTORY_URL").unwrap_or("http://127.0.0.1:8080".to_string())
}
