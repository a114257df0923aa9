pub async fn landing() -> String {
    format!(
        "{} v{} is running, ask /v{}/livestream for the current stream",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        crate::constants::VERSION
    )
}
