//! Liveness endpoint.

/// Handle GET /healthz.
pub(crate) async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthz_body() {
        assert_eq!(tokio_test::block_on(healthz()), "ok");
    }
}
