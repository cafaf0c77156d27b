//! Property-based tests for classification and retry decisions

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use octadesk_transport::{HttpResponse, TransportError};
    use proptest::prelude::*;

    use crate::error::Error;
    use crate::http::retry::{Outcome, RetryDecision, RetryPolicy, is_transient_status};
    use crate::http::Payload;

    // ===== Strategy Generators =====

    fn arb_error_status() -> impl Strategy<Value = u16> {
        prop_oneof![300u16..400, 400u16..500, 500u16..600]
    }

    fn arb_body() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            "[a-zA-Z0-9 <>/]{0,64}".prop_map(String::into_bytes),
            "[a-z]{1,8}".prop_map(|s| format!(r#"{{"message":"{}"}}"#, s).into_bytes()),
        ]
    }

    fn response(status: u16, body: Vec<u8>) -> HttpResponse {
        HttpResponse::new(status, HashMap::new(), body)
    }

    // ===== Classification Properties =====

    proptest! {
        /// Every status maps to exactly the variant its range calls for
        #[test]
        fn prop_classification_is_total(status in arb_error_status(), body in arb_body()) {
            let error = Error::from_response(&response(status, body));
            let expected = match status {
                401 => matches!(error, Error::Authentication { .. }),
                404 => matches!(error, Error::NotFound { .. }),
                400 => matches!(error, Error::Validation { .. }),
                429 => matches!(error, Error::RateLimit { .. }),
                500..=599 => matches!(error, Error::Server { .. }),
                _ => matches!(error, Error::Api { .. }),
            };
            prop_assert!(expected, "status {} classified as {:?}", status, error);
            prop_assert_eq!(error.status(), Some(status));
        }

        /// The decoded body travels with the error unchanged
        #[test]
        fn prop_classification_preserves_body(status in arb_error_status(), body in arb_body()) {
            let expected = Payload::from_bytes(&body);
            let error = Error::from_response(&response(status, body));
            prop_assert_eq!(error.body(), Some(&expected));
        }

        /// Rate-limit hints exist only for positive integer seconds
        #[test]
        fn prop_rate_limit_hint(secs in 0u64..100_000) {
            let mut headers = HashMap::new();
            headers.insert("Retry-After".to_string(), secs.to_string());
            let error = Error::from_response(&HttpResponse::new(429, headers, Vec::new()));

            let expected = (secs > 0).then(|| Duration::from_secs(secs));
            prop_assert_eq!(error.retry_after(), expected);
        }
    }

    // ===== Retry Decision Properties =====

    proptest! {
        /// Nothing is retried once the budget is spent
        #[test]
        fn prop_final_attempt_never_retries(max in 1u32..10, status in 100u16..600) {
            let policy = RetryPolicy::new(max);
            let resp = response(status, Vec::new());
            prop_assert_eq!(policy.decide(max, Outcome::Response(&resp)), RetryDecision::Done);

            let err = TransportError::Timeout;
            prop_assert_eq!(policy.decide(max, Outcome::Network(&err)), RetryDecision::Done);
        }

        /// Within budget, only transient statuses are retried
        #[test]
        fn prop_only_transient_statuses_retry(attempt in 1u32..5, status in 100u16..600) {
            let policy = RetryPolicy::new(attempt + 1);
            let resp = response(status, Vec::new());
            let decision = policy.decide(attempt, Outcome::Response(&resp));

            if is_transient_status(status) {
                prop_assert_eq!(decision, RetryDecision::Retry(policy.backoff(attempt)));
            } else {
                prop_assert_eq!(decision, RetryDecision::Done);
            }
        }

        /// Backoff doubles with each attempt
        #[test]
        fn prop_backoff_doubles(attempt in 1u32..16, base_ms in 1u64..2_000) {
            let policy = RetryPolicy::builder()
                .base_delay(Duration::from_millis(base_ms))
                .build();
            prop_assert_eq!(policy.backoff(attempt + 1), policy.backoff(attempt) * 2);
        }
    }
}
