//! Scan handling: classify, parse, resolve.
//!
//! `QrHandler::handle` is pure apart from logging and hands its
//! notifications back to the caller. `QrScanner` adds a sink and does the
//! dual reporting on failure: one error notification, then the error is
//! returned so the calling screen can render its own error state.

use super::decode::classify;
use super::notify::NotificationSink;
use super::parse::parse;
use super::resolve::resolve;
use super::types::{Notification, ScanOutcome};
use super::ScanError;
use crate::config::ScannerConfig;

/// Stateless scan pipeline. Safe to share between concurrent scans.
#[derive(Debug, Clone, Default)]
pub struct QrHandler {
    config: ScannerConfig,
}

impl QrHandler {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Turn scanned text into a navigation decision and one notification.
    pub async fn handle(&self, text: &str) -> Result<ScanOutcome, ScanError> {
        if text.len() > self.config.max_payload_bytes {
            return Err(ScanError::PayloadTooLarge {
                len: text.len(),
                max: self.config.max_payload_bytes,
            });
        }

        let category = classify(text);
        let parsed = parse(text, category)?;
        let resolution = resolve(&parsed, &self.config);

        tracing::info!(
            category = %category,
            navigate = resolution.dispatch.navigate_to().unwrap_or("-"),
            "QR scan handled"
        );

        Ok(ScanOutcome {
            category,
            parsed,
            dispatch: resolution.dispatch,
            notifications: vec![resolution.notification],
        })
    }
}

/// Handler wired to a notification sink.
pub struct QrScanner<S: NotificationSink> {
    handler: QrHandler,
    sink: S,
}

impl<S: NotificationSink> QrScanner<S> {
    pub fn new(handler: QrHandler, sink: S) -> Self {
        Self { handler, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Handle a scan and dispatch its notifications to the sink.
    ///
    /// On failure the sink gets exactly one destructive notification and
    /// the error is still returned.
    pub async fn scan(&self, text: &str) -> Result<ScanOutcome, ScanError> {
        match self.handler.handle(text).await {
            Ok(outcome) => {
                for notification in &outcome.notifications {
                    self.sink.notify(notification);
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "QR scan failed");
                self.sink.notify(&Notification::destructive(
                    "Error Processing QR Code",
                    e.to_string(),
                ));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{PayloadCategory, Severity};
    use crate::qr::notify::CollectingSink;
    use crate::qr::types::DisplayData;

    fn scanner() -> QrScanner<CollectingSink> {
        QrScanner::new(QrHandler::default(), CollectingSink::new())
    }

    #[tokio::test]
    async fn relative_product_path_navigates_to_itself() {
        let outcome = QrHandler::default().handle("/marketplace/5").await.unwrap();
        assert_eq!(outcome.category, PayloadCategory::Product);
        assert_eq!(outcome.dispatch.navigate_to(), Some("/marketplace/5"));
    }

    #[tokio::test]
    async fn external_url_is_not_navigated() {
        let outcome = QrHandler::default()
            .handle("https://evil.example.com")
            .await
            .unwrap();
        assert_eq!(outcome.category, PayloadCategory::Url);
        assert_eq!(outcome.dispatch.navigate_to(), None);
        assert_eq!(
            outcome.dispatch.display_data(),
            Some(&DisplayData::Payload(outcome.parsed.clone()))
        );
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].severity, Severity::Caution);
    }

    #[tokio::test]
    async fn domain_link_navigates_to_full_url() {
        let input = "https://site.com/batch-tracking/ABC123";
        let outcome = QrHandler::default().handle(input).await.unwrap();
        assert_eq!(outcome.category, PayloadCategory::Batch);
        assert_eq!(outcome.parsed.identifier.as_deref(), Some("ABC123"));
        assert_eq!(outcome.dispatch.navigate_to(), Some(input));
    }

    #[tokio::test]
    async fn recycling_center_json_navigates_to_center() {
        let outcome = QrHandler::default()
            .handle(r#"{"type":"recycling-center","centerId":"RC-42"}"#)
            .await
            .unwrap();
        assert_eq!(outcome.dispatch.navigate_to(), Some("/recycling-centers/RC-42"));
    }

    #[tokio::test]
    async fn plain_text_is_displayed() {
        let outcome = QrHandler::default()
            .handle("just some plain text")
            .await
            .unwrap();
        assert_eq!(outcome.category, PayloadCategory::Text);
        assert_eq!(outcome.dispatch.navigate_to(), None);
        assert_eq!(
            outcome.dispatch.display_data(),
            Some(&DisplayData::Text("just some plain text".into()))
        );
    }

    #[tokio::test]
    async fn empty_input_is_text() {
        let outcome = QrHandler::default().handle("").await.unwrap();
        assert_eq!(outcome.category, PayloadCategory::Text);
        assert_eq!(outcome.dispatch.display_data(), Some(&DisplayData::Text(String::new())));
    }

    #[tokio::test]
    async fn every_successful_scan_has_one_notification() {
        let handler = QrHandler::default();
        for input in [
            r#"{"batchId":"B"}"#,
            r#"{"type":"product"}"#,
            "https://site.com/profile/u",
            "/about",
            "https://evil.example.com",
            "hello",
            "[]",
        ] {
            let outcome = handler.handle(input).await.unwrap();
            assert_eq!(outcome.notifications.len(), 1, "{input}");
        }
    }

    #[tokio::test]
    async fn handle_is_idempotent() {
        let handler = QrHandler::default();
        let input = "https://site.com/batch-tracking/ABC123";
        let first = handler.handle(input).await.unwrap();
        let second = handler.handle(input).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn oversized_payload_rejected() {
        let handler = QrHandler::new(ScannerConfig {
            max_payload_bytes: 8,
            ..ScannerConfig::default()
        });
        let err = handler.handle("123456789").await.unwrap_err();
        assert_eq!(err, ScanError::PayloadTooLarge { len: 9, max: 8 });
    }

    #[tokio::test]
    async fn scanner_forwards_outcome_notification() {
        let scanner = scanner();
        scanner.scan(r#"{"productId":"P-9"}"#).await.unwrap();

        let sent = scanner.sink().take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Product QR Code Detected");
    }

    #[tokio::test]
    async fn scanner_reports_failure_and_returns_error() {
        let scanner = scanner();
        let err = scanner
            .scan(r#"{"type":"batch","batchId":[1,2]}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::MalformedIdentifier { .. }));

        let sent = scanner.sink().take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Error Processing QR Code");
        assert_eq!(sent[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn concurrent_scans_are_independent() {
        let handler = std::sync::Arc::new(QrHandler::default());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let handler = handler.clone();
            tasks.push(tokio::spawn(async move {
                let input = format!(r#"{{"batchId":"B-{i}"}}"#);
                handler.handle(&input).await.unwrap()
            }));
        }
        for (i, task) in tasks.into_iter().enumerate() {
            let outcome = task.await.unwrap();
            let expected = format!("/batch-tracking/B-{i}");
            assert_eq!(outcome.dispatch.navigate_to(), Some(expected.as_str()));
        }
    }
}
