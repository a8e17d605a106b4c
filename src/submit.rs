//! Form submit handling: validate, send, report.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::form::Form;
use crate::notify::Notifier;
use crate::transport::{FormRequest, FormTransport};
use crate::validation::{InvalidName, validate_names};

/// Alert texts shown to the user.
pub mod messages {
    pub const INVALID_SCHOOL: &str = "School name should contain only letters and spaces.";
    pub const INVALID_TECHNICIAN: &str =
        "Technician name should contain only letters and spaces.";
    pub const SUBMITTED: &str = "Form submitted successfully!";
    pub const FAILED: &str = "Failed to submit the form. Please try again.";
    pub const CONNECTION_ERROR: &str = "An error occurred. Please check your connection.";
}

/// A submit attempt.
///
/// Clones share the prevented flag, so whoever dispatched the event can
/// observe whether the default navigation was suppressed.
#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    default_prevented: Arc<AtomicBool>,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the default form navigation.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A name field failed validation; nothing was sent.
    Rejected(InvalidName),
    /// The server answered 2xx; the form was reset.
    Succeeded { status: u16 },
    /// The server answered with a non-success status; the form was kept.
    Failed { status: u16 },
    /// No response was received; the form was kept.
    NetworkError { reason: String },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded { .. })
    }
}

/// Handles submit attempts for one form.
///
/// Attempts are independent. Nothing stops a second attempt while the
/// first is in flight; each runs to completion and alerts once.
pub struct SubmitHandler {
    form: Form,
    transport: Arc<dyn FormTransport>,
    notifier: Arc<dyn Notifier>,
}

impl SubmitHandler {
    pub fn new(form: Form, transport: Arc<dyn FormTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            form,
            transport,
            notifier,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Run one submit attempt.
    pub async fn handle(&self, event: &SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        let school = self.form.value("school");
        let technician = self.form.value("technician");

        if let Err(invalid) = validate_names(&school, &technician) {
            let message = match invalid {
                InvalidName::School => messages::INVALID_SCHOOL,
                InvalidName::Technician => messages::INVALID_TECHNICIAN,
            };
            tracing::info!(field = ?invalid, "Submission rejected by validation");
            self.notifier.alert(message);
            return SubmitOutcome::Rejected(invalid);
        }

        let request = FormRequest::from_form(&self.form);
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                tracing::info!(status = response.status, "Form submitted");
                self.notifier.alert(messages::SUBMITTED);
                self.form.reset();
                SubmitOutcome::Succeeded {
                    status: response.status,
                }
            }
            Ok(response) => {
                tracing::warn!(status = response.status, "Form submission refused");
                self.notifier.alert(messages::FAILED);
                SubmitOutcome::Failed {
                    status: response.status,
                }
            }
            Err(e) => {
                self.notifier.alert(messages::CONNECTION_ERROR);
                tracing::error!(error = ?e, "Form submission failed: {}", e);
                SubmitOutcome::NetworkError {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::device_form;
    use crate::testing::{CapturedLogs, RecordingNotifier, StubTransport};

    fn filled_form(school: &str, technician: &str) -> Form {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        form.set("serial", "LM-0042").unwrap();
        form.set("school", school).unwrap();
        form.set("technician", technician).unwrap();
        form.set("condition", "good").unwrap();
        form
    }

    fn handler(
        form: Form,
        transport: Arc<StubTransport>,
    ) -> (SubmitHandler, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (
            SubmitHandler::new(form, transport, notifier.clone()),
            notifier,
        )
    }

    #[tokio::test]
    async fn punctuation_in_school_blocks_submission() {
        let transport = Arc::new(StubTransport::status(200));
        let (handler, notifier) = handler(filled_form("St. Mary's", "John Smith"), transport.clone());

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(InvalidName::School));
        assert_eq!(notifier.messages(), vec![messages::INVALID_SCHOOL]);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_technician_blocks_submission() {
        let transport = Arc::new(StubTransport::status(200));
        let (handler, notifier) = handler(filled_form("Saint Marys", "J0hn"), transport.clone());

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(InvalidName::Technician));
        assert_eq!(notifier.messages(), vec![messages::INVALID_TECHNICIAN]);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn both_invalid_reports_school_only() {
        let transport = Arc::new(StubTransport::status(200));
        let (handler, notifier) = handler(filled_form("123", "456"), transport);

        handler.handle(&SubmitEvent::new()).await;

        assert_eq!(notifier.messages(), vec![messages::INVALID_SCHOOL]);
    }

    #[tokio::test]
    async fn whitespace_only_names_are_rejected() {
        let transport = Arc::new(StubTransport::status(200));
        let (handler, notifier) = handler(filled_form("Saint Marys", "   "), transport.clone());

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(InvalidName::Technician));
        assert_eq!(notifier.count(), 1);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn success_alerts_once_and_resets_form() {
        let transport = Arc::new(StubTransport::status(200));
        let form = filled_form("Saint Marys", "John Smith");
        let (handler, notifier) = handler(form.clone(), transport.clone());

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Succeeded { status: 200 });
        assert_eq!(notifier.messages(), vec![messages::SUBMITTED]);
        assert_eq!(form.value("school"), "");
        assert_eq!(form.value("technician"), "");
        assert_eq!(form.value("serial"), "");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn sends_every_field_with_untrimmed_values() {
        let transport = Arc::new(StubTransport::status(201));
        let (handler, _notifier) = handler(filled_form("  Saint Marys ", "John Smith"), transport.clone());

        handler.handle(&SubmitEvent::new()).await;

        let sent = transport.last_request().expect("request was sent");
        assert_eq!(sent.url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(sent.method, reqwest::Method::POST);
        assert_eq!(sent.body.len(), crate::form::DEVICE_FIELDS.len());
        assert_eq!(sent.body.get("school"), Some("  Saint Marys "));
        assert_eq!(sent.body.get("serial"), Some("LM-0042"));
        assert_eq!(sent.body.get("condition"), Some("good"));
    }

    #[tokio::test]
    async fn server_error_keeps_form_values() {
        let transport = Arc::new(StubTransport::status(500));
        let form = filled_form("Saint Marys", "John Smith");
        let (handler, notifier) = handler(form.clone(), transport);

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Failed { status: 500 });
        assert_eq!(notifier.messages(), vec![messages::FAILED]);
        assert_eq!(form.value("school"), "Saint Marys");
        assert_eq!(form.value("technician"), "John Smith");
    }

    #[tokio::test]
    async fn redirect_status_is_a_failure() {
        let transport = Arc::new(StubTransport::status(302));
        let (handler, notifier) = handler(filled_form("Saint Marys", "John Smith"), transport);

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert_eq!(outcome, SubmitOutcome::Failed { status: 302 });
        assert_eq!(notifier.messages(), vec![messages::FAILED]);
    }

    #[tokio::test]
    async fn network_failure_keeps_form_values() {
        let transport = Arc::new(StubTransport::offline());
        let form = filled_form("Saint Marys", "John Smith");
        let (handler, notifier) = handler(form.clone(), transport);

        let outcome = handler.handle(&SubmitEvent::new()).await;

        assert!(matches!(outcome, SubmitOutcome::NetworkError { .. }));
        assert_eq!(notifier.messages(), vec![messages::CONNECTION_ERROR]);
        assert_eq!(form.value("school"), "Saint Marys");
        assert_eq!(form.value("technician"), "John Smith");
    }

    #[tokio::test]
    async fn default_is_prevented_before_validation_runs() {
        let transport = Arc::new(StubTransport::status(200));
        let event = SubmitEvent::new();
        let notifier = Arc::new(RecordingNotifier::observing(event.clone()));
        let handler = SubmitHandler::new(
            filled_form("St. Mary's", "John Smith"),
            transport,
            notifier.clone(),
        );

        handler.handle(&event).await;

        assert!(event.default_prevented());
        assert_eq!(notifier.prevented_at_alert(), vec![true]);
    }

    #[tokio::test]
    async fn default_is_prevented_for_every_outcome() {
        for transport in [
            StubTransport::status(200),
            StubTransport::status(503),
            StubTransport::offline(),
        ] {
            let (handler, _) = handler(filled_form("Saint Marys", "John Smith"), Arc::new(transport));
            let event = SubmitEvent::new();
            handler.handle(&event).await;
            assert!(event.default_prevented());
        }
    }

    #[tokio::test]
    async fn overlapping_attempts_each_alert() {
        let transport = Arc::new(StubTransport::status(200));
        let (handler, notifier) = handler(filled_form("Saint Marys", "John Smith"), transport.clone());

        let (first, second) = (SubmitEvent::new(), SubmitEvent::new());
        let (a, b) = tokio::join!(handler.handle(&first), handler.handle(&second));

        assert!(a.is_success());
        assert!(b.is_success());
        assert_eq!(transport.calls(), 2);
        assert_eq!(notifier.count(), 2);
    }

    #[tokio::test]
    async fn transport_failure_is_logged_as_error() {
        let logs = CapturedLogs::new();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let (handler, _notifier) = handler(
            filled_form("Saint Marys", "John Smith"),
            Arc::new(StubTransport::offline()),
        );

        handler.handle(&SubmitEvent::new()).await;

        let errors = logs.lines_at("ERROR");
        assert_eq!(errors.len(), 1, "{}", logs.contents());
        assert!(errors[0].contains("Form submission failed"));
        assert!(errors[0].contains("network unreachable"));
    }

    #[tokio::test]
    async fn refused_status_is_not_logged_as_error() {
        let logs = CapturedLogs::new();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let (handler, _notifier) = handler(
            filled_form("Saint Marys", "John Smith"),
            Arc::new(StubTransport::status(500)),
        );

        handler.handle(&SubmitEvent::new()).await;

        assert!(logs.lines_at("ERROR").is_empty(), "{}", logs.contents());
        assert_eq!(logs.lines_at("WARN").len(), 1);
    }

    #[tokio::test]
    async fn unrecognised_form_method_is_sent_as_get() {
        let transport = Arc::new(StubTransport::status(200));
        let form = device_form("http://127.0.0.1:5000/", "put").unwrap();
        form.set("school", "Saint Marys").unwrap();
        form.set("technician", "John Smith").unwrap();
        let (handler, _notifier) = handler(form, transport.clone());

        handler.handle(&SubmitEvent::new()).await;

        let sent = transport.last_request().expect("request was sent");
        assert_eq!(sent.method, reqwest::Method::GET);
    }
}
