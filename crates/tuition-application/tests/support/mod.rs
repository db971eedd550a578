//! Test doubles shared by the application integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tuition_application::{
    FlowPresenter, Notice, NoticeKind, PaymentFlow, PaymentFlowSettings, PaymentReceipt,
};
use tuition_core::gateway::BankingGateway;
use tuition_core::otp::{CountdownDisplay, OtpChallenge, OtpCode};
use tuition_core::session::{AccessToken, Session, SessionStore, UserRecord};
use tuition_core::student::{DebtRecord, DebtStatus, StudentLookup, StudentRecord};
use tuition_core::transaction::{NewTransaction, TransactionId, TransactionRecord};
use tuition_core::{Money, Result, TuitionError};
use tuition_infrastructure::MemorySessionStore;

/// Scriptable backend that records every call it receives.
pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    pub token: Mutex<Result<AccessToken>>,
    pub user: Mutex<Result<UserRecord>>,
    pub lookups: Mutex<HashMap<String, Result<StudentLookup>>>,
    /// Lookups of these ids wait until the gate is notified.
    pub lookup_gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub pending: Mutex<Result<bool>>,
    pub created: Mutex<Result<TransactionId>>,
    pub created_requests: Mutex<Vec<NewTransaction>>,
    /// Set by `gate_create`: creation waits until notified.
    pub create_gate: Mutex<Option<Arc<Notify>>>,
    pub verify: Mutex<Result<()>>,
    pub verify_gate: Mutex<Option<Arc<Notify>>>,
    pub resend: Mutex<Result<()>>,
    pub transactions: Mutex<Result<Vec<TransactionRecord>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            token: Mutex::new(Ok(AccessToken::new("token-1"))),
            user: Mutex::new(Ok(user(10_000_000))),
            lookups: Mutex::new(HashMap::new()),
            lookup_gates: Mutex::new(HashMap::new()),
            pending: Mutex::new(Ok(false)),
            created: Mutex::new(Ok(TransactionId::new("TX1"))),
            created_requests: Mutex::new(Vec::new()),
            create_gate: Mutex::new(None),
            verify: Mutex::new(Ok(())),
            verify_gate: Mutex::new(None),
            resend: Mutex::new(Ok(())),
            transactions: Mutex::new(Ok(Vec::new())),
        }
    }

    pub fn with_student(self, student_id: &str, amount: Money, status: DebtStatus) -> Self {
        self.lookups
            .lock()
            .unwrap()
            .insert(student_id.to_string(), Ok(lookup(student_id, amount, status)));
        self
    }

    pub fn gate_lookup(&self, student_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lookup_gates
            .lock()
            .unwrap()
            .insert(student_id.to_string(), gate.clone());
        gate
    }

    pub fn gate_create(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.create_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn gate_verify(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.verify_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl BankingGateway for MockGateway {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<AccessToken> {
        self.record("authenticate");
        self.token.lock().unwrap().clone()
    }

    async fn current_user(&self, _token: &AccessToken) -> Result<UserRecord> {
        self.record("current_user");
        self.user.lock().unwrap().clone()
    }

    async fn lookup_student(
        &self,
        _token: &AccessToken,
        student_id: &str,
    ) -> Result<StudentLookup> {
        self.record("lookup_student");
        let gate = self.lookup_gates.lock().unwrap().get(student_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.lookups
            .lock()
            .unwrap()
            .get(student_id)
            .cloned()
            .unwrap_or_else(|| Err(TuitionError::not_found("student", student_id)))
    }

    async fn has_pending_transaction(
        &self,
        _token: &AccessToken,
        _student_id: &str,
    ) -> Result<bool> {
        self.record("has_pending_transaction");
        self.pending.lock().unwrap().clone()
    }

    async fn create_transaction(
        &self,
        _token: &AccessToken,
        request: &NewTransaction,
    ) -> Result<TransactionId> {
        self.record("create_transaction");
        self.created_requests.lock().unwrap().push(request.clone());
        let gate = self.create_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.created.lock().unwrap().clone()
    }

    async fn verify_otp(
        &self,
        _token: &AccessToken,
        _transaction_id: &TransactionId,
        _code: &OtpCode,
    ) -> Result<()> {
        self.record("verify_otp");
        let gate = self.verify_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.verify.lock().unwrap().clone()
    }

    async fn resend_otp(
        &self,
        _token: &AccessToken,
        _transaction_id: &TransactionId,
    ) -> Result<()> {
        self.record("resend_otp");
        self.resend.lock().unwrap().clone()
    }

    async fn list_transactions(&self, _token: &AccessToken) -> Result<Vec<TransactionRecord>> {
        self.record("list_transactions");
        self.transactions.lock().unwrap().clone()
    }
}

/// Presenter that remembers what it was told.
#[derive(Default)]
pub struct RecordingPresenter {
    pub notices: Mutex<Vec<Notice>>,
    pub otp_messages: Mutex<Vec<String>>,
    pub confirm_enabled: Mutex<Option<bool>>,
    pub displayed_student: Mutex<Option<String>>,
    pub last_countdown: Mutex<Option<String>>,
    pub opened: Mutex<usize>,
    pub closed: Mutex<usize>,
    pub receipts: Mutex<Vec<PaymentReceipt>>,
}

impl RecordingPresenter {
    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|n| n.kind == NoticeKind::Error)
            .map(|n| n.text.clone())
    }

    pub fn last_otp_message(&self) -> Option<String> {
        self.otp_messages.lock().unwrap().last().cloned()
    }
}

impl FlowPresenter for RecordingPresenter {
    fn notice(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn student_changed(&self, selection: Option<(&StudentRecord, &DebtRecord)>) {
        *self.displayed_student.lock().unwrap() = selection.map(|(s, _)| s.student_id.clone());
    }

    fn confirm_enabled(&self, enabled: bool) {
        *self.confirm_enabled.lock().unwrap() = Some(enabled);
    }

    fn otp_opened(&self, challenge: &OtpChallenge) {
        *self.opened.lock().unwrap() += 1;
        *self.last_countdown.lock().unwrap() = Some(challenge.display().to_string());
    }

    fn countdown(&self, display: CountdownDisplay) {
        *self.last_countdown.lock().unwrap() = Some(display.to_string());
    }

    fn otp_error(&self, message: &str) {
        self.otp_messages.lock().unwrap().push(message.to_string());
    }

    fn otp_closed(&self) {
        *self.closed.lock().unwrap() += 1;
    }

    fn payment_succeeded(&self, receipt: &PaymentReceipt) {
        self.receipts.lock().unwrap().push(receipt.clone());
    }
}

pub fn user(balance: Money) -> UserRecord {
    UserRecord {
        id: 7,
        username: Some("payer01".to_string()),
        full_name: "Nguyen Van A".to_string(),
        email: "payer@example.com".to_string(),
        phone: Some("0901234567".to_string()),
        available_balance: balance,
    }
}

pub fn lookup(student_id: &str, amount: Money, status: DebtStatus) -> StudentLookup {
    StudentLookup {
        student: StudentRecord {
            student_id: student_id.to_string(),
            full_name: "Tran Thi B".to_string(),
            program: Some("Computer Science".to_string()),
        },
        debt: Some(DebtRecord {
            debt_id: Some(11),
            amount,
            semester: Some("HK1".to_string()),
            academic_year: Some("2024-2025".to_string()),
            due_date: None,
            status,
        }),
    }
}

/// A payment flow wired to the mock, with a logged-in payer holding `balance`.
pub struct Harness {
    pub gateway: Arc<MockGateway>,
    pub sessions: Arc<MemorySessionStore>,
    pub presenter: Arc<RecordingPresenter>,
    pub flow: Arc<PaymentFlow>,
}

impl Harness {
    pub async fn new(gateway: MockGateway, balance: Money) -> Self {
        Self::with_settings(gateway, balance, PaymentFlowSettings::default()).await
    }

    pub async fn with_settings(
        gateway: MockGateway,
        balance: Money,
        settings: PaymentFlowSettings,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let sessions = Arc::new(MemorySessionStore::new());
        sessions
            .save(Session::new(AccessToken::new("token-1"), user(balance)))
            .await
            .unwrap();
        let presenter = Arc::new(RecordingPresenter::default());
        let flow = Arc::new(PaymentFlow::new(
            gateway.clone(),
            sessions.clone(),
            presenter.clone(),
            settings,
        ));
        Self {
            gateway,
            sessions,
            presenter,
            flow,
        }
    }

    pub async fn balance(&self) -> Money {
        self.sessions.load().await.unwrap().available_balance()
    }
}
