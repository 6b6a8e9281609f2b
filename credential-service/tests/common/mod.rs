use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthSettings;
use auth::Authenticator;
use auth::HashCost;
use auth::JwtSecret;
use auth::ResetToken;
use credential_service::credentials::errors::MailError;
use credential_service::credentials::models::EmailAddress;
use credential_service::credentials::models::RegisterUserCommand;
use credential_service::credentials::ports::CredentialServicePort;
use credential_service::credentials::ports::MailSender;
use credential_service::credentials::service::CredentialService;
use credential_service::repositories::InMemoryCredentialStore;
use tokio::sync::Mutex;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Mail sender that keeps every reset mail for inspection.
#[derive(Default)]
pub struct RecordingMailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailSender {
    /// Most recent reset token value mailed to `email`.
    pub async fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send_reset_email(
        &self,
        email: &str,
        reset_token: &ResetToken,
    ) -> Result<(), MailError> {
        self.sent
            .lock()
            .await
            .push((email.to_string(), reset_token.value().to_string()));
        Ok(())
    }
}

/// Credential service wired to in-memory adapters
pub struct TestApp {
    pub service: CredentialService<InMemoryCredentialStore, RecordingMailSender>,
    pub store: Arc<InMemoryCredentialStore>,
    pub mail: Arc<RecordingMailSender>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let settings = AuthSettings::new(JwtSecret::new(TEST_SECRET).expect("valid secret"))
            .with_hash_cost(HashCost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            });
        let authenticator =
            Arc::new(Authenticator::new(&settings).expect("Failed to build authenticator"));
        let store = Arc::new(InMemoryCredentialStore::new());
        let mail = Arc::new(RecordingMailSender::default());

        let service = CredentialService::new(store.clone(), mail.clone(), authenticator.clone())
            .with_admin_emails(vec!["root@x.com".to_string()]);

        Self {
            service,
            store,
            mail,
            authenticator,
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> auth::User {
        let command = RegisterUserCommand::new(
            EmailAddress::new(email.to_string()).expect("valid email"),
            password.to_string(),
        );
        self.service
            .register(command)
            .await
            .expect("Failed to register user")
    }
}
