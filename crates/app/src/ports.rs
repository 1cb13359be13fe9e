//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod automation_repo;
pub mod messaging;
pub mod run_ledger;
pub mod task_repo;
pub mod webhook;

pub use automation_repo::AutomationRepository;
pub use messaging::{EmailMessage, EmailTransport, ProviderError, SmsProvider, VoiceProvider};
pub use run_ledger::RunLedger;
pub use task_repo::TaskRepository;
pub use webhook::{WebhookClient, WebhookRequest};
