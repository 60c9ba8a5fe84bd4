//! User intents and their execution against the registry.
//!
//! [`execute`] runs one [`Command`] and returns the [`AppEvent`]s the caller
//! folds into its state. It never mutates state itself.

use crate::app::state::{ActionLogEntry, AppEvent, AppState};
use crate::domain::entities::{NewObjective, Objective};
use crate::domain::value_objects::ObjectiveId;
use crate::errors::RegistryError;
use crate::ports::inbound::{DisclosureApi, ObjectiveRegistryApi};
use crate::ports::outbound::MessageSigner;
use tracing::debug;

/// Banner text while a creation runs.
pub const SUBMITTING: &str = "Encoding and submitting objective...";
/// Banner text after a creation succeeds.
pub const SUBMITTED: &str = "Objective submitted securely!";
/// Banner text while a transition runs.
pub const PROCESSING: &str = "Processing objective...";
/// Banner text after a reveal succeeds.
pub const REVEALED: &str = "Objective revealed successfully!";
/// Banner text after a completion succeeds.
pub const COMPLETED: &str = "Objective completed successfully!";
/// Banner text when the wallet declined a write.
pub const USER_REJECTED: &str = "Transaction rejected by user";

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Reload the listing.
    Refresh,
    /// Create an objective.
    Create(NewObjective),
    /// hidden → revealed.
    Reveal(ObjectiveId),
    /// revealed → completed.
    Complete(ObjectiveId),
    /// Sign a challenge and show the plaintext of an objective.
    Disclose(ObjectiveId),
    /// Hide the plaintext if shown, otherwise disclose the selected objective.
    ToggleDecrypted,
}

/// Run `command` as `wallet` (or as nobody, if no wallet is connected).
pub async fn execute<A>(
    api: &A,
    state: &AppState,
    wallet: Option<&dyn MessageSigner>,
    command: Command,
) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + DisclosureApi + ?Sized,
{
    debug!(?command, connected = wallet.is_some(), "Executing command");

    match command {
        Command::Refresh => refresh(api).await,
        Command::Create(input) => create(api, wallet, input).await,
        Command::Reveal(id) => reveal(api, wallet, id).await,
        Command::Complete(id) => complete(api, wallet, id).await,
        Command::Disclose(id) => disclose(api, state, wallet, id).await,
        Command::ToggleDecrypted => {
            if state.decrypted.is_some() {
                vec![AppEvent::DecryptionHidden]
            } else if let Some(id) = state.selected.clone() {
                disclose(api, state, wallet, id).await
            } else {
                Vec::new()
            }
        }
    }
}

fn log(message: impl Into<String>) -> AppEvent {
    AppEvent::ActionLogged(ActionLogEntry::now(message))
}

async fn refresh<A>(api: &A) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + ?Sized,
{
    let mut events = vec![AppEvent::RefreshStarted];
    match api.list().await {
        Ok(listing) => {
            events.push(AppEvent::ListingLoaded(listing));
            events.push(log("Refreshed objectives list"));
        }
        Err(_) => {
            events.push(AppEvent::RefreshFailed);
            events.push(log("Failed to refresh objectives"));
        }
    }
    events
}

async fn create<A>(api: &A, wallet: Option<&dyn MessageSigner>, input: NewObjective) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + ?Sized,
{
    let Some(wallet) = wallet else {
        return vec![log("Attempted to submit without wallet connection")];
    };

    let mut events = vec![AppEvent::TransactionStarted(SUBMITTING.to_string())];
    match api.create(&wallet.address(), &input).await {
        Ok(objective) => {
            events.push(AppEvent::TransactionSucceeded(SUBMITTED.to_string()));
            events.push(log(format!("Created new objective: {}", input.role)));
            events.extend(refresh(api).await);
            if !events
                .iter()
                .any(|e| matches!(e, AppEvent::ListingLoaded(_)))
            {
                events.push(AppEvent::ObjectiveUpdated(objective));
            }
        }
        Err(e) => {
            let message = submission_failure(&e);
            events.push(AppEvent::TransactionFailed(message.clone()));
            events.push(log(format!("Failed to submit objective: {message}")));
        }
    }
    events
}

fn submission_failure(err: &RegistryError) -> String {
    if err.is_user_rejection() {
        USER_REJECTED.to_string()
    } else {
        format!("Submission failed: {err}")
    }
}

async fn reveal<A>(api: &A, wallet: Option<&dyn MessageSigner>, id: ObjectiveId) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + ?Sized,
{
    let Some(wallet) = wallet else {
        return vec![log("Attempted to reveal without wallet connection")];
    };

    let result = api.reveal(&wallet.address(), &id).await;
    transition_events(result, REVEALED, "Revealed", "Reveal failed", "reveal", &id)
}

async fn complete<A>(api: &A, wallet: Option<&dyn MessageSigner>, id: ObjectiveId) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + ?Sized,
{
    let Some(wallet) = wallet else {
        return vec![log("Attempted to complete without wallet connection")];
    };

    let result = api.complete(&wallet.address(), &id).await;
    transition_events(result, COMPLETED, "Completed", "Completion failed", "complete", &id)
}

fn transition_events(
    result: Result<Objective, RegistryError>,
    success_banner: &str,
    done_verb: &str,
    failure_prefix: &str,
    verb: &str,
    id: &ObjectiveId,
) -> Vec<AppEvent> {
    let mut events = vec![AppEvent::TransactionStarted(PROCESSING.to_string())];
    match result {
        Ok(objective) => {
            events.push(AppEvent::TransactionSucceeded(success_banner.to_string()));
            events.push(log(format!("{done_verb} objective: {id}")));
            events.push(AppEvent::ObjectiveUpdated(objective));
        }
        Err(e) => {
            events.push(AppEvent::TransactionFailed(format!("{failure_prefix}: {e}")));
            events.push(log(format!("Failed to {verb} objective: {e}")));
        }
    }
    events
}

async fn disclose<A>(
    api: &A,
    state: &AppState,
    wallet: Option<&dyn MessageSigner>,
    id: ObjectiveId,
) -> Vec<AppEvent>
where
    A: ObjectiveRegistryApi + DisclosureApi + ?Sized,
{
    let Some(wallet) = wallet else {
        return vec![log("Attempted to decrypt without wallet connection")];
    };

    let objective = match state.objective(&id) {
        Some(loaded) => loaded.clone(),
        None => match api.get(&id).await {
            Ok(fetched) => fetched,
            Err(_) => return vec![log("Failed to decrypt objective")],
        },
    };

    let mut events = Vec::new();
    if state.selected.as_ref() != Some(&id) {
        events.push(AppEvent::Selected(id));
    }

    let disclosed = match api.issue_challenge().await {
        Ok(challenge) => api.disclose(wallet, &challenge, &objective).await,
        Err(e) => Err(e),
    };

    match disclosed {
        Ok(disclosed) => {
            events.push(log(format!("Decrypted objective with code: {}", disclosed.value)));
            events.push(AppEvent::Decrypted(disclosed));
        }
        Err(_) => events.push(log("Failed to decrypt objective")),
    }
    events
}

// =============================================================================
// TESTS
// =============================================================================
