//! # App Flows
//!
//! Commands executed against a live service and folded into presentation
//! state, the way a client session would drive them.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{player, service};
    use objective_registry::app::{reduce_all, TransactionStatus, ACTION_LOG_CAPACITY};
    use objective_registry::prelude::*;

    async fn step<A>(
        api: &A,
        state: AppState,
        wallet: Option<&dyn MessageSigner>,
        command: Command,
    ) -> AppState
    where
        A: ObjectiveRegistryApi + DisclosureApi,
    {
        let events = execute(api, &state, wallet, command).await;
        reduce_all(state, events)
    }

    #[tokio::test]
    async fn test_session_create_reveal_disclose_complete() {
        let (service, _store, _clock) = service();
        let wallet = player(1);
        let signer: Option<&dyn MessageSigner> = Some(&wallet);

        let mut state = step(
            &service,
            AppState::new(),
            signer,
            Command::Create(NewObjective::new("Seer", 4.0)),
        )
        .await;
        assert_eq!(state.stats().hidden, 1);
        let id = state.objectives[0].id.clone();

        state = step(&service, state, signer, Command::Reveal(id.clone())).await;
        assert_eq!(state.stats().revealed, 1);
        assert_eq!(
            state.transaction.as_ref().map(|b| b.message.as_str()),
            Some("Objective revealed successfully!")
        );

        state = step(&service, state, signer, Command::Disclose(id.clone())).await;
        assert_eq!(state.selected.as_ref(), Some(&id));
        assert_eq!(state.decrypted.as_ref().map(|d| d.value), Some(4.0));
        assert_eq!(
            state.action_log[0].message,
            "Decrypted objective with code: 4"
        );

        state = step(&service, state, signer, Command::ToggleDecrypted).await;
        assert!(state.decrypted.is_none());

        state = step(&service, state, signer, Command::Complete(id.clone())).await;
        let stats = state.stats();
        assert_eq!((stats.total, stats.completed), (1, 1));

        // The stored view agrees with the folded one
        assert_eq!(
            service.get(&id).await.unwrap().status,
            ObjectiveStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_other_player_cannot_reveal_from_session() {
        let (service, _store, _clock) = service();
        let owner = player(1);
        let other = player(2);

        let state = step(
            &service,
            AppState::new(),
            Some(&owner),
            Command::Create(NewObjective::new("Witch", 5.0)),
        )
        .await;
        let id = state.objectives[0].id.clone();

        let state = step(&service, state, Some(&other), Command::Reveal(id)).await;

        let banner = state.transaction.as_ref().unwrap();
        assert_eq!(banner.status, TransactionStatus::Error);
        assert!(banner.message.starts_with("Reveal failed: "));
        assert!(state.action_log[0]
            .message
            .starts_with("Failed to reveal objective: "));
        assert_eq!(state.stats().hidden, 1);
    }

    #[tokio::test]
    async fn test_refresh_reports_skipped_records() {
        let (service, store, _clock) = service();
        let wallet = player(1);
        service
            .create(&wallet.address(), &NewObjective::new("Hunter", 6.0))
            .await
            .unwrap();
        let mut index: Vec<String> =
            serde_json::from_slice(&store.raw("objective_keys").unwrap()).unwrap();
        index.push("ghost".to_string());
        store.insert_raw("objective_keys", serde_json::to_vec(&index).unwrap());

        let state = step(&service, AppState::new(), None, Command::Refresh).await;

        assert_eq!(state.objectives.len(), 1);
        assert_eq!(state.skipped, 1);
        assert!(!state.refreshing);
        assert_eq!(state.action_log[0].message, "Refreshed objectives list");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_listing() {
        let (service, store, _clock) = service();
        let wallet = player(1);

        let state = step(
            &service,
            AppState::new(),
            Some(&wallet),
            Command::Create(NewObjective::new("Villager", 2.0)),
        )
        .await;
        store.set_available(false);

        let state = step(&service, state, None, Command::Refresh).await;

        assert_eq!(state.objectives.len(), 1);
        assert!(!state.refreshing);
        assert_eq!(state.action_log[0].message, "Failed to refresh objectives");
    }

    #[tokio::test]
    async fn test_filters_over_loaded_objectives() {
        let (service, _store, clock) = service();
        let mut state = AppState::new();

        for (n, role) in (1u8..).zip(STANDARD_ROLES) {
            clock.advance(1_000);
            let wallet = player(n);
            state = step(
                &service,
                state,
                Some(&wallet),
                Command::Create(NewObjective::new(role, f64::from(n))),
            )
            .await;
        }
        let seer = state
            .objectives
            .iter()
            .find(|o| o.role == "Seer")
            .unwrap()
            .clone();
        state = step(&service, state, Some(&player(3)), Command::Reveal(seer.id)).await;

        let hidden_only = StatusFilter::Only(ObjectiveStatus::Hidden);
        state = reduce(state, AppEvent::FilterChanged(hidden_only));
        assert_eq!(state.visible().len(), 4);

        state = reduce(state, AppEvent::SearchChanged("wolf".to_string()));
        let visible: Vec<&str> = state.visible().into_iter().map(|o| o.role.as_str()).collect();
        assert_eq!(visible, vec!["Werewolf"]);

        let revealed_only = StatusFilter::Only(ObjectiveStatus::Revealed);
        state = reduce(state, AppEvent::FilterChanged(revealed_only));
        assert!(state.visible().is_empty());
    }

    #[tokio::test]
    async fn test_action_log_is_bounded() {
        let (service, _store, _clock) = service();
        let mut state = AppState::new();

        for _ in 0..ACTION_LOG_CAPACITY + 5 {
            state = step(&service, state, None, Command::Refresh).await;
        }

        assert_eq!(state.action_log.len(), ACTION_LOG_CAPACITY);
        assert!(state
            .log_lines()
            .iter()
            .all(|line| line.starts_with('[') && line.ends_with("Refreshed objectives list")));
    }
}
