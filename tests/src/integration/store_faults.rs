//! # Store Faults
//!
//! Corrupt or missing data, partial creates, and an unreachable store.
//! Listings must degrade to "fewer objectives" and never abort.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{player, service};
    use objective_registry::prelude::*;

    const INDEX: &str = "objective_keys";

    fn index_of(store: &InMemoryStore) -> Vec<String> {
        store
            .raw(INDEX)
            .map(|raw| serde_json::from_slice(&raw).expect("index is a JSON array"))
            .unwrap_or_default()
    }

    fn record_json(owner: &PlayerAddress, role: &str, status: &str) -> String {
        format!(
            r#"{{"data":"FHE-NQ==","timestamp":1700000000,"playerAddress":"{owner}","role":"{role}","status":"{status}"}}"#
        )
    }

    // =========================================================================
    // PARTIAL CREATE
    // =========================================================================

    #[tokio::test]
    async fn test_index_failure_leaves_named_orphan() {
        let (service, store, _clock) = service();
        let caller = player(1).address();
        store.reject_key(INDEX);

        let err = service
            .create(&caller, &NewObjective::new("Seer", 4.0))
            .await
            .unwrap_err();

        let RegistryError::IndexNotUpdated { id, .. } = &err else {
            panic!("expected IndexNotUpdated, got {err:?}");
        };
        assert!(err.to_string().contains(id.as_str()));
        assert!(err.is_retryable());

        // Record exists but nothing lists it
        assert!(store.raw(&format!("objective_{id}")).is_some());
        assert!(service.list().await.unwrap().objectives.is_empty());
        assert_eq!(service.stats().await.orphaned_records, 1);

        // Re-creating is the recovery path
        store.accept_key(INDEX);
        let retried = service
            .create(&caller, &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        assert_ne!(retried.id.as_str(), id.as_str());

        let listing = service.list().await.unwrap();
        assert_eq!(listing.objectives.len(), 1);
        assert_eq!(listing.objectives[0].id, retried.id);
        assert_eq!(index_of(&store), vec![retried.id.to_string()]);
    }

    #[tokio::test]
    async fn test_record_failure_writes_nothing() {
        let (service, store, _clock) = service();
        store.reject_writes(Some("user rejected transaction"));

        let err = service
            .create(&player(1).address(), &NewObjective::new("Witch", 5.0))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::WriteRejected(_)));
        assert!(err.is_user_rejection());
        assert!(store.is_empty());
        assert_eq!(service.stats().await.creation_failures, 1);
    }

    // =========================================================================
    // INDEX PROTOCOL
    // =========================================================================

    #[tokio::test]
    async fn test_appending_twice_keeps_one_entry() {
        let (service, store, _clock) = service();
        let created = service
            .create(&player(1).address(), &NewObjective::new("Hunter", 6.0))
            .await
            .unwrap();
        let writes = store.write_count();

        let wrote = service.records().append_to_index(&created.id).await.unwrap();

        assert!(!wrote);
        assert_eq!(store.write_count(), writes);
        assert_eq!(index_of(&store), vec![created.id.to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_index_is_compacted_on_next_append() {
        let (service, store, _clock) = service();
        let owner = player(1).address();
        store.insert_raw(INDEX, r#"["old","old"]"#);
        store.insert_raw("objective_old", record_json(&owner, "Villager", "hidden"));

        let created = service
            .create(&owner, &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();

        assert_eq!(index_of(&store), vec!["old".to_string(), created.id.to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_index_lists_each_record_once() {
        let (service, store, _clock) = service();
        let created = service
            .create(&player(1).address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        store.insert_raw(INDEX, format!(r#"["{0}","{0}"]"#, created.id));

        let listing = service.list().await.unwrap();

        assert_eq!(listing.objectives.len(), 1);
        assert!(listing.skipped.is_empty());
        assert_eq!(service.records().list_ids().await.unwrap(), vec![created.id]);
    }

    #[tokio::test]
    async fn test_malformed_index_reads_empty_and_is_replaced() {
        let (service, store, _clock) = service();
        store.insert_raw(INDEX, "{not an array");

        let listing = service.list().await.unwrap();
        assert!(listing.objectives.is_empty());
        assert!(listing.skipped.is_empty());

        let created = service
            .create(&player(1).address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        assert_eq!(index_of(&store), vec![created.id.to_string()]);
    }

    #[tokio::test]
    async fn test_blank_index_reads_empty() {
        let (service, store, _clock) = service();
        store.insert_raw(INDEX, "   \n");

        assert!(service.records().list_ids().await.unwrap().is_empty());
    }

    // =========================================================================
    // CORRUPT RECORDS
    // =========================================================================

    #[tokio::test]
    async fn test_absent_record_is_skipped() {
        let (service, store, _clock) = service();
        let created = service
            .create(&player(1).address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        store.insert_raw(INDEX, format!(r#"["ghost","{}"]"#, created.id));

        let listing = service.list().await.unwrap();

        assert_eq!(listing.objectives.len(), 1);
        assert_eq!(listing.objectives[0].id, created.id);
        assert_eq!(listing.skipped.len(), 1);
        assert_eq!(listing.skipped[0].id.as_str(), "ghost");
        assert_eq!(listing.skipped[0].reason, "record missing");
        assert_eq!(service.stats().await.records_skipped, 1);
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped() {
        let (service, store, _clock) = service();
        let owner = player(1).address();
        store.insert_raw(INDEX, r#"["broken","archived","good"]"#);
        store.insert_raw("objective_broken", "{oops");
        store.insert_raw("objective_archived", record_json(&owner, "Seer", "archived"));
        store.insert_raw("objective_good", record_json(&owner, "Witch", "revealed"));

        let listing = service.list().await.unwrap();

        assert_eq!(listing.objectives.len(), 1);
        assert_eq!(listing.objectives[0].status, ObjectiveStatus::Revealed);
        let skipped: Vec<&str> = listing.skipped.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(skipped, vec!["broken", "archived"]);
        assert!(listing
            .skipped
            .iter()
            .all(|s| s.reason.starts_with("malformed record")));
    }

    #[tokio::test]
    async fn test_record_without_status_reads_hidden() {
        let (service, store, _clock) = service();
        let owner = player(2).address();
        store.insert_raw(INDEX, r#"["legacy"]"#);
        store.insert_raw(
            "objective_legacy",
            format!(
                r#"{{"data":"FHE-Mg==","timestamp":1,"playerAddress":"{owner}","role":"Villager"}}"#
            ),
        );

        let objective = service.get(&ObjectiveId::new("legacy")).await.unwrap();
        assert_eq!(objective.status, ObjectiveStatus::Hidden);

        let revealed = service.reveal(&owner, &objective.id).await.unwrap();
        assert_eq!(revealed.status, ObjectiveStatus::Revealed);
    }

    #[tokio::test]
    async fn test_null_or_blank_status_lists_as_hidden() {
        let (service, store, _clock) = service();
        let owner = player(2).address();
        store.insert_raw(INDEX, r#"["nulled","blank"]"#);
        store.insert_raw(
            "objective_nulled",
            format!(r#"{{"data":"FHE-Mg==","timestamp":1,"playerAddress":"{owner}","role":"Seer","status":null}}"#),
        );
        store.insert_raw("objective_blank", record_json(&owner, "Witch", ""));

        let listing = service.list().await.unwrap();

        assert!(listing.skipped.is_empty());
        assert_eq!(listing.objectives.len(), 2);
        assert!(listing
            .objectives
            .iter()
            .all(|o| o.status == ObjectiveStatus::Hidden));
    }

    #[tokio::test]
    async fn test_malformed_record_is_not_found_for_transitions() {
        let (service, store, _clock) = service();
        store.insert_raw(INDEX, r#"["broken"]"#);
        store.insert_raw("objective_broken", "[]");

        let err = service
            .reveal(&player(1).address(), &ObjectiveId::new("broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
        assert_eq!(store.raw("objective_broken").unwrap(), b"[]".to_vec());
    }

    // =========================================================================
    // UNAVAILABLE STORE
    // =========================================================================

    #[tokio::test]
    async fn test_unavailable_store_fails_fast() {
        let (service, store, _clock) = service();
        let caller = player(1).address();
        let created = service
            .create(&caller, &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        let writes = store.write_count();
        store.set_available(false);

        let err = service
            .create(&caller, &NewObjective::new("Witch", 5.0))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::StoreUnavailable));
        assert!(err.is_retryable());

        assert!(matches!(
            service.list().await,
            Err(RegistryError::StoreUnavailable)
        ));
        assert!(matches!(
            service.reveal(&caller, &created.id).await,
            Err(RegistryError::StoreUnavailable)
        ));
        assert!(matches!(
            service.issue_challenge().await,
            Err(DisclosureError::Store(_))
        ));
        assert_eq!(store.write_count(), writes);

        // Back up: nothing was lost
        store.set_available(true);
        assert_eq!(service.list().await.unwrap().objectives.len(), 1);
    }
}
