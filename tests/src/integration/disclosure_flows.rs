//! # Disclosure Flows
//!
//! Challenge issuance, wallet signing and the two signature policies.
//! Disclosure is read-only: every scenario also checks the store was not
//! written.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{player, service, service_with, START_SECS};
    use async_trait::async_trait;
    use objective_registry::prelude::*;
    use std::sync::Arc;

    /// Claims `claimed` as its address but signs with a different key.
    struct Impostor {
        claimed: PlayerAddress,
        key: LocalWallet,
    }

    #[async_trait]
    impl MessageSigner for Impostor {
        fn address(&self) -> PlayerAddress {
            self.claimed.clone()
        }

        async fn sign_message(&self, message: &str) -> Result<WalletSignature, SignerError> {
            self.key.sign_message(message).await
        }
    }

    /// Stores the value scaled by 100 behind an `x100:` tag.
    struct ScaledCodec;

    impl ObjectiveCodec for ScaledCodec {
        fn name(&self) -> &'static str {
            "scaled"
        }

        fn encode(&self, value: f64) -> String {
            format!("x100:{}", value * 100.0)
        }

        fn decode(&self, token: &str) -> Option<f64> {
            token
                .strip_prefix("x100:")?
                .parse::<f64>()
                .ok()
                .map(|scaled| scaled / 100.0)
        }
    }

    fn verifying() -> ServiceConfig {
        ServiceConfig {
            signature_policy: SignaturePolicy::VerifySigner,
            ..ServiceConfig::default()
        }
    }

    // =========================================================================
    // CHALLENGE
    // =========================================================================

    #[tokio::test]
    async fn test_challenge_binds_store_chain_and_time() {
        let (service, _store, _clock) = service_with(ServiceConfig {
            chain_id: 11_155_111,
            disclosure_window_days: 7,
            ..ServiceConfig::default()
        });

        let challenge = service.issue_challenge().await.unwrap();

        assert_eq!(
            challenge.store_address,
            "0x5eC0000000000000000000000000000000000001"
        );
        assert_eq!(challenge.chain_id, 11_155_111);
        assert_eq!(challenge.start_timestamp, START_SECS);
        assert_eq!(challenge.expires_at(), START_SECS + 7 * 86_400);

        let message = challenge.message();
        let lines: Vec<&str> = message.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("publickey:0x"));
        assert_eq!(lines[1], "contractAddresses:0x5eC0000000000000000000000000000000000001");
        assert_eq!(lines[2], "contractsChainId:11155111");
        assert_eq!(lines[3], format!("startTimestamp:{START_SECS}"));
        assert_eq!(lines[4], "durationDays:7");
    }

    #[tokio::test]
    async fn test_challenges_carry_fresh_keys() {
        let (service, _store, _clock) = service();
        let first = service.issue_challenge().await.unwrap();
        let second = service.issue_challenge().await.unwrap();
        assert_ne!(first.public_key, second.public_key);
    }

    #[tokio::test]
    async fn test_wallet_signature_recovers_to_owner() {
        let (service, _store, _clock) = service();
        let wallet = player(4);
        let challenge = service.issue_challenge().await.unwrap();

        let signature = wallet.sign_message(&challenge.message()).await.unwrap();
        let recovered = recover_personal_signer(&challenge.message(), &signature).unwrap();

        assert!(recovered.matches(&wallet.address()));
    }

    // =========================================================================
    // CONSENT-ONLY POLICY
    // =========================================================================

    #[tokio::test]
    async fn test_owner_disclosure_is_read_only() {
        let (service, store, _clock) = service();
        let wallet = player(1);
        let created = service
            .create(&wallet.address(), &NewObjective::new("Werewolf", 7.0))
            .await
            .unwrap();
        let key = format!("objective_{}", created.id);
        let before = store.raw(&key).unwrap();
        let writes = store.write_count();

        let challenge = service.issue_challenge().await.unwrap();
        let disclosed = service.disclose(&wallet, &challenge, &created).await.unwrap();

        assert_eq!(disclosed.objective_id, created.id);
        assert_eq!(disclosed.value, 7.0);
        assert_eq!(disclosed.description(), "Make at least 3 incorrect accusations");
        assert_eq!(store.raw(&key).unwrap(), before);
        assert_eq!(store.write_count(), writes);
        assert_eq!(service.stats().await.disclosures_granted, 1);
    }

    #[tokio::test]
    async fn test_non_owner_is_refused_before_signing() {
        let (service, _store, _clock) = service();
        let owner = player(1);
        let other = player(2);
        let created = service
            .create(&owner.address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        // A declining wallet proves the signer is never asked
        other.set_declining(true);

        let challenge = service.issue_challenge().await.unwrap();
        let err = service
            .disclose(&other, &challenge, &created)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DisclosureError::Unauthorized {
                id: created.id.to_string()
            }
        );
        assert!(!err.is_retryable());
        assert_eq!(service.stats().await.disclosures_refused, 1);
    }

    #[tokio::test]
    async fn test_declined_signature_is_retryable() {
        let (service, _store, _clock) = service();
        let wallet = player(1);
        let created = service
            .create(&wallet.address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        let challenge = service.issue_challenge().await.unwrap();

        wallet.set_declining(true);
        let err = service
            .disclose(&wallet, &challenge, &created)
            .await
            .unwrap_err();
        assert!(matches!(err, DisclosureError::SignatureRejected(_)));
        assert!(err.is_retryable());

        wallet.set_declining(false);
        let disclosed = service.disclose(&wallet, &challenge, &created).await.unwrap();
        assert_eq!(disclosed.value, 4.0);
    }

    #[tokio::test]
    async fn test_consent_only_accepts_any_signature() {
        let (service, _store, _clock) = service();
        let owner = player(1);
        let created = service
            .create(&owner.address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();
        let impostor = Impostor {
            claimed: owner.address(),
            key: player(9),
        };

        let challenge = service.issue_challenge().await.unwrap();
        let disclosed = service.disclose(&impostor, &challenge, &created).await;

        assert!(disclosed.is_ok());
    }

    #[tokio::test]
    async fn test_undecodable_payload() {
        let (service, store, _clock) = service();
        let wallet = player(1);
        store.insert_raw("objective_junk", format!(
            r#"{{"data":"FHE-!!!","timestamp":1,"playerAddress":"{}","role":"Seer","status":"hidden"}}"#,
            wallet.address()
        ));
        let objective = service.get(&ObjectiveId::new("junk")).await.unwrap();

        let challenge = service.issue_challenge().await.unwrap();
        let err = service
            .disclose(&wallet, &challenge, &objective)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DisclosureError::MalformedData {
                id: "junk".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_foreign_plain_payload_decodes() {
        let (service, store, _clock) = service();
        let wallet = player(1);
        store.insert_raw("objective_plain", format!(
            r#"{{"data":"3","timestamp":1,"playerAddress":"{}","role":"Hunter"}}"#,
            wallet.address()
        ));
        let objective = service.get(&ObjectiveId::new("plain")).await.unwrap();

        let challenge = service.issue_challenge().await.unwrap();
        let disclosed = service.disclose(&wallet, &challenge, &objective).await.unwrap();

        assert_eq!(disclosed.value, 3.0);
        assert_eq!(disclosed.description(), "Successfully identify the Seer");
    }

    #[tokio::test]
    async fn test_substituted_codec_carries_create_and_disclose() {
        let (service, store, _clock) = service();
        let service = service.with_codec(Arc::new(ScaledCodec));
        let wallet = player(1);
        assert_eq!(service.codec().name(), "scaled");

        let created = service
            .create(&wallet.address(), &NewObjective::new("Seer", 4.0))
            .await
            .unwrap();

        let raw = store.raw(&format!("objective_{}", created.id)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["data"], "x100:400");
        assert_eq!(created.encoded_payload, "x100:400");

        let challenge = service.issue_challenge().await.unwrap();
        let disclosed = service.disclose(&wallet, &challenge, &created).await.unwrap();
        assert_eq!(disclosed.value, 4.0);

        // Tokens from the default codec are foreign to this one
        let foreign = Objective {
            encoded_payload: MarkerCodec::new().encode(4.0),
            ..created
        };
        assert!(matches!(
            service.disclose(&wallet, &challenge, &foreign).await,
            Err(DisclosureError::MalformedData { .. })
        ));
    }

    // =========================================================================
    // VERIFY-SIGNER POLICY
    // =========================================================================

    #[tokio::test]
    async fn test_verify_signer_accepts_owner() {
        let (service, _store, _clock) = service_with(verifying());
        let wallet = player(5);
        let created = service
            .create(&wallet.address(), &NewObjective::new("Villager", 2.0))
            .await
            .unwrap();

        let challenge = service.issue_challenge().await.unwrap();
        let disclosed = service.disclose(&wallet, &challenge, &created).await.unwrap();

        assert_eq!(disclosed.value, 2.0);
    }

    #[tokio::test]
    async fn test_verify_signer_rejects_foreign_key() {
        let (service, _store, _clock) = service_with(verifying());
        let owner = player(5);
        let created = service
            .create(&owner.address(), &NewObjective::new("Villager", 2.0))
            .await
            .unwrap();
        let impostor = Impostor {
            claimed: owner.address(),
            key: player(6),
        };

        let challenge = service.issue_challenge().await.unwrap();
        let err = service
            .disclose(&impostor, &challenge, &created)
            .await
            .unwrap_err();

        let DisclosureError::SignatureRejected(reason) = &err else {
            panic!("expected SignatureRejected, got {err:?}");
        };
        assert!(reason.contains(player(6).address().as_str()));
    }

    #[tokio::test]
    async fn test_disclosure_through_port_object() {
        let (service, _store, _clock) = service();
        let wallet = player(8);
        let created = service
            .create(&wallet.address(), &NewObjective::new("Witch", 1.0))
            .await
            .unwrap();

        let api: &dyn DisclosureApi = &service;
        let challenge = api.issue_challenge().await.unwrap();
        let disclosed = api.disclose(&wallet, &challenge, &created).await.unwrap();

        assert_eq!(disclosed.description(), "Protect a specific player until night 3");
    }
}
