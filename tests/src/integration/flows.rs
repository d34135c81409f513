//! # Integration Test Flows
//!
//! End-to-end lifecycle tests driving the settlement service through its
//! inbound API with in-memory collaborators:
//!
//! 1. **Create → Fund**: bridge-verified foreign funding credits the primary account
//! 2. **Claims / Evaluations**: fee splits land on the named fee accounts
//! 3. **Paidout**: fee sweep, aggregate payout, and reconciliation log
//! 4. **Withdraw**: agent withdrawals and project refunds after payout

#[cfg(test)]
mod tests {
    use project_settlement::{
        ConfiguredFeeParams, Dec, ForeignTransaction, InMemoryBank, InMemoryProjectStore,
        InternalAccountId, ProjectDocument, ProjectSettlementApi, ProjectStatus,
        ProjectStore, SettlementConfig, SettlementError, SettlementService,
        SimulatedBridgeClient,
    };
    use shared_types::Did;

    type Service = SettlementService<
        InMemoryBank,
        InMemoryProjectStore,
        ConfiguredFeeParams,
        SimulatedBridgeClient,
    >;

    const PROJECT_WALLET: &str = "0x1111111111111111111111111111111111111111";
    const FUNDING_AMOUNT: i64 = 50_000;

    fn project_did() -> Did {
        Did::new("did:ixo:CYCc2xaJKrp8Yt947Nc6jd")
    }

    fn evaluator_did() -> Did {
        Did::new("did:ixo:EvAl1xaJKrp8Yt947Nc6jd")
    }

    /// Service with round-number parameters:
    /// claim fee 10 * factor 2 split 30/70, evaluation fee 20 * factor 2,
    /// evaluator pay expanded by 10^2 and taxed 10% (node half).
    fn test_service() -> Service {
        crate::init_tracing();
        let params = ConfiguredFeeParams::default()
            .with_claim_fee(Dec::from_uint(10))
            .with_evaluation_fee(Dec::from_uint(20))
            .with_ixo_factor(Dec::from_uint(2))
            .with_node_fee_percentage(Dec::percent(30))
            .with_evaluation_pay_fee_percentage(Dec::percent(10))
            .with_evaluation_pay_node_fee_percentage(Dec::percent(50));

        let config = SettlementConfig {
            token_decimal_places: 2,
            ..SettlementConfig::default()
        };

        let bridge = SimulatedBridgeClient::new();
        bridge.register_wallet(project_did(), PROJECT_WALLET);
        bridge.post_transaction(ForeignTransaction {
            tx_id: "0xfund01".to_string(),
            project_did: project_did(),
            amount: FUNDING_AMOUNT,
        });

        SettlementService::new(
            InMemoryBank::new(),
            InMemoryProjectStore::new(),
            params,
            bridge,
            config,
        )
    }

    /// Drive a freshly created project to `Funded`.
    async fn fund(svc: &Service, evaluator_pay: i64) {
        svc.create_project(ProjectDocument::new(project_did(), evaluator_pay))
            .await
            .unwrap();
        svc.update_project_status(&project_did(), ProjectStatus::Pending, None)
            .await
            .unwrap();
        svc.update_project_status(
            &project_did(),
            ProjectStatus::Funded,
            Some("0xfund01".to_string()),
        )
        .await
        .unwrap();
    }

    async fn balance(svc: &Service, id: InternalAccountId) -> i64 {
        svc.native_balance(&project_did(), &id).await.unwrap()
    }

    fn primary() -> InternalAccountId {
        InternalAccountId::primary(&project_did())
    }

    #[tokio::test]
    async fn test_funding_credits_the_primary_account() {
        let svc = test_service();
        fund(&svc, 0).await;

        assert_eq!(balance(&svc, primary()).await, FUNDING_AMOUNT);
        assert_eq!(
            svc.store().get_project(&project_did()).await.unwrap().status,
            ProjectStatus::Funded
        );
        // funding is a one-way mint: nothing was debited anywhere
        assert_eq!(balance(&svc, InternalAccountId::IxoFees).await, 0);
    }

    #[tokio::test]
    async fn test_funding_rejects_transaction_for_another_project() {
        let svc = test_service();
        svc.bridge().post_transaction(ForeignTransaction {
            tx_id: "0xother".to_string(),
            project_did: Did::new("did:ixo:SomebodyElse"),
            amount: 999,
        });

        svc.create_project(ProjectDocument::new(project_did(), 0))
            .await
            .unwrap();
        svc.update_project_status(&project_did(), ProjectStatus::Pending, None)
            .await
            .unwrap();

        let err = svc
            .update_project_status(
                &project_did(),
                ProjectStatus::Funded,
                Some("0xother".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::VerificationFailed(_)));

        // rejected funding leaves the project in Pending with no credit
        let doc = svc.store().get_project(&project_did()).await.unwrap();
        assert_eq!(doc.status, ProjectStatus::Pending);
        assert_eq!(balance(&svc, primary()).await, 0);
    }

    #[tokio::test]
    async fn test_status_cannot_skip_forward() {
        let svc = test_service();
        svc.create_project(ProjectDocument::new(project_did(), 0))
            .await
            .unwrap();

        let err = svc
            .update_project_status(
                &project_did(),
                ProjectStatus::Funded,
                Some("0xfund01".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_claims_split_fees_onto_named_accounts() {
        let svc = test_service();
        fund(&svc, 0).await;

        // two claims at base 10 * 2 = 20 each, node share 30%
        svc.create_claim(&project_did()).await.unwrap();
        svc.create_claim(&project_did()).await.unwrap();

        assert_eq!(balance(&svc, InternalAccountId::ValidatingNodeSetFees).await, 12);
        assert_eq!(balance(&svc, InternalAccountId::IxoFees).await, 28);
        assert_eq!(balance(&svc, primary()).await, FUNDING_AMOUNT - 40);
    }

    #[tokio::test]
    async fn test_evaluation_pays_the_evaluator_net_of_fees() {
        let svc = test_service();
        // evaluator pay 100, expanded by 10^2 -> total 10_000
        fund(&svc, 100).await;

        svc.create_evaluation(&project_did(), &evaluator_did())
            .await
            .unwrap();

        // evaluation fee: base 20 * 2 = 40, node 12, platform 28
        assert_eq!(balance(&svc, InternalAccountId::ValidatingNodeSetFees).await, 12);
        assert_eq!(balance(&svc, InternalAccountId::IxoFees).await, 28);
        // payout: fee 1_000 of 10_000; payee 9_000, node 500, platform 500
        assert_eq!(
            balance(&svc, InternalAccountId::Did(evaluator_did())).await,
            9_000
        );
        assert_eq!(
            balance(&svc, InternalAccountId::InitiatingNodePayFees).await,
            500
        );
        assert_eq!(balance(&svc, InternalAccountId::IxoPayFees).await, 500);
        assert_eq!(
            balance(&svc, primary()).await,
            FUNDING_AMOUNT - 40 - 10_000
        );
    }

    #[tokio::test]
    async fn test_paidout_sweeps_fees_and_reconciles() {
        let svc = test_service();
        fund(&svc, 100).await;

        svc.create_claim(&project_did()).await.unwrap();
        svc.create_evaluation(&project_did(), &evaluator_did())
            .await
            .unwrap();

        for status in [
            ProjectStatus::Started,
            ProjectStatus::Stopped,
            ProjectStatus::Paidout,
        ] {
            svc.update_project_status(&project_did(), status, None)
                .await
                .unwrap();
        }

        // IxoFees aggregated 14 + 28 (platform fee legs) + 6 + 12 (node
        // legs) + 500 + 500 (payout fee legs), then paid out to zero
        assert_eq!(balance(&svc, InternalAccountId::IxoFees).await, 0);
        assert_eq!(balance(&svc, InternalAccountId::IxoPayFees).await, 0);
        assert_eq!(balance(&svc, InternalAccountId::InitiatingNodePayFees).await, 0);
        assert_eq!(balance(&svc, InternalAccountId::ValidatingNodeSetFees).await, 0);

        let log = svc.store().withdrawals(&project_did()).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount, 14 + 28 + 6 + 12 + 500 + 500);
        assert_eq!(log[0].source_foreign_wallet, PROJECT_WALLET);
        assert_eq!(
            log[0].recipient_foreign_address,
            svc.config().platform_foreign_wallet
        );

        // the evaluator's earnings and the unspent primary balance remain
        assert_eq!(
            balance(&svc, InternalAccountId::Did(evaluator_did())).await,
            9_000
        );
        assert_eq!(
            balance(&svc, primary()).await,
            FUNDING_AMOUNT - 20 - 40 - 10_000
        );
    }

    #[tokio::test]
    async fn test_paidout_requires_a_registered_foreign_wallet() {
        let svc = test_service();
        let orphan = Did::new("did:ixo:NoWallet");
        svc.bridge().post_transaction(ForeignTransaction {
            tx_id: "0xfund02".to_string(),
            project_did: orphan.clone(),
            amount: 100,
        });

        svc.create_project(ProjectDocument::new(orphan.clone(), 0))
            .await
            .unwrap();
        svc.update_project_status(&orphan, ProjectStatus::Pending, None)
            .await
            .unwrap();

        // funding needs only the transaction; the wallet is required at
        // payout time
        svc.update_project_status(&orphan, ProjectStatus::Funded, Some("0xfund02".to_string()))
            .await
            .unwrap();
        svc.update_project_status(&orphan, ProjectStatus::Started, None)
            .await
            .unwrap();
        svc.update_project_status(&orphan, ProjectStatus::Stopped, None)
            .await
            .unwrap();

        let err = svc
            .update_project_status(&orphan, ProjectStatus::Paidout, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::BridgeFailed(_)));
        assert_eq!(
            svc.store().get_project(&orphan).await.unwrap().status,
            ProjectStatus::Stopped
        );
    }

    #[tokio::test]
    async fn test_agent_withdrawal_and_project_refund() {
        let svc = test_service();
        fund(&svc, 100).await;
        svc.create_evaluation(&project_did(), &evaluator_did())
            .await
            .unwrap();

        for status in [
            ProjectStatus::Started,
            ProjectStatus::Stopped,
            ProjectStatus::Paidout,
        ] {
            svc.update_project_status(&project_did(), status, None)
                .await
                .unwrap();
        }

        // the evaluator takes their earnings to their own foreign address
        svc.withdraw_funds(
            &project_did(),
            &evaluator_did(),
            "0xevaluator".to_string(),
            false,
        )
        .await
        .unwrap();
        assert_eq!(balance(&svc, InternalAccountId::Did(evaluator_did())).await, 0);

        // the remaining project balance is refunded to the project wallet
        let remaining = balance(&svc, primary()).await;
        assert!(remaining > 0);
        svc.withdraw_funds(&project_did(), &project_did(), String::new(), true)
            .await
            .unwrap();
        assert_eq!(balance(&svc, primary()).await, 0);

        let log = svc.store().withdrawals(&project_did()).await;
        assert_eq!(log.len(), 3); // payout sweep + agent withdrawal + refund
        assert_eq!(log[1].amount, 9_000);
        assert_eq!(log[1].recipient_foreign_address, "0xevaluator");
        assert_eq!(log[2].amount, remaining);
        assert_eq!(log[2].recipient_foreign_address, PROJECT_WALLET);

        let transfers = svc.bridge().initiated_transfers();
        assert_eq!(transfers.len(), 3);
        assert!(transfers.iter().all(|t| t.from_wallet == PROJECT_WALLET));
    }

    #[tokio::test]
    async fn test_agent_account_provisioning_is_idempotent() {
        let svc = test_service();
        fund(&svc, 0).await;

        let agent = Did::new("did:ixo:Agent1");
        svc.create_agent(&project_did(), &agent).await.unwrap();
        let map_before = svc.store().account_map(&project_did()).await;

        svc.create_agent(&project_did(), &agent).await.unwrap();
        let map_after = svc.store().account_map(&project_did()).await;

        assert_eq!(map_before, map_after);
        assert_eq!(
            map_after.get(&InternalAccountId::Did(agent.clone())),
            map_before.get(&InternalAccountId::Did(agent))
        );
    }
}
