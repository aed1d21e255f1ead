#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::state::LeftoverPayment;
    use crate::test_utils::{access_controller_bytes, Fixture, TestOracle, BILLING_AC, OWNER};

    const WALLET_OWNER: Pubkey = [0xEE; 32];

    fn no_transfer() -> impl FnMut(&Pubkey, u64) -> Result<(), OcrError> {
        |_: &Pubkey, _: u64| Ok(())
    }

    /// Registered payee token accounts, owned by an unrelated wallet
    fn registered(keys: &[Pubkey]) -> Vec<PayoutAccount> {
        keys.iter().map(|&key| PayoutAccount { key, owner: WALLET_OWNER }).collect()
    }

    /// Token account held by `wallet`
    fn held_by(wallet: Pubkey, key: u8) -> PayoutAccount {
        PayoutAccount { key: [key; 32], owner: wallet }
    }

    #[test]
    fn test_payout_account_matching() {
        let account = PayoutAccount { key: [1; 32], owner: [2; 32] };
        assert!(account.pays(&[1; 32]));
        assert!(account.pays(&[2; 32]));
        assert!(!account.pays(&[3; 32]));
    }

    #[test]
    fn test_parse_and_set_billing() {
        let mut fx = Fixture::new();
        let mut data = 10u32.to_le_bytes().to_vec();
        data.extend_from_slice(&3u32.to_le_bytes());
        let billing = parse_billing(&data).unwrap();
        assert_eq!(billing, Billing { observation_payment: 10, transmission_payment: 3 });

        process_set_billing(&mut fx.state, &Caller::bare(&OWNER), billing).unwrap();
        assert_eq!(fx.state.config.billing, billing);
    }

    #[test]
    fn test_billing_controller_member_can_set_billing() {
        let mut fx = Fixture::new();
        let member = [0x33; 32];
        let data = access_controller_bytes(&[member]);
        let caller = Caller { authority: &member, controller_key: &BILLING_AC, controller_data: &data };
        let billing = Billing { observation_payment: 1, transmission_payment: 1 };
        process_set_billing(&mut fx.state, &caller, billing).unwrap();

        let outsider = [0x34; 32];
        let caller = Caller { authority: &outsider, controller_key: &BILLING_AC, controller_data: &data };
        assert_eq!(
            process_set_billing(&mut fx.state, &caller, Billing::default()),
            Err(OcrError::AccessDenied)
        );
        assert_eq!(fx.state.config.billing, billing);
    }

    #[test]
    fn test_withdraw_limited_to_unowed_funds() {
        let (mut fx, _) = Fixture::with_committee(4, 1);
        fx.state.oracles.xs[0].payment = 300;
        fx.state
            .leftover_payments
            .push(LeftoverPayment { payee: [1; 32], amount: 200 })
            .unwrap();

        let mut sent = Vec::new();
        let recipient = [0x77; 32];
        let result = process_withdraw_funds(&fx.state, &Caller::bare(&OWNER), &recipient, 501, 1000, |to: &Pubkey, amount| {
            sent.push((*to, amount));
            Ok::<(), OcrError>(())
        });
        assert_eq!(result, Err(OcrError::InsufficientFunds));
        assert!(sent.is_empty());

        process_withdraw_funds(&fx.state, &Caller::bare(&OWNER), &recipient, 500, 1000, |to: &Pubkey, amount| {
            sent.push((*to, amount));
            Ok::<(), OcrError>(())
        })
        .unwrap();
        assert_eq!(sent, vec![(recipient, 500)]);
    }

    #[test]
    fn test_withdraw_from_underfunded_vault_fails() {
        let (mut fx, _) = Fixture::with_committee(4, 1);
        fx.state.oracles.xs[0].payment = 300;
        assert_eq!(
            process_withdraw_funds(&fx.state, &Caller::bare(&OWNER), &[1; 32], 0, 100, no_transfer()),
            Err(OcrError::InsufficientFunds)
        );
    }

    #[test]
    fn test_rotation_then_pay_remaining_credits_payees() {
        let (mut fx, _) = Fixture::with_committee(4, 1);
        for (i, oracle) in fx.state.oracles.as_mut_slice().iter_mut().enumerate() {
            oracle.payee = [0xA0 + i as u8; 32];
            oracle.payment = 10 + i as u64;
        }
        let fresh: Vec<_> = (60..64).map(TestOracle::new).collect();
        fx.set_committee(&fresh, 1);

        let payees: Vec<Pubkey> =
            fx.state.leftover_payments.as_slice().iter().map(|p| p.payee).collect();
        let mut sent = Vec::new();
        let total = process_pay_remaining(&mut fx.state, &Caller::bare(&OWNER), &registered(&payees), |to: &Pubkey, amount| {
            sent.push((*to, amount));
            Ok::<(), OcrError>(())
        })
        .unwrap();

        assert_eq!(total, 10 + 11 + 12 + 13);
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[3], ([0xA3; 32], 13));
        assert!(fx.state.leftover_payments.is_empty());
        assert_eq!(fx.state.total_owed(), 0);
    }

    #[test]
    fn test_leftover_without_payee_is_paid_to_transmitter_token_account() {
        let (mut fx, oracles) = Fixture::with_committee(4, 1);
        fx.state.oracles.xs[0].payment = 50;
        let fresh: Vec<_> = (60..64).map(TestOracle::new).collect();
        fx.set_committee(&fresh, 1);
        assert_eq!(fx.state.leftover_payments.as_slice()[0].payee, oracles[0].transmitter);

        let stranger = held_by([0x99; 32], 0xC0);
        assert_eq!(
            process_pay_remaining(&mut fx.state, &Caller::bare(&OWNER), &[stranger], no_transfer()),
            Err(OcrError::PayeeMismatch)
        );

        let mut sent = Vec::new();
        let account = held_by(oracles[0].transmitter, 0xC1);
        let total = process_pay_remaining(&mut fx.state, &Caller::bare(&OWNER), &[account], |to: &Pubkey, amount| {
            sent.push((*to, amount));
            Ok::<(), OcrError>(())
        })
        .unwrap();
        assert_eq!(total, 50);
        assert_eq!(sent, vec![([0xC1; 32], 50)]);
        assert!(fx.state.leftover_payments.is_empty());
    }

    #[test]
    fn test_pay_remaining_rejects_wrong_accounts() {
        let mut fx = Fixture::new();
        fx.state.leftover_payments.push(LeftoverPayment { payee: [1; 32], amount: 5 }).unwrap();
        fx.state.leftover_payments.push(LeftoverPayment { payee: [2; 32], amount: 6 }).unwrap();
        let caller = Caller::bare(&OWNER);

        assert_eq!(
            process_pay_remaining(&mut fx.state, &caller, &registered(&[[2; 32], [1; 32]]), no_transfer()),
            Err(OcrError::PayeeMismatch)
        );
        assert_eq!(
            process_pay_remaining(&mut fx.state, &caller, &registered(&[[1; 32]]), no_transfer()),
            Err(OcrError::PayeeMismatch)
        );
        assert_eq!(fx.state.leftover_payments.len(), 2);
    }

    #[test]
    fn test_failed_transfer_keeps_leftovers() {
        let mut fx = Fixture::new();
        fx.state.leftover_payments.push(LeftoverPayment { payee: [1; 32], amount: 5 }).unwrap();
        fx.state.leftover_payments.push(LeftoverPayment { payee: [2; 32], amount: 6 }).unwrap();

        let result = process_pay_remaining(
            &mut fx.state,
            &Caller::bare(&OWNER),
            &registered(&[[1; 32], [2; 32]]),
            |to: &Pubkey, _| if to == &[2; 32] { Err(OcrError::InsufficientFunds) } else { Ok(()) },
        );
        assert_eq!(result, Err(OcrError::InsufficientFunds));
        assert_eq!(fx.state.leftover_payments.total(), 11);
    }

    #[test]
    fn test_pay_oracles_zeroes_accruals() {
        let (mut fx, oracles) = Fixture::with_committee(4, 1);
        fx.state.oracles.xs[0].payee = [0xAA; 32];
        fx.state.oracles.xs[0].payment = 40;
        fx.state.oracles.xs[2].payment = 25;

        let accounts = [
            PayoutAccount { key: [0xAA; 32], owner: WALLET_OWNER },
            held_by(oracles[1].transmitter, 0xB1),
            held_by(oracles[2].transmitter, 0xB2),
            held_by(oracles[3].transmitter, 0xB3),
        ];
        let mut sent = Vec::new();
        let total = process_pay_oracles(&mut fx.state, &Caller::bare(&OWNER), &accounts, |to: &Pubkey, amount| {
            sent.push((*to, amount));
            Ok::<(), OcrError>(())
        })
        .unwrap();

        assert_eq!(total, 65);
        assert_eq!(sent, vec![([0xAA; 32], 40), ([0xB2; 32], 25)]);
        assert_eq!(fx.state.oracles.total_owed(), 0);
    }

    #[test]
    fn test_pay_oracles_rejects_account_of_other_wallet() {
        let (mut fx, oracles) = Fixture::with_committee(4, 1);
        fx.state.oracles.xs[1].payment = 7;
        let mut accounts: Vec<_> = oracles.iter().map(|o| held_by(o.transmitter, 0xB0)).collect();
        accounts[1] = held_by(oracles[0].transmitter, 0xB1);
        assert_eq!(
            process_pay_oracles(&mut fx.state, &Caller::bare(&OWNER), &accounts, no_transfer()),
            Err(OcrError::PayeeMismatch)
        );
        assert_eq!(fx.state.oracles.xs[1].payment, 7);
    }

    #[test]
    fn test_pay_oracles_requires_access() {
        let (mut fx, oracles) = Fixture::with_committee(4, 1);
        let accounts: Vec<_> = oracles.iter().map(|o| held_by(o.transmitter, 0xB0)).collect();
        assert_eq!(
            process_pay_oracles(&mut fx.state, &Caller::bare(&[9; 32]), &accounts, no_transfer()),
            Err(OcrError::InvalidAccount)
        );
    }
}
