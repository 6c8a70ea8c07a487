/// Admission checks for transactions, separated from type definitions
use crate::blockchain::LedgerContext;
use crate::crypto::KeyManager;
use crate::error::ValidationFailure;
use crate::transaction::types::{
    AddressArity, AmountRequirement, Amount, Operation, SigningScheme, Transaction,
    TransactionType,
};
use tracing::{debug, error, warn};

/// Runs the admission gates in order: sender lookup, signature presence,
/// replay, signature verification, type resolution, argument shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    scheme: SigningScheme,
}

impl Validator {
    pub fn new(scheme: SigningScheme) -> Self {
        Validator { scheme }
    }

    /// Returns the resolved operation of an admissible transaction.
    pub fn validate<L, K>(
        &self,
        tx: &Transaction,
        ledger: &L,
        key_manager: &K,
    ) -> Result<TransactionType, ValidationFailure>
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        let result = self.run_gates(tx, ledger, key_manager);
        match &result {
            Ok(tx_type) => debug!("Transaction {} passed validation as {}", tx.id, tx_type),
            Err(reason) => warn!("Rejected transaction {}: {}", tx.id, reason),
        }
        result
    }

    pub fn is_valid<L, K>(&self, tx: &Transaction, ledger: &L, key_manager: &K) -> bool
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        self.validate(tx, ledger, key_manager).is_ok()
    }

    /// Validates, then records the signature. Of several transactions carrying
    /// the same signature only one is ever admitted.
    pub fn admit<L, K>(
        &self,
        tx: &Transaction,
        ledger: &L,
        key_manager: &K,
    ) -> Result<TransactionType, ValidationFailure>
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        let tx_type = self.validate(tx, ledger, key_manager)?;
        let signature = tx.signature_base64().ok_or(ValidationFailure::Unsigned)?;
        if !ledger.mark_seen(&signature) {
            warn!("Transaction {} lost an admission race on its signature", tx.id);
            return Err(ValidationFailure::Replayed);
        }
        debug!("Admitted transaction {} ({})", tx.id, tx_type);
        Ok(tx_type)
    }

    fn run_gates<L, K>(
        &self,
        tx: &Transaction,
        ledger: &L,
        key_manager: &K,
    ) -> Result<TransactionType, ValidationFailure>
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        let key = ledger
            .resolve_client(&tx.sender)
            .ok_or(ValidationFailure::UnknownSender(tx.sender))?;

        let signature = tx.signature.as_deref().ok_or(ValidationFailure::Unsigned)?;

        let signature_b64 = tx.signature_base64().ok_or(ValidationFailure::Unsigned)?;
        if ledger.is_replayed(&signature_b64) {
            return Err(ValidationFailure::Replayed);
        }

        let payload = tx.signing_payload_with(self.scheme).map_err(|e| {
            ValidationFailure::Unauthenticated(format!("signing payload unavailable: {}", e))
        })?;
        match key_manager.verify(&payload, signature, &key) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ValidationFailure::Unauthenticated(
                    "signature does not match sender key".to_string(),
                ))
            }
            Err(e) => {
                error!(
                    "Failed to verify signature for transaction {} from {}: {}",
                    tx.id, tx.sender, e
                );
                return Err(ValidationFailure::Unauthenticated(e.to_string()));
            }
        }

        let tx_type = match &tx.operation {
            Operation::Native(tx_type) => *tx_type,
            Operation::ContractCall(signature) => ledger
                .resolve_type(signature)
                .ok_or_else(|| ValidationFailure::UnknownOperation(signature.clone()))?,
        };

        check_arguments(tx, tx_type)?;
        Ok(tx_type)
    }
}

/// Checks that the transaction's addresses and amount fit `tx_type`.
pub fn check_arguments(
    tx: &Transaction,
    tx_type: TransactionType,
) -> Result<(), ValidationFailure> {
    let shape = tx_type.shape();
    let malformed = |reason: &str| ValidationFailure::MalformedArguments {
        tx_type,
        reason: reason.to_string(),
    };

    let addresses_ok = match shape.addresses {
        AddressArity::NoAddress => tx.has_no_address(),
        AddressArity::Receiver => tx.has_one_address(),
        AddressArity::OwnerAndReceiver => tx.has_two_addresses(),
    };
    if !addresses_ok {
        return Err(malformed(match shape.addresses {
            AddressArity::NoAddress => "expected no owner or receiver address",
            AddressArity::Receiver => "expected a receiver address and no owner address",
            AddressArity::OwnerAndReceiver => "expected both owner and receiver addresses",
        }));
    }

    match (shape.amount, &tx.amount) {
        (AmountRequirement::Absent, None)
        | (AmountRequirement::Token, Some(Amount::Token(_)))
        | (AmountRequirement::Native, Some(Amount::Native(_))) => Ok(()),
        (AmountRequirement::Absent, Some(_)) => Err(malformed("unexpected amount")),
        (AmountRequirement::Token, _) => Err(malformed("expected a token amount")),
        (AmountRequirement::Native, _) => Err(malformed("expected a native amount")),
    }
}

impl Transaction {
    /// Validates with the default signing scheme.
    pub fn validate<L, K>(
        &self,
        ledger: &L,
        key_manager: &K,
    ) -> Result<TransactionType, ValidationFailure>
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        Validator::default().validate(self, ledger, key_manager)
    }

    /// Verify if transaction is correctly signed, is not repeated and is correctly formed.
    pub fn is_valid<L, K>(&self, ledger: &L, key_manager: &K) -> bool
    where
        L: LedgerContext + ?Sized,
        K: KeyManager + ?Sized,
    {
        self.validate(ledger, key_manager).is_ok()
    }
}
