use std::collections::HashMap;
use std::sync::Arc;

use plexus_common::{Address, Word};
use plexus_resolver::{Attestation, Resolver, ResolverCall, ResolverHandle};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::{
    AttestationRequest, AttestationRequestData, LedgerError, LedgerSettings,
    MultiAttestationRequest, MultiRevocationRequest, RevocationRequest, SchemaRecord,
    SchemaRegistry,
};

/// In-memory attestation ledger.
///
/// Every operation is checked against the ledger's own rules first and then
/// submitted to the schema's resolver. Nothing is written until every
/// request of the operation has been accepted, so a failing batch leaves
/// the ledger untouched.
#[derive(Debug)]
pub struct Ledger {
    settings: LedgerSettings,
    schemas: SchemaRegistry,
    attestations: HashMap<Word, Attestation>,
    time: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// An empty ledger with default settings, clocked at the current system time.
    pub fn new() -> Self {
        Self::with_settings(LedgerSettings::default())
    }

    /// An empty ledger with the given settings.
    pub fn with_settings(settings: LedgerSettings) -> Self {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());

        Self {
            settings,
            schemas: SchemaRegistry::new(),
            attestations: HashMap::new(),
            time,
        }
    }

    /// The settings this was created with.
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Current ledger time, in seconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Moves the ledger clock, in seconds.
    pub fn set_time(&mut self, time: u64) {
        self.time = time;
    }

    /// The schema registry.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Registers a schema and returns its uid. See [`SchemaRegistry::register`].
    pub fn register_schema(
        &mut self,
        schema: &str,
        resolver: Option<ResolverHandle>,
        revocable: bool,
    ) -> Result<Word, LedgerError> {
        self.schemas.register(schema, resolver, revocable)
    }

    /// The stored attestation, revoked or not.
    pub fn attestation(&self, uid: &Word) -> Option<&Attestation> {
        self.attestations.get(uid)
    }

    /// Number of committed attestations, revoked ones included.
    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    /// Whether there is nothing in it.
    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }

    /// Whether an attestation with this uid was ever committed.
    pub fn is_attestation_valid(&self, uid: &Word) -> bool {
        self.attestations.contains_key(uid)
    }

    /// Attests a single request and returns the new uid.
    pub fn attest(
        &mut self,
        attester: Address,
        request: AttestationRequest,
    ) -> Result<Word, LedgerError> {
        let schema = request.schema;
        self.multi_attest(attester, &[MultiAttestationRequest::from(request)])?
            .pop()
            .ok_or(LedgerError::InvalidSchema { schema })
    }

    /// Attests every request of every group, or none of them.
    pub fn multi_attest(
        &mut self,
        attester: Address,
        requests: &[MultiAttestationRequest],
    ) -> Result<Vec<Word>, LedgerError> {
        let mut staged: Vec<Attestation> = Vec::new();

        for request in requests {
            let record = self.schema(&request.schema)?;
            for data in &request.data {
                let attestation = self.prepare(attester, record, data, &staged)?;
                self.resolve_attestation(record, &attestation, data.value)?;
                staged.push(attestation);
            }
        }

        let uids: Vec<Word> = staged.iter().map(|attestation| attestation.uid).collect();
        for attestation in staged {
            tracing::debug!(uid = %attestation.uid, schema = %attestation.schema, "attested");
            self.attestations.insert(attestation.uid, attestation);
        }
        Ok(uids)
    }

    /// Revokes a single attestation.
    pub fn revoke(
        &mut self,
        revoker: Address,
        request: RevocationRequest,
    ) -> Result<(), LedgerError> {
        self.multi_revoke(revoker, &[MultiRevocationRequest::from(request)])
    }

    /// Revokes every request of every group, or none of them.
    ///
    /// Resolvers are handed the stored attestation, with its original
    /// payload and the revocation time set.
    pub fn multi_revoke(
        &mut self,
        revoker: Address,
        requests: &[MultiRevocationRequest],
    ) -> Result<(), LedgerError> {
        let mut staged: Vec<Attestation> = Vec::new();

        for request in requests {
            let record = self.schema(&request.schema)?;
            for data in &request.data {
                let uid = data.uid;
                let stored = self
                    .attestations
                    .get(&uid)
                    .ok_or(LedgerError::NotFound { uid })?;

                if stored.schema != request.schema {
                    return Err(LedgerError::InvalidSchema {
                        schema: request.schema,
                    });
                }
                if stored.attester != revoker {
                    return Err(LedgerError::AccessDenied { uid, revoker });
                }
                if !stored.revocable {
                    return Err(LedgerError::Irrevocable);
                }
                if stored.revocation_time != 0
                    || staged.iter().any(|revoked| revoked.uid == uid)
                {
                    return Err(LedgerError::AlreadyRevoked { uid });
                }

                let revoked = Attestation {
                    revocation_time: self.time,
                    ..stored.clone()
                };
                self.resolve_revocation(record, &revoked, data.value)?;
                staged.push(revoked);
            }
        }

        for revoked in staged {
            tracing::debug!(uid = %revoked.uid, schema = %revoked.schema, "revoked");
            self.attestations.insert(revoked.uid, revoked);
        }
        Ok(())
    }

    fn schema(&self, uid: &Word) -> Result<&SchemaRecord, LedgerError> {
        self.schemas
            .schema(uid)
            .ok_or(LedgerError::InvalidSchema { schema: *uid })
    }

    fn prepare(
        &self,
        attester: Address,
        record: &SchemaRecord,
        data: &AttestationRequestData,
        staged: &[Attestation],
    ) -> Result<Attestation, LedgerError> {
        if data.expiration_time != 0 && data.expiration_time <= self.time {
            return Err(LedgerError::InvalidExpirationTime {
                expiration_time: data.expiration_time,
                now: self.time,
            });
        }
        if !record.revocable && data.revocable {
            return Err(LedgerError::Irrevocable);
        }

        let exists = |uid: &Word| {
            self.attestations.contains_key(uid) || staged.iter().any(|staged| staged.uid == *uid)
        };
        if !data.ref_uid.is_zero() && !exists(&data.ref_uid) {
            return Err(LedgerError::NotFound { uid: data.ref_uid });
        }

        let mut attestation = Attestation {
            uid: Word::ZERO,
            schema: record.uid,
            time: self.time,
            expiration_time: data.expiration_time,
            revocation_time: 0,
            ref_uid: data.ref_uid,
            recipient: data.recipient,
            attester,
            revocable: data.revocable,
            data: data.data.clone(),
        };

        let mut bump: u32 = 0;
        attestation.uid = loop {
            let uid = attestation_uid(&attestation, bump);
            if !exists(&uid) {
                break uid;
            }
            bump += 1;
        };
        Ok(attestation)
    }

    fn resolve_attestation(
        &self,
        record: &SchemaRecord,
        attestation: &Attestation,
        value: u128,
    ) -> Result<(), LedgerError> {
        let Some(resolver) = self.resolver(record, value)? else {
            return Ok(());
        };

        let call =
            ResolverCall::new(attestation, value).with_depth_limit(self.settings.max_call_depth);
        if !resolver.on_attest(&call)? {
            tracing::warn!(
                uid = %attestation.uid,
                resolver = %resolver.address(),
                "attestation refused"
            );
            return Err(LedgerError::InvalidAttestation {
                uid: attestation.uid,
            });
        }
        Ok(())
    }

    fn resolve_revocation(
        &self,
        record: &SchemaRecord,
        attestation: &Attestation,
        value: u128,
    ) -> Result<(), LedgerError> {
        let Some(resolver) = self.resolver(record, value)? else {
            return Ok(());
        };

        let call =
            ResolverCall::new(attestation, value).with_depth_limit(self.settings.max_call_depth);
        if !resolver.on_revoke(&call)? {
            tracing::warn!(
                uid = %attestation.uid,
                resolver = %resolver.address(),
                "revocation refused"
            );
            return Err(LedgerError::InvalidRevocation {
                uid: attestation.uid,
            });
        }
        Ok(())
    }

    fn resolver(
        &self,
        record: &SchemaRecord,
        value: u128,
    ) -> Result<Option<Arc<dyn Resolver>>, LedgerError> {
        match &record.resolver {
            None if value != 0 => Err(LedgerError::NotPayable { value }),
            None => Ok(None),
            Some(handle) => {
                let resolver = handle.upgrade()?;
                resolver.accept_value(value)?;
                Ok(Some(resolver))
            }
        }
    }
}

fn attestation_uid(attestation: &Attestation, bump: u32) -> Word {
    Word::hash_iter([
        attestation.schema.bytes().as_slice(),
        attestation.recipient.bytes().as_slice(),
        attestation.attester.bytes().as_slice(),
        &attestation.time.to_be_bytes(),
        &attestation.expiration_time.to_be_bytes(),
        &[attestation.revocable as u8],
        attestation.ref_uid.bytes().as_slice(),
        attestation.data.as_slice(),
        &bump.to_be_bytes(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn friends(ledger: &mut Ledger) -> TestResult<Word> {
        Ok(ledger.register_schema("bool isFriend", None, true)?)
    }

    fn request(schema: Word) -> AttestationRequest {
        AttestationRequest {
            schema,
            data: AttestationRequestData {
                recipient: Address::derive(&[b"recipient"]),
                revocable: true,
                data: [1u8; 32].into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn identical_requests_get_distinct_uids() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = friends(&mut ledger)?;
        let attester = Address::derive(&[b"attester"]);

        let first = ledger.attest(attester, request(schema))?;
        let second = ledger.attest(attester, request(schema))?;

        assert_ne!(first, second);
        assert!(ledger.is_attestation_valid(&first));
        assert!(ledger.is_attestation_valid(&second));
        Ok(())
    }

    #[test]
    fn it_records_the_attestation() -> TestResult {
        let mut ledger = Ledger::new();
        ledger.set_time(1_000);
        let schema = friends(&mut ledger)?;
        let attester = Address::derive(&[b"attester"]);

        let uid = ledger.attest(attester, request(schema))?;
        let stored = ledger.attestation(&uid).ok_or("attestation missing")?;

        assert_eq!(stored.attester, attester);
        assert_eq!(stored.schema, schema);
        assert_eq!(stored.time, 1_000);
        assert_eq!(stored.revocation_time, 0);
        assert_eq!(stored.data.as_slice(), &[1u8; 32]);
        Ok(())
    }

    #[test]
    fn it_rejects_unknown_schemas() {
        let mut ledger = Ledger::new();
        let schema = Word::hash(b"unknown");
        assert_eq!(
            ledger.attest(Address::ZERO, request(schema)),
            Err(LedgerError::InvalidSchema { schema })
        );
    }

    #[test]
    fn it_rejects_past_expiration_times() -> TestResult {
        let mut ledger = Ledger::new();
        ledger.set_time(1_000);
        let schema = friends(&mut ledger)?;

        let mut expired = request(schema);
        expired.data.expiration_time = 1_000;

        assert_eq!(
            ledger.attest(Address::ZERO, expired),
            Err(LedgerError::InvalidExpirationTime {
                expiration_time: 1_000,
                now: 1_000
            })
        );
        Ok(())
    }

    #[test]
    fn it_rejects_revocable_attestations_on_irrevocable_schemas() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = ledger.register_schema("bool isFriend", None, false)?;

        assert_eq!(
            ledger.attest(Address::ZERO, request(schema)),
            Err(LedgerError::Irrevocable)
        );
        Ok(())
    }

    #[test]
    fn it_requires_referenced_attestations_to_exist() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = friends(&mut ledger)?;
        let missing = Word::hash(b"missing");

        let mut dangling = request(schema);
        dangling.data.ref_uid = missing;
        assert_eq!(
            ledger.attest(Address::ZERO, dangling),
            Err(LedgerError::NotFound { uid: missing })
        );

        let target = ledger.attest(Address::ZERO, request(schema))?;
        let mut referring = request(schema);
        referring.data.ref_uid = target;
        ledger.attest(Address::ZERO, referring)?;
        Ok(())
    }

    #[test]
    fn value_needs_a_resolver() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = friends(&mut ledger)?;

        let mut paid = request(schema);
        paid.data.value = 10;
        assert_eq!(
            ledger.attest(Address::ZERO, paid),
            Err(LedgerError::NotPayable { value: 10 })
        );
        Ok(())
    }

    #[test]
    fn only_the_attester_revokes_and_only_once() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = friends(&mut ledger)?;
        let attester = Address::derive(&[b"attester"]);
        let mallory = Address::derive(&[b"mallory"]);
        let uid = ledger.attest(attester, request(schema))?;

        let revocation = RevocationRequest {
            schema,
            data: crate::RevocationRequestData { uid, value: 0 },
        };

        assert_eq!(
            ledger.revoke(mallory, revocation.clone()),
            Err(LedgerError::AccessDenied {
                uid,
                revoker: mallory
            })
        );

        ledger.set_time(2_000);
        ledger.revoke(attester, revocation.clone())?;
        assert_eq!(
            ledger.attestation(&uid).map(|stored| stored.revocation_time),
            Some(2_000)
        );

        assert_eq!(
            ledger.revoke(attester, revocation),
            Err(LedgerError::AlreadyRevoked { uid })
        );
        Ok(())
    }

    #[test]
    fn irrevocable_attestations_stay() -> TestResult {
        let mut ledger = Ledger::new();
        let schema = friends(&mut ledger)?;
        let mut permanent = request(schema);
        permanent.data.revocable = false;
        let uid = ledger.attest(Address::ZERO, permanent)?;

        assert_eq!(
            ledger.revoke(
                Address::ZERO,
                RevocationRequest {
                    schema,
                    data: crate::RevocationRequestData { uid, value: 0 },
                }
            ),
            Err(LedgerError::Irrevocable)
        );
        Ok(())
    }
}
