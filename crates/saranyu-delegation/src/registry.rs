//! Tenant and service registry
//!
//! Identity records live in the same key namespace as grants. They are never
//! deleted: destroying a tenant or unregistering a service clears its
//! `registered` flag so existing chains stay auditable.

use crate::records::{Record, RecordType, Service, Tenant};
use crate::transaction::LedgerTransaction;
use saranyu_core::{LedgerError, Pck, Result, StorageEffects};

/// Contact details of a tenant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantProfile {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
}

const SEED_TENANTS: [(&str, &str, &str, &str); 8] = [
    ("T1", "Tenant One", "t1@mail.com", "1111111111"),
    ("T2", "Tenant Two", "t2@mail.com", "2222222222"),
    ("T3", "Tenant Three", "t3@mail.com", "3333333333"),
    ("T4", "Tenant Four", "t4@mail.com", "4444444444"),
    ("T5", "Tenant Five", "t5@mail.com", "5555555555"),
    ("T6", "Tenant Six", "t6@mail.com", "6666666666"),
    ("T7", "Tenant Seven", "t7@mail.com", "7777777777"),
    ("T8", "Tenant Eight", "t8@mail.com", "8888888888"),
];

const SEED_SERVICES: [(&str, &str); 3] = [
    ("S1", "Service One"),
    ("S2", "Service Two"),
    ("S3", "Service Three"),
];

fn type_mismatch(pck: &Pck, found: RecordType, expected: RecordType) -> LedgerError {
    LedgerError::invalid_argument(format!(
        "{pck} holds a {found} record, expected {expected}"
    ))
}

/// Tenant stored under `pck`
pub async fn resolve_tenant<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    pck: &Pck,
) -> Result<Tenant> {
    match tx.get(pck).await? {
        Some(Record::Tenant(tenant)) => Ok(tenant),
        Some(other) => Err(type_mismatch(pck, other.record_type(), RecordType::Tenant)),
        None => Err(LedgerError::not_found(format!("{pck} does not exist"))),
    }
}

/// Service stored under `pck`
pub async fn resolve_service<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    pck: &Pck,
) -> Result<Service> {
    match tx.get(pck).await? {
        Some(Record::Service(service)) => Ok(service),
        Some(other) => Err(type_mismatch(pck, other.record_type(), RecordType::Service)),
        None => Err(LedgerError::not_found(format!("{pck} does not exist"))),
    }
}

/// Any record stored under `pck`
pub async fn read_record<S: StorageEffects + ?Sized>(
    tx: &LedgerTransaction<'_, S>,
    pck: &Pck,
) -> Result<Record> {
    tx.get(pck)
        .await?
        .ok_or_else(|| LedgerError::not_found(format!("{pck} does not exist")))
}

/// Stage a newly registered tenant
pub async fn enroll_tenant<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    pck: Pck,
    profile: TenantProfile,
) -> Result<Tenant> {
    tx.ensure_vacant(&pck).await?;
    let tenant = Tenant {
        pck,
        name: profile.name,
        email: profile.email,
        phone: profile.phone,
        registered: true,
    };
    tx.put(Record::Tenant(tenant.clone()));
    Ok(tenant)
}

/// Replace the contact details of an existing tenant
pub async fn update_tenant<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    pck: &Pck,
    profile: TenantProfile,
) -> Result<Tenant> {
    let mut tenant = resolve_tenant(tx, pck).await?;
    tenant.name = profile.name;
    tenant.email = profile.email;
    tenant.phone = profile.phone;
    tx.put(Record::Tenant(tenant.clone()));
    Ok(tenant)
}

/// Clear the registered flag of a tenant
pub async fn destroy_tenant<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    pck: &Pck,
) -> Result<Tenant> {
    let mut tenant = resolve_tenant(tx, pck).await?;
    tenant.registered = false;
    tx.put(Record::Tenant(tenant.clone()));
    Ok(tenant)
}

/// Stage a newly registered service
pub async fn register_service<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    pck: Pck,
    name: String,
) -> Result<Service> {
    tx.ensure_vacant(&pck).await?;
    let service = Service {
        pck,
        name,
        registered: true,
    };
    tx.put(Record::Service(service.clone()));
    Ok(service)
}

/// Clear the registered flag of a service
pub async fn unregister_service<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
    pck: &Pck,
) -> Result<Service> {
    let mut service = resolve_service(tx, pck).await?;
    service.registered = false;
    tx.put(Record::Service(service.clone()));
    Ok(service)
}

/// Stage the bootstrap tenants `T1`..`T8` and services `S1`..`S3`.
///
/// Only vacant keys are written. A key that already holds any record, be it
/// a grant or an identity the operator has since updated or destroyed, is
/// left as it is. Returns how many identities were staged.
pub async fn seed_identities<S: StorageEffects + ?Sized>(
    tx: &mut LedgerTransaction<'_, S>,
) -> Result<usize> {
    let mut seeds = Vec::with_capacity(SEED_TENANTS.len() + SEED_SERVICES.len());
    for (pck, name, email, phone) in SEED_TENANTS {
        seeds.push(Record::Tenant(Tenant {
            pck: Pck::new(pck)?,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            registered: true,
        }));
    }
    for (pck, name) in SEED_SERVICES {
        seeds.push(Record::Service(Service {
            pck: Pck::new(pck)?,
            name: name.to_string(),
            registered: true,
        }));
    }

    let mut seeded = 0;
    for seed in seeds {
        match tx.get(seed.pck()).await? {
            None => {
                tx.put(seed);
                seeded += 1;
            }
            Some(existing) if existing.record_type() == seed.record_type() => {
                tracing::debug!(pck = %seed.pck(), "seed identity already present");
            }
            Some(existing) => {
                tracing::warn!(
                    pck = %seed.pck(),
                    found = %existing.record_type(),
                    "seed key is occupied by another record, skipping"
                );
            }
        }
    }
    Ok(seeded)
}
