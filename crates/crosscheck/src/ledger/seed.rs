//! CSV seed loading for the lookup directory.
//!
//! The service binary runs without a database, so landlords, tenants,
//! payment types, and leases are hydrated from a directory of CSV files:
//! `landlords.csv`, `tenants.csv`, `payment_types.csv`, and `leases.csv`.
//! A missing file is treated as an empty collection so a seed bundle only
//! needs the record kinds it actually uses.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::payments::domain::{
    Landlord, LandlordId, Lease, PaymentType, PaymentTypeId, PropertyId, Tenant, TenantId, UserId,
};

/// Directory records parsed out of a seed bundle.
#[derive(Debug, Clone, Default)]
pub struct DirectorySeed {
    pub landlords: Vec<Landlord>,
    pub tenants: Vec<Tenant>,
    pub payment_types: Vec<PaymentType>,
    pub leases: Vec<Lease>,
}

impl DirectorySeed {
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SeedError> {
        let dir = dir.as_ref();
        Ok(Self {
            landlords: load_file(dir.join("landlords.csv"), landlords_from_reader)?,
            tenants: load_file(dir.join("tenants.csv"), tenants_from_reader)?,
            payment_types: load_file(dir.join("payment_types.csv"), payment_types_from_reader)?,
            leases: load_file(dir.join("leases.csv"), leases_from_reader)?,
        })
    }
}

pub fn landlords_from_reader<R: Read>(reader: R) -> Result<Vec<Landlord>, csv::Error> {
    let rows: Vec<LandlordRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| Landlord {
            id: LandlordId(row.id),
            user: UserId(row.user),
        })
        .collect())
}

pub fn tenants_from_reader<R: Read>(reader: R) -> Result<Vec<Tenant>, csv::Error> {
    let rows: Vec<TenantRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| Tenant {
            id: TenantId(row.id),
            phone_number: row.phone_number,
            email: row.email,
            full_name: row.full_name,
            landlord: LandlordId(row.landlord),
        })
        .collect())
}

pub fn payment_types_from_reader<R: Read>(reader: R) -> Result<Vec<PaymentType>, csv::Error> {
    let rows: Vec<PaymentTypeRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| PaymentType {
            id: PaymentTypeId(row.id),
            label: row.label,
        })
        .collect())
}

pub fn leases_from_reader<R: Read>(reader: R) -> Result<Vec<Lease>, csv::Error> {
    let rows: Vec<LeaseRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|row| Lease {
            tenant: TenantId(row.tenant),
            property: PropertyId(row.property),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct LandlordRow {
    id: i64,
    user: i64,
}

#[derive(Debug, Deserialize)]
struct TenantRow {
    id: i64,
    full_name: String,
    email: String,
    phone_number: String,
    landlord: i64,
}

#[derive(Debug, Deserialize)]
struct PaymentTypeRow {
    id: i64,
    label: String,
}

#[derive(Debug, Deserialize)]
struct LeaseRow {
    tenant: i64,
    property: i64,
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize().collect()
}

fn load_file<T>(
    path: PathBuf,
    parse: fn(File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, SeedError> {
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(SeedError::Open { path, source }),
    };

    parse(file).map_err(|source| SeedError::Parse { path, source })
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("unable to open seed file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rows in seed file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
