//! Payment ledger core: record intake, normalization, and landlord-scoped
//! search, plus the CSV seed loader that hydrates the lookup directory.

pub mod payments;
pub mod seed;
