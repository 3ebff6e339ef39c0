//! Contract ingestion from CSV text.
//!
//! Each data row is `partner_id,contract_id,type,date,action`, for example
//! `1,1001,Rabbit,2010-02-15,BEGIN`. The first line is a header and empty
//! lines are ignored. Rows are validated against the partner registry before
//! they reach the contract store.

#![deny(unsafe_code)]

pub mod loader;
pub mod row;

pub use loader::{BatchPolicy, ContractLoader, IngestConfig, IngestReport, RowRejection};
pub use row::{parse_row, DATE_FORMAT, FIELD_COUNT};
