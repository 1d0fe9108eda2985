//! Scheduled batch synchronization of ERP data into a reporting warehouse.
//!
//! One run fetches reference entities (customers, parts, machines) and transactional
//! entities (sales orders, job orders) from the ERP REST API, reshapes them onto the
//! warehouse schema, and loads them with either a full refresh or an incremental
//! delete-then-insert merge keyed on primary-key sets. Runs are sequential and
//! stateless between invocations; every load is transactional.

pub mod client;
pub mod entity;
pub mod error;
pub mod failpoints;
pub mod mapper;
pub mod run;
pub mod types;
pub mod warehouse;
