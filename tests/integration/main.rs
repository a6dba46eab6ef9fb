//! Integration tests
//!
//! `router` runs without a database. `loan_engine` needs PostgreSQL through
//! `DATABASE_URL` and `api_tests` a running server; both are ignored by
//! default. Run with: cargo test -- --ignored

mod api_tests;
mod router;
