//! Integration tests. These run against a live Postgres instance; set
//! `DATABASE_URL` and run with `cargo test -- --ignored`.

mod helpers;

mod access_test;
mod auth_test;
mod notification_test;
mod progress_test;
mod request_flow_test;
