#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod http;

pub(crate) use fixtures::{TEST_PASSWORD, create_test_user, get_test_connection, get_test_state};
pub(crate) use http::{bearer_header, parse_json_body};
