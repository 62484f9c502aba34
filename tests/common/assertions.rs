//! Custom assertion macros and utilities
//!
//! Assertion macros with clearer failure output for store and action
//! results.

/// Assert that a result is ok and return the value
///
/// This macro unwraps a Result, providing a better error message
/// if the result is an error.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert the ids of a slice of identified items, in order
#[macro_export]
macro_rules! assert_ids {
    ($items:expr, $expected:expr) => {{
        let expected: Vec<i64> = $expected.to_vec();
        pretty_assertions::assert_eq!(
            $items.iter().map(|item| item.id).collect::<Vec<i64>>(),
            expected
        );
    }};
}
