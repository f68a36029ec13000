use anchor_lang::error::Error;
use anchor_lang::Result;

use crate::error::AllocationError;

pub fn assert_error<T>(result: Result<T>, expected: AllocationError) {
    let name = expected.to_string();
    let code = u32::from(expected);
    match result {
        Err(Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, code, "expected {name}, got {}", err.error_name)
        }
        Err(other) => panic!("expected {name}, got {other:?}"),
        Ok(_) => panic!("expected {name}, got Ok"),
    }
}
