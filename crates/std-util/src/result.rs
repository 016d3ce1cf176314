/// Unwraps an `Err`, panicking with the `Ok` value otherwise.
///
/// With a second argument naming a predicate method, also asserts that the
/// error satisfies it: `assert_err!(db.get_by_id("Page", 9), is_record_not_found)`.
#[macro_export]
macro_rules! assert_err {
    ($e:expr) => {
        match $e {
            Err(e) => e,
            Ok(actual) => panic!("expected `Err`; actual=Ok({:?})", actual),
        }
    };
    ($e:expr, $is:ident) => {{
        let err = $crate::assert_err!($e);
        if !err.$is() {
            panic!("expected error satisfying `{}`; actual={}", stringify!($is), err);
        }
        err
    }};
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => panic!("expected `Ok`; actual=Err({})", err),
        }
    };
}
