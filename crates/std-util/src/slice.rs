#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let value = &$e;
        if !value.is_empty() {
            panic!("expected empty; actual={:?}", value);
        }
    }};
}

/// Asserts that no two items of the collection compare equal.
#[macro_export]
macro_rules! assert_unique {
    ($e:expr) => {{
        let items = $e.into_iter().collect::<Vec<_>>();
        for (i, item) in items.iter().enumerate() {
            if items[i + 1..].contains(item) {
                panic!("duplicate item; item={:?}; all={:?}", item, items);
            }
        }
    }};
}
