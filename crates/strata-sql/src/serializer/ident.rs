use super::{Formatter, ToSql};

/// A quoted identifier. Embedded double quotes are doubled.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = self.0.as_ref();

        f.dst.push('"');
        f.dst.push_str(&name.replace('"', "\"\""));
        f.dst.push('"');
    }
}
