//! Typed wrappers over [`Record`].

use crate::{Db, Record, Result};

use strata_core::Error;

/// A newtype over a [`Record`] of one class, usually generated by
/// [`model!`](crate::model!).
pub trait Model: Sized {
    /// Name of the class the model wraps. Records of its subclasses are
    /// accepted too.
    const CLASS: &'static str;

    fn from_record(record: Record) -> Result<Self>;

    fn as_record(&self) -> &Record;

    fn as_record_mut(&mut self) -> &mut Record;

    fn into_record(self) -> Record;

    fn id(&self) -> Option<u64> {
        self.as_record().id()
    }

    fn write(&mut self, db: &mut Db) -> Result<u64> {
        self.as_record_mut().write(db)
    }

    fn delete(&mut self, db: &mut Db) -> Result<()> {
        self.as_record_mut().delete(db)
    }
}

#[doc(hidden)]
pub fn check_class(record: &Record, class: &str) -> Result<()> {
    if record.is_a(class) {
        Ok(())
    } else {
        Err(Error::invalid_statement(format!(
            "a `{}` record is not a `{class}`",
            record.class_name()
        )))
    }
}

/// Declares a [`Model`] with a typed getter and setter per field.
///
/// ```
/// strata::model! {
///     pub struct Article: "Article" {
///         title / set_title: String => "Title",
///         rating / set_rating: i64 => "Rating",
///     }
/// }
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $class:literal {
            $( $getter:ident / $setter:ident : $ty:ty => $field:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name($crate::Record);

        impl $crate::Model for $name {
            const CLASS: &'static str = $class;

            fn from_record(record: $crate::Record) -> $crate::Result<Self> {
                $crate::model::check_class(&record, $class)?;
                Ok($name(record))
            }

            fn as_record(&self) -> &$crate::Record {
                &self.0
            }

            fn as_record_mut(&mut self) -> &mut $crate::Record {
                &mut self.0
            }

            fn into_record(self) -> $crate::Record {
                self.0
            }
        }

        impl $name {
            $(
                pub fn $getter(&self) -> $crate::Result<$ty> {
                    self.0.get::<$ty>($field)
                }

                pub fn $setter(&mut self, value: impl Into<$ty>) -> $crate::Result<()> {
                    self.0.set_field($field, $crate::Value::from(value.into()))
                }
            )*
        }
    };
}
