mod column_def;
pub use column_def::ColumnDef;

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod expr;
pub use expr::Expr;

mod expr_binary_op;
pub use expr_binary_op::{BinaryOp, ExprBinaryOp};

mod expr_case;
pub use expr_case::ExprCase;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_func;
pub use expr_func::{ExprFunc, Func};

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod insert;
pub use insert::Insert;

mod manipulation;
pub use manipulation::{Command, Manipulation, TableOp};

mod query;
pub use query::{Connective, Direction, Join, JoinKind, Limit, OrderBy, SelectItem, SqlQuery, TableRef};

mod statement;
pub use statement::Statement;

mod update;
pub use update::{Assignment, Update};

mod visit_mut;

pub use strata_core::stmt::{Row, Value};
