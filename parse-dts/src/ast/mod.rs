pub mod class_or_object;
pub mod expr;
pub mod node;
pub mod stmt;
pub mod type_expr;
