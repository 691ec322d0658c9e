use crate::query::{
    Column, CompareOp, ComparePredicate, Join, Operand, OrderDirection, OrderTerm, Predicate,
};
use std::fmt::Write;

/// Bracket an identifier, doubling any closing bracket inside it.
#[must_use]
pub fn bracket(identifier: &str) -> String {
    format!("[{}]", identifier.replace(']', "]]"))
}

pub(crate) fn column(column: &Column) -> String {
    match &column.table {
        Some(table) => format!("{}.{}", bracket(table), bracket(&column.name)),
        None => bracket(&column.name),
    }
}

pub(crate) fn predicate(pred: &Predicate) -> String {
    match pred {
        Predicate::True => "1 = 1".to_string(),
        Predicate::False => "1 = 0".to_string(),
        Predicate::And(children) => junction(children, " AND ", Predicate::True),
        Predicate::Or(children) => junction(children, " OR ", Predicate::False),
        Predicate::Not(inner) => format!("NOT ({})", predicate(inner)),
        Predicate::Compare(cmp) => compare(cmp),
        Predicate::Exists(sub) => format!(
            "EXISTS (SELECT 1 FROM {} WHERE {})",
            bracket(&sub.table),
            predicate(&sub.predicate)
        ),
        Predicate::NotNull(col) => format!("{} IS NOT NULL", column(col)),
    }
}

pub(crate) fn join(join: &Join) -> String {
    format!(
        "INNER JOIN {} ON {}",
        bracket(&join.table),
        predicate(&join.on)
    )
}

pub(crate) fn order(terms: &[OrderTerm]) -> String {
    let mut out = String::from("ORDER BY ");
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let direction = match term.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        let _ = write!(out, "{} {direction}", column(&term.column));
    }

    out
}

// Empty junctions render as their identity element.
fn junction(children: &[Predicate], separator: &str, identity: Predicate) -> String {
    match children {
        [] => predicate(&identity),
        [only] => predicate(only),
        _ => {
            let parts: Vec<String> = children.iter().map(predicate).collect();
            format!("({})", parts.join(separator))
        }
    }
}

fn compare(cmp: &ComparePredicate) -> String {
    let lhs = column(&cmp.column);

    match (&cmp.operand, cmp.op) {
        (Operand::List(values), CompareOp::In) if values.is_empty() => "1 = 0".to_string(),
        (Operand::List(values), CompareOp::NotIn) if values.is_empty() => "1 = 1".to_string(),
        (Operand::List(values), op) => {
            let items: Vec<String> = values.iter().map(|v| v.to_sql_literal()).collect();
            format!("{lhs} {} ({})", op_token(op), items.join(", "))
        }
        (Operand::Value(value), op) => {
            format!("{lhs} {} {}", op_token(op), value.to_sql_literal())
        }
        (Operand::Column(rhs), op) => format!("{lhs} {} {}", op_token(op), column(rhs)),
        (Operand::Select(sub), op) => format!(
            "{lhs} {} (SELECT {} FROM {} WHERE {})",
            op_token(op),
            column(&sub.column),
            bracket(&sub.table),
            predicate(&sub.predicate)
        ),
    }
}

const fn op_token(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::Ne => "<>",
        CompareOp::In => "IN",
        CompareOp::NotIn => "NOT IN",
    }
}
