//! Skill unlock conditions.
//!
//! A condition string is an `@`-separated list of alternatives, each of them a
//! `&`-separated list of `<key><op><value>` atoms, e.g.
//! `running_style==1&distance_type==2@ground_type==1`.

use crate::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl CompareOp {
    /// Two-character tokens come first so `>=` is never read as `>`.
    const TOKENS: [(&'static str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    pub fn token(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Or(Vec<Condition>),
    And(Vec<Condition>),
    Atom {
        key: String,
        op: CompareOp,
        value: String,
    },
}

impl Condition {
    pub fn empty() -> Self {
        Condition::Or(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Condition::Or(children) if children.is_empty())
    }
}

pub fn parse_condition(input: &str) -> EvalResult<Condition> {
    if input.trim().is_empty() {
        return Ok(Condition::empty());
    }
    let mut alternatives = Vec::new();
    for alternative in input.split('@') {
        let mut atoms = Vec::new();
        for atom in alternative.split('&') {
            atoms.push(parse_atom(atom, input)?);
        }
        alternatives.push(collapse(atoms, Condition::And));
    }
    Ok(collapse(alternatives, Condition::Or))
}

fn collapse(mut nodes: Vec<Condition>, wrap: fn(Vec<Condition>) -> Condition) -> Condition {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        wrap(nodes)
    }
}

fn parse_atom(atom: &str, full: &str) -> EvalResult<Condition> {
    let (pos, op) = find_operator(atom).ok_or_else(|| EvalError::Parse {
        atom: atom.to_string(),
        condition: full.to_string(),
    })?;
    let key = atom[..pos].trim().to_string();
    let value = atom[pos + op.token().len()..].trim().to_string();
    Ok(Condition::Atom { key, op, value })
}

fn find_operator(atom: &str) -> Option<(usize, CompareOp)> {
    for (pos, _) in atom.char_indices() {
        let rest = &atom[pos..];
        if let Some((_, op)) = CompareOp::TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token))
        {
            return Some((pos, *op));
        }
    }
    None
}

/// Extracts the category code a condition assigns to `key`.
///
/// Both `Or` and `And` nodes return the first non-zero resolution among their
/// children, so `a==1@b==2` resolves `b` to 2. Only `==` atoms yield a value.
pub fn resolve_trigger(condition: &Condition, key: &str) -> i64 {
    match condition {
        Condition::Or(children) | Condition::And(children) => children
            .iter()
            .map(|child| resolve_trigger(child, key))
            .find(|value| *value != 0)
            .unwrap_or(0),
        Condition::Atom {
            key: atom_key,
            op,
            value,
        } => {
            if atom_key != key || *op != CompareOp::Eq {
                return 0;
            }
            value.parse::<i64>().unwrap_or(0)
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Or(children) => write_joined(f, children, "@"),
            Condition::And(children) => write_joined(f, children, "&"),
            Condition::Atom { key, op, value } => write!(f, "{}{}{}", key, op.token(), value),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Condition], sep: &str) -> fmt::Result {
    for (idx, child) in children.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_equality_triggers() {
        let tree = parse_condition("running_style==1&distance_type==2").expect("parse");
        assert_eq!(resolve_trigger(&tree, "running_style"), 1);
        assert_eq!(resolve_trigger(&tree, "distance_type"), 2);
        assert_eq!(resolve_trigger(&tree, "unrelated_key"), 0);
    }

    #[test]
    fn first_non_zero_alternative_wins() {
        let tree = parse_condition("a==1@b==2").expect("parse");
        assert_eq!(resolve_trigger(&tree, "b"), 2);
        let tree = parse_condition("x==3@x==4").expect("parse");
        assert_eq!(resolve_trigger(&tree, "x"), 3);
    }

    #[test]
    fn longest_operator_token_is_used() {
        let tree = parse_condition("order_rate>=50").expect("parse");
        assert_eq!(
            tree,
            Condition::Atom {
                key: "order_rate".to_string(),
                op: CompareOp::Ge,
                value: "50".to_string(),
            }
        );
    }

    #[test]
    fn non_equality_and_non_numeric_atoms_resolve_to_zero() {
        let tree = parse_condition("distance_type>=2&running_style==front").expect("parse");
        assert_eq!(resolve_trigger(&tree, "distance_type"), 0);
        assert_eq!(resolve_trigger(&tree, "running_style"), 0);
    }

    #[test]
    fn blank_input_is_an_empty_condition() {
        let tree = parse_condition("   ").expect("parse");
        assert!(tree.is_empty());
        assert_eq!(resolve_trigger(&tree, "running_style"), 0);
    }

    #[test]
    fn atom_without_operator_is_rejected() {
        let err = parse_condition("distance_type==1&is_finalrace").expect_err("must fail");
        match err {
            EvalError::Parse { atom, condition } => {
                assert_eq!(atom, "is_finalrace");
                assert_eq!(condition, "distance_type==1&is_finalrace");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn display_renders_compact_form() {
        let raw = "a==1&b!=2@c<3";
        let tree = parse_condition(raw).expect("parse");
        assert_eq!(tree.to_string(), raw);
    }
}
