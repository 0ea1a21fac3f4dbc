//! Predicate expressions attached to blocks.
//!
//! Only the structure is modeled here: which questions an expression reads.
//! Evaluating a predicate against applicant answers happens elsewhere.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::QuestionId;

/// What a predicate does to its block when it evaluates to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateAction {
    HideBlock,
    ShowBlock,
    EligibleBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    AnyOf,
    NoneOf,
    IsBefore,
    IsOnOrAfter,
}

/// Comparison of one scalar of one question against a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafOperation {
    pub question_id: QuestionId,
    /// Answer component compared, e.g. `text`, `number`, `zip`.
    pub scalar: String,
    pub operator: Operator,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PredicateExpressionNode {
    Leaf(LeafOperation),
    And { children: Vec<PredicateExpressionNode> },
    Or { children: Vec<PredicateExpressionNode> },
}

impl PredicateExpressionNode {
    fn collect_questions(&self, out: &mut BTreeSet<QuestionId>) {
        match self {
            PredicateExpressionNode::Leaf(leaf) => {
                out.insert(leaf.question_id);
            }
            PredicateExpressionNode::And { children } | PredicateExpressionNode::Or { children } => {
                for child in children {
                    child.collect_questions(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateDefinition {
    pub root: PredicateExpressionNode,
    pub action: PredicateAction,
}

impl PredicateDefinition {
    /// Ids of every question the expression reads.
    pub fn questions(&self) -> BTreeSet<QuestionId> {
        let mut out = BTreeSet::new();
        self.root.collect_questions(&mut out);
        out
    }
}

/// Eligibility criteria of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDefinition {
    pub predicate: PredicateDefinition,
}
