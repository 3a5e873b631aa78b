//! Receiver chains such as `obj.a().field.b().c()`.
//!
//! A chain is a maximal run of calls and field accesses linked through their
//! receivers. Its length is the number of calls on that run; arguments start
//! chains of their own.

use crate::frontend::{CstKind, CstNode, Role};

fn is_link(node: &CstNode) -> bool {
    matches!(node.kind, CstKind::Call | CstKind::FieldAccess)
}

/// Calls per chain, in source order. Runs without any call are omitted.
pub fn call_chains(root: &CstNode) -> Vec<u32> {
    let mut chains = Vec::new();
    let mut pending = vec![(root, false)];

    while let Some((node, inside_link)) = pending.pop() {
        let link = is_link(node);
        if link && !inside_link {
            let calls = calls_along(node);
            if calls > 0 {
                chains.push(calls);
            }
        }
        pending.extend(node.children.iter().rev().map(|child| (child, link)));
    }
    chains
}

/// Walk from the outermost link down through receivers.
fn calls_along(head: &CstNode) -> u32 {
    let mut calls = 0;
    let mut current = Some(head);
    while let Some(node) = current.filter(|n| is_link(n)) {
        let receiver = match node.kind {
            CstKind::Call => {
                calls += 1;
                Role::Callee
            }
            _ => Role::Operand,
        };
        current = node.child_with_role(receiver);
    }
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Language;
    use crate::frontend::parse_source;

    fn chains(body: &str, language: Language) -> Vec<u32> {
        let source = format!("void f(void) {{ {body} }}\n");
        call_chains(&parse_source(&source, language).unwrap().root)
    }

    #[test]
    fn test_fields_between_calls_do_not_break_the_chain() {
        assert_eq!(chains("obj.a().field.b().c().d();", Language::C), vec![4]);
        assert_eq!(chains("obj.a().field.b().c().d();", Language::Cpp), vec![4]);
    }

    #[test]
    fn test_arguments_start_their_own_chain() {
        assert_eq!(chains("run(a.b().c(), x.y());", Language::C), vec![1, 2, 1]);
    }

    #[test]
    fn test_pointer_access_and_plain_fields() {
        assert_eq!(chains("p->next()->next()->value;", Language::C), vec![2]);
        assert!(chains("p->next->next->value = 1;", Language::C).is_empty());
    }
}
