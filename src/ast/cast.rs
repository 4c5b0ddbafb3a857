use tracing::trace;

use crate::{type_checker::type_checker::TypeChecker, types::types::TypeId};

use super::{ast::NodeWrapper, expressions::CastExpr};

/// Makes `node` produce a value of type `dest`.
///
/// Returns the node itself when it already does (or trivially can), otherwise
/// a [`CastExpr`] taking ownership of it. Legality is the caller's business.
pub fn cast(node: NodeWrapper, dest: TypeId, type_checker: &TypeChecker<'_>) -> NodeWrapper {
    if node.get_type() == Some(dest) || node.trivially_compatible(type_checker, dest) {
        return node;
    }

    trace!(
        "inserting cast to '{}' at {}",
        type_checker.types.get_name(dest),
        node.get_span().start
    );
    let scope = node.get_scope();
    let span = node.get_span().clone();
    NodeWrapper::new(CastExpr::new(scope, node, dest, span))
}
