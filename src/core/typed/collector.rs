//! Collects type declarations and typed log calls from one module.

use swc_ecma_ast::{
    CallExpr, Callee, Expr, Lit, MemberProp, TsEntityName, TsInterfaceDecl, TsType,
    TsTypeAliasDecl, TsTypeLit,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Method names whose second type argument is an event classification.
pub const TYPED_LOG_METHODS: &[&str] = &["publicLog2", "publicLogError2"];

/// A typed log call: `publicLog2<Event, Classification>('name', ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedLogCall {
    pub event_name: String,
    pub classification: String,
}

/// Single-pass visitor over one module.
///
/// Interfaces are stored as type literals so aliases and interfaces resolve
/// the same way later.
#[derive(Default)]
pub struct TypedShapeCollector {
    pub types: Vec<(String, TsType)>,
    pub calls: Vec<TypedLogCall>,
}

impl TypedShapeCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visit for TypedShapeCollector {
    fn visit_ts_type_alias_decl(&mut self, node: &TsTypeAliasDecl) {
        self.types
            .push((node.id.sym.as_str().to_string(), (*node.type_ann).clone()));
        node.visit_children_with(self);
    }

    fn visit_ts_interface_decl(&mut self, node: &TsInterfaceDecl) {
        let literal = TsType::TsTypeLit(TsTypeLit {
            span: node.body.span,
            members: node.body.body.clone(),
        });
        self.types.push((node.id.sym.as_str().to_string(), literal));
        node.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some(call) = typed_log_call(node) {
            self.calls.push(call);
        }
        node.visit_children_with(self);
    }
}

fn typed_log_call(call: &CallExpr) -> Option<TypedLogCall> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let method = match &**callee {
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(ident) => ident.sym.as_str(),
            _ => return None,
        },
        Expr::Ident(ident) => ident.sym.as_str(),
        _ => return None,
    };
    if !TYPED_LOG_METHODS.contains(&method) {
        return None;
    }

    let classification = call.type_args.as_ref()?.params.get(1)?;
    let TsType::TsTypeRef(type_ref) = &**classification else {
        return None;
    };
    let TsEntityName::Ident(ident) = &type_ref.type_name else {
        return None;
    };

    Some(TypedLogCall {
        event_name: extract_string_arg(call)?,
        classification: ident.sym.as_str().to_string(),
    })
}

/// Extract string argument from a call expression.
fn extract_string_arg(call: &CallExpr) -> Option<String> {
    call.args.first().and_then(|arg| match &*arg.expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(|s| s.to_string())),
        _ => None,
    })
}
