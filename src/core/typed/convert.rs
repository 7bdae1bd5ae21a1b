//! Conversion of classification types into JSON shapes.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use swc_ecma_ast::{
    Expr, Lit, TsEntityName, TsLit, TsType, TsTypeElement, TsUnionOrIntersectionType,
};

/// Alias references followed before giving up (guards against cycles).
const MAX_REFERENCE_DEPTH: usize = 16;

/// Named types visible in one directory.
pub struct TypeTable<'a> {
    types: HashMap<&'a str, &'a TsType>,
}

impl<'a> TypeTable<'a> {
    /// Later entries replace earlier ones with the same name.
    pub fn new(types: impl IntoIterator<Item = &'a (String, TsType)>) -> Self {
        Self {
            types: types
                .into_iter()
                .map(|(name, ty)| (name.as_str(), ty))
                .collect(),
        }
    }

    /// Convert the named type into an object shape.
    pub fn shape_of(&self, name: &str) -> Option<Map<String, Value>> {
        let ty = self.types.get(name)?;
        match self.convert(ty, 0)? {
            Value::Object(shape) => Some(shape),
            _ => None,
        }
    }

    fn convert(&self, ty: &TsType, depth: usize) -> Option<Value> {
        match ty {
            TsType::TsTypeLit(lit) => {
                let mut shape = Map::new();
                for member in &lit.members {
                    let TsTypeElement::TsPropertySignature(sig) = member else {
                        continue;
                    };
                    let Some(key) = property_key(&sig.key) else {
                        continue;
                    };
                    let Some(value) = sig
                        .type_ann
                        .as_ref()
                        .and_then(|ann| self.convert(&ann.type_ann, depth))
                    else {
                        continue;
                    };
                    shape.insert(key, value);
                }
                Some(Value::Object(shape))
            }
            TsType::TsLitType(lit) => match &lit.lit {
                TsLit::Str(s) => s.value.as_str().map(|s| Value::String(s.to_string())),
                TsLit::Bool(b) => Some(Value::Bool(b.value)),
                TsLit::Number(n) => number_value(n.value),
                _ => None,
            },
            TsType::TsTypeRef(type_ref) => {
                if depth >= MAX_REFERENCE_DEPTH {
                    return None;
                }
                let TsEntityName::Ident(ident) = &type_ref.type_name else {
                    return None;
                };
                let target = self.types.get(ident.sym.as_str())?;
                self.convert(target, depth + 1)
            }
            TsType::TsParenthesizedType(paren) => self.convert(&paren.type_ann, depth),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                intersection,
            )) => {
                let mut merged = Map::new();
                for part in &intersection.types {
                    if let Some(Value::Object(shape)) = self.convert(part, depth) {
                        merged.extend(shape);
                    }
                }
                Some(Value::Object(merged))
            }
            _ => None,
        }
    }
}

/// Integral literals stay integers in the output.
fn number_value(value: f64) -> Option<Value> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Some(Value::from(value as i64))
    } else {
        Number::from_f64(value).map(Value::Number)
    }
}

fn property_key(key: &Expr) -> Option<String> {
    match key {
        Expr::Ident(ident) => Some(ident.sym.as_str().to_string()),
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        _ => None,
    }
}
