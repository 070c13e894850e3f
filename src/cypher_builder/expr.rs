//! Value expressions: variables, properties, parameters, function calls and
//! projections.

use serde_json::Value;

use super::context::RenderContext;
use super::errors::CypherBuildError;
use super::pattern::Pattern;
use super::predicate::Predicate;
use super::references::{Param, PropertyRef, Variable};
use crate::utils::naming::escape_identifier;

#[derive(Debug, Clone)]
pub enum Expr {
    Variable(Variable),
    Property(PropertyRef),
    Param(Param),
    /// Constant inlined into the text; user input always goes through `Param`
    Literal(Value),
    Function(FunctionCall),
    List(Vec<Expr>),
    /// `{ key: expr, ... }`
    Map(Vec<(String, Expr)>),
    MapProjection(MapProjection),
    PatternComprehension(Box<PatternComprehension>),
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    name: &'static str,
    args: Vec<Expr>,
}

impl FunctionCall {
    pub fn new(name: &'static str, args: Vec<Expr>) -> Self {
        FunctionCall { name, args }
    }
}

#[derive(Debug, Clone)]
pub enum MapEntry {
    /// `.key`
    Property(String),
    /// `key: expr`
    Value(String, Expr),
}

/// `variable { .a, b: expr }`
#[derive(Debug, Clone)]
pub struct MapProjection {
    variable: Variable,
    entries: Vec<MapEntry>,
}

impl MapProjection {
    pub fn new(variable: &Variable) -> Self {
        MapProjection {
            variable: variable.clone(),
            entries: Vec::new(),
        }
    }

    pub fn property(mut self, key: impl Into<String>) -> Self {
        self.entries.push(MapEntry::Property(key.into()));
        self
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.entries.push(MapEntry::Value(key.into(), value.into()));
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }
}

/// `[pattern WHERE predicate | projection]`
#[derive(Debug, Clone)]
pub struct PatternComprehension {
    pattern: Pattern,
    predicate: Option<Predicate>,
    projection: Expr,
}

impl PatternComprehension {
    pub fn new(pattern: Pattern, predicate: Option<Predicate>, projection: Expr) -> Self {
        PatternComprehension {
            pattern,
            predicate,
            projection,
        }
    }
}

pub fn count(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("count", vec![expr.into()]))
}

pub fn collect(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("collect", vec![expr.into()]))
}

pub fn head(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("head", vec![expr.into()]))
}

pub fn size(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("size", vec![expr.into()]))
}

pub fn avg(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("avg", vec![expr.into()]))
}

pub fn sum(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("sum", vec![expr.into()]))
}

pub fn min(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("min", vec![expr.into()]))
}

pub fn max(expr: impl Into<Expr>) -> Expr {
    Expr::Function(FunctionCall::new("max", vec![expr.into()]))
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn param(value: impl Into<Value>) -> Self {
        Expr::Param(Param::new(value))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Variables this expression reads. Pattern comprehensions bind their
    /// own variables and are not searched.
    pub fn referenced_variables(&self) -> Vec<&Variable> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a Variable>) {
        match self {
            Expr::Variable(variable) => out.push(variable),
            Expr::Property(property) => out.push(property.variable()),
            Expr::Function(call) => call.args.iter().for_each(|arg| arg.collect_variables(out)),
            Expr::List(items) => items.iter().for_each(|item| item.collect_variables(out)),
            Expr::Map(entries) => entries
                .iter()
                .for_each(|(_, value)| value.collect_variables(out)),
            Expr::MapProjection(projection) => {
                out.push(&projection.variable);
                for entry in &projection.entries {
                    if let MapEntry::Value(_, value) = entry {
                        value.collect_variables(out);
                    }
                }
            }
            Expr::Param(_) | Expr::Literal(_) | Expr::PatternComprehension(_) => {}
        }
    }

    pub(crate) fn render(&self, ctx: &mut RenderContext) -> Result<String, CypherBuildError> {
        let text = match self {
            Expr::Variable(variable) => ctx.variable_name(variable),
            Expr::Property(property) => {
                let mut text = ctx.variable_name(property.variable());
                for key in property.path() {
                    text.push('.');
                    text.push_str(&escape_identifier(key));
                }
                text
            }
            Expr::Param(param) => format!("${}", ctx.param_name(param)),
            Expr::Literal(value) => render_literal(value),
            Expr::Function(call) => {
                let args = render_all(&call.args, ctx)?;
                format!("{}({})", call.name, args.join(", "))
            }
            Expr::List(items) => format!("[{}]", render_all(items, ctx)?.join(", ")),
            Expr::Map(entries) => {
                let mut rendered = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    rendered.push(format!("{}: {}", escape_identifier(key), value.render(ctx)?));
                }
                if rendered.is_empty() {
                    "{ }".to_string()
                } else {
                    format!("{{ {} }}", rendered.join(", "))
                }
            }
            Expr::MapProjection(projection) => {
                let variable = ctx.variable_name(&projection.variable);
                let mut entries = Vec::with_capacity(projection.entries.len());
                for entry in &projection.entries {
                    entries.push(match entry {
                        MapEntry::Property(key) => format!(".{}", escape_identifier(key)),
                        MapEntry::Value(key, value) => {
                            format!("{}: {}", escape_identifier(key), value.render(ctx)?)
                        }
                    });
                }
                if entries.is_empty() {
                    format!("{} {{ }}", variable)
                } else {
                    format!("{} {{ {} }}", variable, entries.join(", "))
                }
            }
            Expr::PatternComprehension(comprehension) => {
                let pattern = comprehension.pattern.render(ctx)?;
                let predicate = match &comprehension.predicate {
                    Some(predicate) => predicate.render(ctx)?,
                    None => None,
                };
                let projection = comprehension.projection.render(ctx)?;
                match predicate {
                    Some(predicate) => format!("[{} WHERE {} | {}]", pattern, predicate, projection),
                    None => format!("[{} | {}]", pattern, projection),
                }
            }
        };
        Ok(text)
    }
}

fn render_all(exprs: &[Expr], ctx: &mut RenderContext) -> Result<Vec<String>, CypherBuildError> {
    exprs.iter().map(|expr| expr.render(ctx)).collect()
}

fn render_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(render_literal).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Expr::Variable(variable)
    }
}

impl From<&Variable> for Expr {
    fn from(variable: &Variable) -> Self {
        Expr::Variable(variable.clone())
    }
}

impl From<PropertyRef> for Expr {
    fn from(property: PropertyRef) -> Self {
        Expr::Property(property)
    }
}

impl From<Param> for Expr {
    fn from(param: Param) -> Self {
        Expr::Param(param)
    }
}

impl From<MapProjection> for Expr {
    fn from(projection: MapProjection) -> Self {
        Expr::MapProjection(projection)
    }
}

impl From<PatternComprehension> for Expr {
    fn from(comprehension: PatternComprehension) -> Self {
        Expr::PatternComprehension(Box::new(comprehension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher_builder::context::RenderOptions;
    use serde_json::json;

    fn render(expr: &Expr) -> (String, RenderContext) {
        let mut ctx = RenderContext::new(RenderOptions::default());
        let text = expr.render(&mut ctx).unwrap();
        (text, ctx)
    }

    #[test]
    fn test_property_with_escaped_key() {
        let this = Variable::named_node("this", ["Movie"]);
        assert_eq!(render(&this.property("title")).0, "this.title");
        assert_eq!(render(&this.property("release date")).0, "this.`release date`");
    }

    #[test]
    fn test_param_binds_value() {
        let (text, ctx) = render(&Expr::param(json!(["a", "b"])));
        assert_eq!(text, "$param0");
        assert_eq!(ctx.params().get("param0"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn test_nested_functions() {
        let this = Variable::named_node("this", ["Movie"]);
        assert_eq!(
            render(&avg(size(this.property("title")))).0,
            "avg(size(this.title))"
        );
        assert_eq!(
            render(&head(collect(&this))).0,
            "head(collect(this))"
        );
    }

    #[test]
    fn test_map_projection() {
        let this = Variable::named_node("this", ["Movie"]);
        let actors = Variable::value();
        let projection = MapProjection::new(&this)
            .property("title")
            .entry("actors", &actors);
        assert_eq!(
            render(&projection.into()).0,
            "this { .title, actors: var0 }"
        );
        assert_eq!(render(&MapProjection::new(&this).into()).0, "this { }");
    }

    #[test]
    fn test_referenced_variables_reach_into_arguments() {
        let this = Variable::named_node("this", ["Movie"]);
        let actors = Variable::value();
        let node = Variable::node(["Actor"]);
        let projection: Expr = MapProjection::new(&this)
            .property("title")
            .entry("actors", &actors)
            .entry("lead", head(collect(node.property("name"))))
            .into();
        let found = projection.referenced_variables();
        assert_eq!(found.len(), 3);
        assert!(found[1].same_as(&actors));
        assert!(found[2].same_as(&node));
        assert!(Expr::param(1).referenced_variables().is_empty());
    }

    #[test]
    fn test_map_literal() {
        let this = Variable::named_node("this", ["Movie"]);
        let edges = Variable::value();
        let map = Expr::map([
            ("edges", Expr::from(&edges)),
            ("totalCount", size(&edges)),
            ("node", MapProjection::new(&this).property("title").into()),
        ]);
        assert_eq!(
            render(&map).0,
            "{ edges: var0, totalCount: size(var0), node: this { .title } }"
        );
        assert_eq!(map.referenced_variables().len(), 3);
    }

    #[test]
    fn test_literals_are_inlined() {
        assert_eq!(render(&Expr::literal(1)).0, "1");
        assert_eq!(render(&Expr::literal(true)).0, "true");
        assert_eq!(render(&Expr::literal("it's")).0, "'it\\'s'");
        assert!(render(&Expr::literal(1)).1.params().is_empty());
    }
}
