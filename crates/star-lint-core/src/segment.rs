//! Classified syntax segments extracted from parsed SQL.
//!
//! Rules never walk the `sqlparser` AST themselves. The analyzer extracts the
//! segments it knows how to classify and hands each one only to the rules
//! that subscribed to its [`SegmentKind`].

use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    Expr, FunctionArg, FunctionArgExpr, FunctionArguments, Query, SelectItem, SetExpr, Spanned,
    Statement, Visit, Visitor,
};
use std::ops::ControlFlow;

use crate::context::FileContext;
use crate::types::Location;

/// Grammatical category of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// An explicit wildcard projection in a select list: `*` or `alias.*`.
    WildcardProjection,
    /// A star passed as a function argument, as in `COUNT(*)`.
    FunctionStar,
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WildcardProjection => write!(f, "wildcard_projection"),
            Self::FunctionStar => write!(f, "function_star"),
        }
    }
}

/// A located, classified piece of SQL source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Grammatical category.
    pub kind: SegmentKind,
    /// Source text of the segment as rendered by the parser (e.g. `t.*`).
    pub raw: String,
    /// Line number (1-indexed, 0 when the parser reported no position).
    pub line: usize,
    /// Column number (1-indexed, 0 when the parser reported no position).
    pub column: usize,
    /// Exclusive end position as `(line, column)`, when the parser reported one.
    pub end: Option<(usize, usize)>,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(kind: SegmentKind, raw: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            raw: raw.into(),
            line,
            column,
            end: None,
        }
    }

    /// Sets the exclusive end position of the segment in the source.
    #[must_use]
    pub fn with_end(mut self, line: usize, column: usize) -> Self {
        self.end = Some((line, column));
        self
    }

    /// Resolves this segment to a [`Location`] within the file being linted.
    #[must_use]
    ///
    /// The span covers the source text between the parsed start and end
    /// positions. Without an end position it falls back to the length of
    /// [`Segment::raw`].
    #[must_use]
    pub fn location(&self, ctx: &FileContext<'_>) -> Location {
        let offset = ctx.offset_for(self.line, self.column);
        let length = self
            .end
            .map(|(line, column)| ctx.offset_for(line, column))
            .filter(|&end| end > offset)
            .map_or(self.raw.len(), |end| end - offset);
        Location::new(ctx.relative_path.clone(), self.line, self.column).with_span(offset, length)
    }
}

/// Extracts every classified segment from the given statements.
///
/// Queries are found wherever they nest: CTEs, derived tables, subqueries in
/// expressions, set operations and `INSERT ... SELECT`. Segments are returned
/// in source order.
#[must_use]
pub fn collect_segments(statements: &[Statement]) -> Vec<Segment> {
    let mut collector = SegmentCollector::default();
    for statement in statements {
        let _ = statement.visit(&mut collector);
    }

    let mut segments = collector.segments;
    segments.sort_by_key(|s| (s.line, s.column));
    segments
}

#[derive(Default)]
struct SegmentCollector {
    segments: Vec<Segment>,
}

impl SegmentCollector {
    fn push(&mut self, kind: SegmentKind, raw: String, node: &impl Spanned) {
        let span = node.span();
        let position = |loc: sqlparser::tokenizer::Location| {
            (
                usize::try_from(loc.line).unwrap_or_default(),
                usize::try_from(loc.column).unwrap_or_default(),
            )
        };
        let (line, column) = position(span.start);
        let (end_line, end_column) = position(span.end);
        self.segments
            .push(Segment::new(kind, raw, line, column).with_end(end_line, end_column));
    }

    /// Collects select-list wildcards of one query body.
    ///
    /// Nested `SetExpr::Query` bodies are skipped: the visitor reaches them
    /// as queries of their own.
    fn collect_set_expr(&mut self, body: &SetExpr) {
        match body {
            SetExpr::Select(select) => {
                for item in &select.projection {
                    if matches!(
                        item,
                        SelectItem::Wildcard(..) | SelectItem::QualifiedWildcard(..)
                    ) {
                        self.push(SegmentKind::WildcardProjection, item.to_string(), item);
                    }
                }
            }
            SetExpr::SetOperation { left, right, .. } => {
                self.collect_set_expr(left);
                self.collect_set_expr(right);
            }
            _ => {}
        }
    }
}

impl Visitor for SegmentCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        self.collect_set_expr(&query.body);
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if let Expr::Function(func) = expr {
            if let FunctionArguments::List(list) = &func.args {
                let has_star = list.args.iter().any(|arg| {
                    matches!(
                        arg,
                        FunctionArg::Unnamed(
                            FunctionArgExpr::Wildcard | FunctionArgExpr::QualifiedWildcard(_)
                        )
                    )
                });
                if has_star {
                    self.push(SegmentKind::FunctionStar, func.to_string(), expr);
                }
            }
        }
        ControlFlow::Continue(())
    }
}
