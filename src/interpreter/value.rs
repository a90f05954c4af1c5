//! Parse results (spec.md §3's "Parse result", generalized per §9's
//! `ParseValue` design note).
use ptree::TreeItem;
use std::borrow::Cow;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ParseValue {
    Str(String),
    None,
    Tuple(Vec<ParseValue>),
    Set(Vec<ParseValue>),
    Node(Rc<ParseNode>),
}

/// Tree-mode wrapper around a rule invocation's result, replacing the plain
/// value with `{name, start, end, inner}` (spec.md §4.2's tree mode).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub rule: String,
    pub start: usize,
    pub end: usize,
    pub inner: Box<ParseValue>,
}

/// `str_concat` (spec.md §4.2): strings concatenate, `None` is the
/// concatenation identity, and anything else merges into one flat tuple —
/// merging rather than nesting existing tuples is what keeps a long
/// `Concat` chain from growing a tuple-of-tuples skeleton.
pub fn str_concat(a: ParseValue, b: ParseValue) -> ParseValue {
    match (a, b) {
        (ParseValue::Str(x), ParseValue::Str(y)) => ParseValue::Str(x + &y),
        (ParseValue::None, other) => other,
        (other, ParseValue::None) => other,
        (a, b) => {
            let mut items = Vec::with_capacity(2);
            push_flat(&mut items, a);
            push_flat(&mut items, b);
            if items.len() == 1 {
                items.pop().unwrap()
            } else {
                ParseValue::Tuple(items)
            }
        }
    }
}

fn push_flat(items: &mut Vec<ParseValue>, v: ParseValue) {
    match v {
        ParseValue::Tuple(inner) => items.extend(inner),
        other => items.push(other),
    }
}

impl TreeItem for ParseNode {
    type Child = ParseNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{} # {}-{}", self.rule, self.start, self.end)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(collect_child_nodes(&self.inner))
    }
}

fn collect_child_nodes(value: &ParseValue) -> Vec<ParseNode> {
    match value {
        ParseValue::Node(n) => vec![(**n).clone()],
        ParseValue::Tuple(items) | ParseValue::Set(items) => {
            items.iter().flat_map(collect_child_nodes).collect()
        }
        ParseValue::Str(_) | ParseValue::None => Vec::new(),
    }
}

impl ParseNode {
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}
