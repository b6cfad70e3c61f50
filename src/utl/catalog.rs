//! Static catalog of syntax node kinds
//!
//! A machine-readable description of every node kind the parser can
//! produce, with the fields each kind carries and the kinds each field
//! accepts. Tooling consumes it to validate trees or generate bindings
//! without reading the parser source.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// One node kind in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeType {
    pub kind: &'static str,
    /// Named nodes carry structure; anonymous ones are bare punctuation.
    pub named: bool,
    pub fields: &'static [Field],
}

/// A named field of a node kind and the kinds it may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub kinds: &'static [&'static str],
}

const EXPRESSION_KINDS: &[&str] = &[
    "identifier",
    "number",
    "string",
    "boolean",
    "null",
    "array_literal",
    "hash_literal",
    "binary_expression",
    "unary_expression",
    "filter_expression",
    "member_expression",
    "subscript_expression",
    "call_expression",
    "parenthesized_expression",
];

const STATEMENT_KINDS: &[&str] = &[
    "comment",
    "assignment_statement",
    "echo_statement",
    "return_statement",
    "break_statement",
    "continue_statement",
    "call_statement",
    "include_statement",
    "if_statement",
    "foreach_statement",
    "while_statement",
    "for_statement",
    "macro_definition",
    "split_if_start",
    "split_else",
    "split_else_if",
    "split_foreach_start",
    "split_while_start",
    "split_for_start",
    "split_macro_start",
    "split_end",
    "expression_statement",
    "error",
];

/// Every node kind, in grammar order.
pub static NODE_TYPES: &[NodeType] = &[
    NodeType {
        kind: "source_file",
        named: true,
        fields: &[Field {
            name: "nodes",
            kinds: &["content", "directive", "comment"],
        }],
    },
    NodeType {
        kind: "content",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "comment",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "directive",
        named: true,
        fields: &[Field {
            name: "code",
            kinds: &["code"],
        }],
    },
    NodeType {
        kind: "code",
        named: true,
        fields: &[Field {
            name: "items",
            kinds: STATEMENT_KINDS, // plus bare expressions
        }],
    },
    NodeType {
        kind: "assignment_statement",
        named: true,
        fields: &[
            Field {
                name: "target",
                kinds: &["identifier", "member_expression", "subscript_expression"],
            },
            Field {
                name: "value",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "echo_statement",
        named: true,
        fields: &[Field {
            name: "value",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "return_statement",
        named: true,
        fields: &[Field {
            name: "value",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "break_statement",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "continue_statement",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "call_statement",
        named: true,
        fields: &[Field {
            name: "value",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "include_statement",
        named: true,
        fields: &[Field {
            name: "value",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "if_statement",
        named: true,
        fields: &[
            Field {
                name: "condition",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
            Field {
                name: "else_clause",
                kinds: &["else_clause"],
            },
        ],
    },
    NodeType {
        kind: "else_clause",
        named: true,
        fields: &[
            Field {
                name: "condition",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
        ],
    },
    NodeType {
        kind: "foreach_statement",
        named: true,
        fields: &[
            Field {
                name: "iterable",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "binding",
                kinds: &["identifier"],
            },
            Field {
                name: "value_binding",
                kinds: &["identifier"],
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
        ],
    },
    NodeType {
        kind: "while_statement",
        named: true,
        fields: &[
            Field {
                name: "condition",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
        ],
    },
    NodeType {
        kind: "for_statement",
        named: true,
        fields: &[
            Field {
                name: "from",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "to",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "binding",
                kinds: &["identifier"],
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
        ],
    },
    NodeType {
        kind: "macro_definition",
        named: true,
        fields: &[
            Field {
                name: "name",
                kinds: &["identifier"],
            },
            Field {
                name: "parameters",
                kinds: &["parameter"],
            },
            Field {
                name: "body",
                kinds: STATEMENT_KINDS,
            },
        ],
    },
    NodeType {
        kind: "parameter",
        named: true,
        fields: &[
            Field {
                name: "name",
                kinds: &["identifier"],
            },
            Field {
                name: "default",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "split_if_start",
        named: true,
        fields: &[Field {
            name: "condition",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "split_else",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "split_else_if",
        named: true,
        fields: &[Field {
            name: "condition",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "split_foreach_start",
        named: true,
        fields: &[
            Field {
                name: "iterable",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "binding",
                kinds: &["identifier"],
            },
            Field {
                name: "value_binding",
                kinds: &["identifier"],
            },
        ],
    },
    NodeType {
        kind: "split_while_start",
        named: true,
        fields: &[Field {
            name: "condition",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "split_for_start",
        named: true,
        fields: &[
            Field {
                name: "from",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "to",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "binding",
                kinds: &["identifier"],
            },
        ],
    },
    NodeType {
        kind: "split_macro_start",
        named: true,
        fields: &[
            Field {
                name: "name",
                kinds: &["identifier"],
            },
            Field {
                name: "parameters",
                kinds: &["parameter"],
            },
        ],
    },
    NodeType {
        kind: "split_end",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "expression_statement",
        named: true,
        fields: &[Field {
            name: "expression",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "error",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "identifier",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "number",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "string",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "boolean",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "null",
        named: true,
        fields: &[],
    },
    NodeType {
        kind: "array_literal",
        named: true,
        fields: &[Field {
            name: "elements",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "hash_literal",
        named: true,
        fields: &[Field {
            name: "pairs",
            kinds: &["hash_pair"],
        }],
    },
    NodeType {
        kind: "hash_pair",
        named: true,
        fields: &[
            Field {
                name: "key",
                kinds: &["string", "identifier"],
            },
            Field {
                name: "value",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "binary_expression",
        named: true,
        fields: &[
            Field {
                name: "left",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "right",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "unary_expression",
        named: true,
        fields: &[Field {
            name: "operand",
            kinds: EXPRESSION_KINDS,
        }],
    },
    NodeType {
        kind: "filter_expression",
        named: true,
        fields: &[
            Field {
                name: "value",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "filter",
                kinds: &["identifier", "call_expression"],
            },
        ],
    },
    NodeType {
        kind: "member_expression",
        named: true,
        fields: &[
            Field {
                name: "object",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "property",
                kinds: &["identifier"],
            },
        ],
    },
    NodeType {
        kind: "subscript_expression",
        named: true,
        fields: &[
            Field {
                name: "object",
                kinds: EXPRESSION_KINDS,
            },
            Field {
                name: "index",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "call_expression",
        named: true,
        fields: &[
            Field {
                name: "function",
                kinds: &["identifier", "member_expression"],
            },
            Field {
                name: "arguments",
                kinds: &["argument"],
            },
        ],
    },
    NodeType {
        kind: "argument",
        named: true,
        fields: &[
            Field {
                name: "name",
                kinds: &["string"],
            },
            Field {
                name: "value",
                kinds: EXPRESSION_KINDS,
            },
        ],
    },
    NodeType {
        kind: "parenthesized_expression",
        named: true,
        fields: &[Field {
            name: "expression",
            kinds: EXPRESSION_KINDS,
        }],
    },
];

static BY_KIND: Lazy<HashMap<&'static str, &'static NodeType>> = Lazy::new(|| {
    NODE_TYPES
        .iter()
        .map(|node_type| (node_type.kind, node_type))
        .collect()
});

/// Look up a node kind by name.
pub fn node_type(kind: &str) -> Option<&'static NodeType> {
    BY_KIND.get(kind).copied()
}
