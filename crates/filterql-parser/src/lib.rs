// Filter-expression lexer and parser.
//
// Hand-written recursive descent over an eagerly tokenized buffer with
// bounded peeking. Produces an AST from `filterql-ast`.

pub mod config;
pub mod lexer;
pub mod parser;
pub mod token;

pub use config::{DEFAULT_MAX_DEPTH, ParserConfig};
pub use lexer::{
    Lexer, TokenizeDurationSecondsHistogram, TokenizeMetricsSnapshot, reset_tokenize_metrics,
    tokenize, tokenize_metrics_snapshot,
};
pub use parser::{ParseMetricsSnapshot, Parser, parse_metrics_snapshot, reset_parse_metrics};
pub use token::{Token, TokenKind};
