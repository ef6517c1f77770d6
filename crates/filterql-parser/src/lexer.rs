//! Filter-expression lexer.
//!
//! The whole input is tokenized up front into an indexed buffer. The parser
//! then moves over it with three cursors:
//!
//! - `current`: the last consumed token,
//! - `lookahead`: the next unconsumed token (absent at end of input),
//! - the peek cursor: an independent scan position starting just after
//!   `lookahead`, rewound by [`Lexer::reset_peek`].
//!
//! Scanning never fails. Anything no rule classifies becomes a
//! [`TokenKind::None`] token and is reported by the parser where a specific
//! kind was expected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use memchr::memchr;

use crate::token::{Token, TokenKind};

/// Cursor state over a fully tokenized expression.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    /// Index of the next token to load into `lookahead`.
    position: usize,
    /// Peek distance past `position`.
    peek: usize,
    token: Option<usize>,
    lookahead: Option<usize>,
}

impl<'a> Lexer<'a> {
    /// Tokenize `input`. Both `current` and `lookahead` start empty; call
    /// [`Lexer::advance`] once to load the first token.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: tokenize(input),
            position: 0,
            peek: 0,
            token: None,
            lookahead: None,
        }
    }

    /// The expression being scanned.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Every token of the input, in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Length of the input in characters; the offset reported at end of input.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.input.chars().count()
    }

    /// The last consumed token.
    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.token.and_then(|idx| self.tokens.get(idx))
    }

    /// The next unconsumed token, `None` at end of input.
    #[must_use]
    pub fn lookahead(&self) -> Option<&Token> {
        self.lookahead.and_then(|idx| self.tokens.get(idx))
    }

    /// Kind of the lookahead, [`TokenKind::EndOfInput`] when exhausted.
    #[must_use]
    pub fn lookahead_kind(&self) -> TokenKind {
        self.lookahead().map_or(TokenKind::EndOfInput, |t| t.kind)
    }

    /// Consume the lookahead. Returns whether a new lookahead is available.
    pub fn advance(&mut self) -> bool {
        self.peek = 0;
        self.token = self.lookahead;
        if self.position < self.tokens.len() {
            self.lookahead = Some(self.position);
            self.position += 1;
        } else {
            self.lookahead = None;
        }
        self.lookahead.is_some()
    }

    /// Return the token at the peek cursor and move the cursor one step.
    ///
    /// The first call after an [`advance`](Self::advance) or
    /// [`reset_peek`](Self::reset_peek) yields the token right after the
    /// lookahead.
    pub fn peek(&mut self) -> Option<&Token> {
        let idx = self.position + self.peek;
        if idx < self.tokens.len() {
            self.peek += 1;
            self.tokens.get(idx)
        } else {
            None
        }
    }

    /// The token [`peek`](Self::peek) would return next, without moving the cursor.
    #[must_use]
    pub fn glimpse(&self) -> Option<&Token> {
        self.tokens.get(self.position + self.peek)
    }

    /// Rewind the peek cursor to just after the lookahead.
    pub fn reset_peek(&mut self) {
        self.peek = 0;
    }

    /// Move the load position to token index `position` (clamped to the buffer).
    pub fn reset_position(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    /// Forget the current and lookahead tokens.
    pub fn clear(&mut self) {
        self.token = None;
        self.lookahead = None;
    }

    /// Whether the lookahead has kind `kind`.
    #[must_use]
    pub fn is_next_token(&self, kind: TokenKind) -> bool {
        self.lookahead_kind() == kind
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Tokenize an entire expression.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let started = Instant::now();
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut offsets = CharOffsets::new(input);
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let (kind, text, end) = match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let end = scan_while(bytes, pos + 1, is_ident_continue);
                let word = &input[pos..end];
                (TokenKind::from_word(word), word.to_owned(), end)
            }
            b'0'..=b'9' => {
                let (end, kind) = scan_number(bytes, pos);
                (kind, input[pos..end].to_owned(), end)
            }
            b'\'' => scan_string(input, pos),
            b'?' => {
                let end = scan_while(bytes, pos + 1, |c| c.is_ascii_digit());
                (TokenKind::None, input[pos..end].to_owned(), end)
            }
            b':' if bytes.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) => {
                let end = scan_while(bytes, pos + 2, |c| c.is_ascii_alphanumeric() || c == b'_');
                (TokenKind::None, input[pos..end].to_owned(), end)
            }
            b',' => (TokenKind::Comma, ",".to_owned(), pos + 1),
            b'(' => (TokenKind::OpenParen, "(".to_owned(), pos + 1),
            b')' => (TokenKind::CloseParen, ")".to_owned(), pos + 1),
            b'=' => (TokenKind::Equals, "=".to_owned(), pos + 1),
            b'>' => (TokenKind::GreaterThan, ">".to_owned(), pos + 1),
            b'<' => (TokenKind::LowerThan, "<".to_owned(), pos + 1),
            b'!' => (TokenKind::Negate, "!".to_owned(), pos + 1),
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('\u{FFFD}');
                let end = pos + ch.len_utf8();
                if ch.is_whitespace() {
                    pos = end;
                    continue;
                }
                (TokenKind::None, ch.to_string(), end)
            }
        };

        tokens.push(Token::new(kind, text, offsets.at(pos)));
        pos = end;
    }

    record_tokenize(&tokens, started);
    tracing::trace!(
        input_len = input.len(),
        token_count = tokens.len(),
        "tokenized filter expression"
    );
    tokens
}

const fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'\\')
}

fn scan_while(bytes: &[u8], mut end: usize, pred: impl Fn(u8) -> bool) -> usize {
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}

/// Scan `digits ('.' digits)* ([eE] [+-]? digits)?`.
///
/// One decimal point or an exponent makes a float; two or more decimal
/// points are not a number at all.
fn scan_number(bytes: &[u8], start: usize) -> (usize, TokenKind) {
    let is_digit = |c: u8| c.is_ascii_digit();
    let mut end = scan_while(bytes, start, is_digit);
    let mut dots = 0_usize;
    while bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        dots += 1;
        end = scan_while(bytes, end + 1, is_digit);
    }

    let mut exponent = false;
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut digits_at = end + 1;
        if matches!(bytes.get(digits_at), Some(b'+' | b'-')) {
            digits_at += 1;
        }
        if bytes.get(digits_at).is_some_and(u8::is_ascii_digit) {
            exponent = true;
            end = scan_while(bytes, digits_at, is_digit);
        }
    }

    let kind = match (dots, exponent) {
        (0, false) => TokenKind::Integer,
        (0 | 1, _) => TokenKind::Float,
        _ => TokenKind::None,
    };
    (end, kind)
}

/// Scan a single-quoted string starting at the opening quote.
///
/// `''` inside the quotes stands for one literal quote. Without a closing
/// quote the string ends at the first quote of the last `''` pair; with no
/// such pair it yields a lone `'` token of kind [`TokenKind::None`].
fn scan_string(input: &str, start: usize) -> (TokenKind, String, usize) {
    let bytes = input.as_bytes();
    let mut cursor = start + 1;
    let mut last_pair = None;
    let close = loop {
        let Some(rel) = memchr(b'\'', &bytes[cursor..]) else {
            match last_pair {
                Some(quote) => break quote,
                None => return (TokenKind::None, "'".to_owned(), start + 1),
            }
        };
        let quote = cursor + rel;
        if bytes.get(quote + 1) != Some(&b'\'') {
            break quote;
        }
        last_pair = Some(quote);
        cursor = quote + 2;
    };
    let value = input[start + 1..close].replace("''", "'");
    (TokenKind::String, value, close + 1)
}

/// Incremental byte-to-character offset conversion for a forward scan.
struct CharOffsets<'a> {
    input: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsets<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            byte: 0,
            chars: 0,
        }
    }

    /// Character offset of byte position `byte`; positions must not decrease.
    fn at(&mut self, byte: usize) -> usize {
        self.chars += self.input[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

// ---------------------------------------------------------------------------
// Tokenize metrics
// ---------------------------------------------------------------------------

static TOKENIZE_CALLS_TOTAL: AtomicU64 = AtomicU64::new(0);
static TOKENS_TOTAL: AtomicU64 = AtomicU64::new(0);
static UNMATCHED_TOKENS_TOTAL: AtomicU64 = AtomicU64::new(0);
static DURATION_LE_10US: AtomicU64 = AtomicU64::new(0);
static DURATION_LE_100US: AtomicU64 = AtomicU64::new(0);
static DURATION_LE_1MS: AtomicU64 = AtomicU64::new(0);
static DURATION_LE_10MS: AtomicU64 = AtomicU64::new(0);
static DURATION_GT_10MS: AtomicU64 = AtomicU64::new(0);
static DURATION_SUM_MICROS: AtomicU64 = AtomicU64::new(0);

/// Fixed-bucket histogram of tokenize wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizeDurationSecondsHistogram {
    pub le_10us: u64,
    pub le_100us: u64,
    pub le_1ms: u64,
    pub le_10ms: u64,
    pub gt_10ms: u64,
    /// Sum of all observed durations in microseconds.
    pub sum_micros: u64,
}

impl TokenizeDurationSecondsHistogram {
    /// Total number of observations.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.le_10us + self.le_100us + self.le_1ms + self.le_10ms + self.gt_10ms
    }
}

/// Snapshot of process-wide tokenize counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizeMetricsSnapshot {
    pub tokenize_calls_total: u64,
    pub tokens_total: u64,
    /// Tokens of kind [`TokenKind::None`].
    pub unmatched_tokens_total: u64,
    pub duration: TokenizeDurationSecondsHistogram,
}

fn record_tokenize(tokens: &[Token], started: Instant) {
    let micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    let unmatched = tokens.iter().filter(|t| t.kind == TokenKind::None).count();

    TOKENIZE_CALLS_TOTAL.fetch_add(1, Ordering::Relaxed);
    TOKENS_TOTAL.fetch_add(tokens.len() as u64, Ordering::Relaxed);
    UNMATCHED_TOKENS_TOTAL.fetch_add(unmatched as u64, Ordering::Relaxed);
    DURATION_SUM_MICROS.fetch_add(micros, Ordering::Relaxed);

    let bucket = match micros {
        0..=10 => &DURATION_LE_10US,
        11..=100 => &DURATION_LE_100US,
        101..=1_000 => &DURATION_LE_1MS,
        1_001..=10_000 => &DURATION_LE_10MS,
        _ => &DURATION_GT_10MS,
    };
    bucket.fetch_add(1, Ordering::Relaxed);
}

/// Return a snapshot of the tokenize counters.
#[must_use]
pub fn tokenize_metrics_snapshot() -> TokenizeMetricsSnapshot {
    TokenizeMetricsSnapshot {
        tokenize_calls_total: TOKENIZE_CALLS_TOTAL.load(Ordering::Relaxed),
        tokens_total: TOKENS_TOTAL.load(Ordering::Relaxed),
        unmatched_tokens_total: UNMATCHED_TOKENS_TOTAL.load(Ordering::Relaxed),
        duration: TokenizeDurationSecondsHistogram {
            le_10us: DURATION_LE_10US.load(Ordering::Relaxed),
            le_100us: DURATION_LE_100US.load(Ordering::Relaxed),
            le_1ms: DURATION_LE_1MS.load(Ordering::Relaxed),
            le_10ms: DURATION_LE_10MS.load(Ordering::Relaxed),
            gt_10ms: DURATION_GT_10MS.load(Ordering::Relaxed),
            sum_micros: DURATION_SUM_MICROS.load(Ordering::Relaxed),
        },
    }
}

/// Reset all tokenize counters.
pub fn reset_tokenize_metrics() {
    for counter in [
        &TOKENIZE_CALLS_TOTAL,
        &TOKENS_TOTAL,
        &UNMATCHED_TOKENS_TOTAL,
        &DURATION_LE_10US,
        &DURATION_LE_100US,
        &DURATION_LE_1MS,
        &DURATION_LE_10MS,
        &DURATION_GT_10MS,
        &DURATION_SUM_MICROS,
    ] {
        counter.store(0, Ordering::Relaxed);
    }
}
