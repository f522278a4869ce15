use crate::grammar::TerminalId;
use crate::text::Span;

/// A lexed token: the terminal that matched, the raw lexeme and where it
/// sits in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub terminal: TerminalId,
    pub raw: &'src str,
    pub span: Span,
}

/// A semantic value paired with the span of the input that produced it.
///
/// Reasoners produce one per shifted token; reduces fold a slice of them
/// into the parent's value, whose span covers the children.
#[derive(Debug, Clone)]
pub struct ValueToken<V> {
    pub value: V,
    pub span: Span,
}

impl<V> ValueToken<V> {
    #[must_use]
    pub const fn new(value: V, span: Span) -> Self {
        Self { value, span }
    }

    /// Moves the value out, leaving the default in its place. The usual way
    /// for a transducer to consume a child.
    #[must_use]
    pub fn take(&mut self) -> V
    where
        V: Default,
    {
        std::mem::take(&mut self.value)
    }
}
