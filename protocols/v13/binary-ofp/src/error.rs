//! Errors raised while encoding, decoding and validating wire values.
//!
//! Decoding is all-or-nothing: the first failure aborts the whole decode and is returned to the
//! caller with as much context as the failing layer knows. Each dispatch boundary adds its own
//! category and tag through [`Error::within`] without overwriting context already filled in by a
//! deeper layer.

use core::fmt;

use crate::error_code::{classify, ErrorCode, Fault};

/// The value categories that have their own dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryId {
    Message,
    Action,
    Instruction,
    MatchField,
    QueueProperty,
    MeterBand,
    TableFeatureProperty,
    HelloElement,
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CategoryId::Message => "message",
            CategoryId::Action => "action",
            CategoryId::Instruction => "instruction",
            CategoryId::MatchField => "match field",
            CategoryId::QueueProperty => "queue property",
            CategoryId::MeterBand => "meter band",
            CategoryId::TableFeatureProperty => "table feature property",
            CategoryId::HelloElement => "hello element",
        };
        f.write_str(name)
    }
}

/// Where an error happened, as far as it is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    pub category: Option<CategoryId>,
    pub tag: Option<u64>,
}

impl Context {
    pub fn new(category: CategoryId, tag: u64) -> Self {
        Self {
            category: Some(category),
            tag: Some(tag),
        }
    }

    fn fill(&mut self, category: CategoryId, tag: Option<u64>) {
        if self.category.is_none() {
            self.category = Some(category);
            self.tag = tag;
        } else if self.category == Some(category) && self.tag.is_none() {
            self.tag = tag;
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.category, self.tag) {
            (Some(c), Some(t)) => write!(f, "{} 0x{:x}", c, t),
            (Some(c), None) => write!(f, "{}", c),
            _ => f.write_str("wire value"),
        }
    }
}

/// The length a type accepts for its declared wire length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    Exact(u16),
    AtLeast(u16),
    AtMost(u16),
    MultipleOf(u16),
}

impl LengthRule {
    /// `Exact` for a length counted in bytes, saturated to the largest `u16`.
    pub fn exact(len: usize) -> Self {
        LengthRule::Exact(u16::try_from(len).unwrap_or(u16::MAX))
    }

    pub fn admits(&self, length: u16) -> bool {
        match *self {
            LengthRule::Exact(n) => length == n,
            LengthRule::AtLeast(n) => length >= n,
            LengthRule::AtMost(n) => length <= n,
            LengthRule::MultipleOf(n) => n != 0 && length % n == 0,
        }
    }
}

impl fmt::Display for LengthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthRule::Exact(n) => write!(f, "exactly {}", n),
            LengthRule::AtLeast(n) => write!(f, "at least {}", n),
            LengthRule::AtMost(n) => write!(f, "at most {}", n),
            LengthRule::MultipleOf(n) => write!(f, "a multiple of {}", n),
        }
    }
}

/// No exception is thrown, every fallible operation returns `Result<_, Error>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Fewer bytes are available than the value requires.
    Truncated {
        context: Context,
        required: usize,
        remaining: usize,
    },
    /// A declared length violates the length rule of the selected type.
    BadLength {
        context: Context,
        declared: usize,
        rule: LengthRule,
    },
    /// The tag is not registered in the category and the category has no fallback.
    UnknownType { category: CategoryId, tag: u64 },
    /// A field is out of the range the protocol allows. `code` is the protocol sub-code under
    /// the error type of the category.
    InvalidValue {
        context: Context,
        code: u16,
        reason: &'static str,
    },
    /// Two elements of a keyed set share one canonical key.
    DuplicateKey { category: CategoryId, key: u64 },
    /// A variant was cast to a member it does not hold.
    WrongVariant {
        category: CategoryId,
        expected: u64,
        actual: u64,
    },
}

impl Error {
    pub fn truncated(required: usize, remaining: usize) -> Self {
        Error::Truncated {
            context: Context::default(),
            required,
            remaining,
        }
    }

    pub fn bad_length(declared: usize, rule: LengthRule) -> Self {
        Error::BadLength {
            context: Context::default(),
            declared,
            rule,
        }
    }

    pub fn invalid(code: u16, reason: &'static str) -> Self {
        Error::InvalidValue {
            context: Context::default(),
            code,
            reason,
        }
    }

    /// Attaches the category and tag of the enclosing dispatch boundary. Context already set by
    /// a nested value is kept.
    pub fn within(mut self, category: CategoryId, tag: u64) -> Self {
        self.fill(category, Some(tag));
        self
    }

    /// Like [`Error::within`] when the tag is not known yet (the sub-header itself failed).
    pub fn within_category(mut self, category: CategoryId) -> Self {
        self.fill(category, None);
        self
    }

    fn fill(&mut self, category: CategoryId, tag: Option<u64>) {
        match self {
            Error::Truncated { context, .. }
            | Error::BadLength { context, .. }
            | Error::InvalidValue { context, .. } => context.fill(category, tag),
            Error::UnknownType { .. } | Error::DuplicateKey { .. } | Error::WrongVariant { .. } => {
            }
        }
    }

    pub fn context(&self) -> Context {
        match *self {
            Error::Truncated { context, .. }
            | Error::BadLength { context, .. }
            | Error::InvalidValue { context, .. } => context,
            Error::UnknownType { category, tag } => Context::new(category, tag),
            Error::DuplicateKey { category, key } => Context::new(category, key),
            Error::WrongVariant {
                category, actual, ..
            } => Context::new(category, actual),
        }
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.context().category
    }

    /// Classifies the failure into the error code a peer would be sent.
    pub fn code(&self) -> ErrorCode {
        let fault = match *self {
            Error::Truncated { .. } | Error::BadLength { .. } => Fault::Length,
            Error::UnknownType { .. } | Error::WrongVariant { .. } => Fault::Type,
            Error::InvalidValue { code, .. } => Fault::Value(code),
            Error::DuplicateKey { .. } => Fault::Duplicate,
        };
        classify(self.context(), fault)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            Truncated {
                context,
                required,
                remaining,
            } => write!(
                f,
                "Truncated {}: {} bytes required, {} remaining",
                context, required, remaining
            ),
            BadLength {
                context,
                declared,
                rule,
            } => write!(
                f,
                "Bad length for {}: declared {}, expected {}",
                context, declared, rule
            ),
            UnknownType { category, tag } => write!(f, "Unknown {} type 0x{:x}", category, tag),
            InvalidValue {
                context, reason, ..
            } => write!(f, "Invalid {}: {}", context, reason),
            DuplicateKey { category, key } => {
                write!(f, "Duplicate {} with canonical key {}", category, key)
            }
            WrongVariant {
                category,
                expected,
                actual,
            } => write!(
                f,
                "Wrong {} variant: expected 0x{:x}, holds 0x{:x}",
                category, expected, actual
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_within_keeps_inner_context() {
        let inner = Error::truncated(4, 2).within(CategoryId::MatchField, 0x8000_0000);
        let outer = inner.within(CategoryId::Action, 25);
        assert_eq!(outer.category(), Some(CategoryId::MatchField));
        assert_eq!(outer.context().tag, Some(0x8000_0000));
    }

    #[test]
    fn test_within_category_then_tag() {
        let e = Error::truncated(4, 2)
            .within_category(CategoryId::Action)
            .within(CategoryId::Action, 0);
        assert_eq!(e.context(), Context::new(CategoryId::Action, 0));
    }

    #[test]
    fn test_length_rule() {
        assert!(LengthRule::Exact(16).admits(16));
        assert!(!LengthRule::Exact(16).admits(24));
        assert!(LengthRule::AtLeast(8).admits(24));
        assert!(!LengthRule::AtLeast(8).admits(4));
        assert!(LengthRule::MultipleOf(8).admits(24));
        assert!(!LengthRule::MultipleOf(8).admits(20));
        assert!(!LengthRule::MultipleOf(0).admits(0));
        assert!(LengthRule::AtMost(u16::MAX).admits(u16::MAX));
        assert!(!LengthRule::AtMost(7).admits(8));
    }

    #[test]
    fn test_exact_saturates() {
        assert_eq!(LengthRule::exact(12), LengthRule::Exact(12));
        assert_eq!(LengthRule::exact(70_008), LengthRule::Exact(u16::MAX));
    }

    #[test]
    fn test_display() {
        let e = Error::UnknownType {
            category: CategoryId::Action,
            tag: 0x42,
        };
        assert_eq!(e.to_string(), "Unknown action type 0x42");
        let e = Error::truncated(8, 3);
        assert_eq!(e.to_string(), "Truncated wire value: 8 bytes required, 3 remaining");
    }
}
