use qrlens_imgproc::geometry::Point2i;

use crate::{error::QrError, geometry::Polygon};

/// Type label used for QR codes by every adapter.
pub const QR_CODE_TYPE: &str = "QR-Code";

/// A single decoded symbol within a frame.
///
/// Symbols are created per frame and never tracked across frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedSymbol {
    /// The symbology label, e.g. `"QR-Code"`.
    pub symbol_type: String,
    /// The decoded payload.
    pub text: String,
    /// The image-plane points reported by the library, in library order.
    pub points: Vec<Point2i>,
}

impl DecodedSymbol {
    /// Create a new symbol.
    pub fn new(symbol_type: impl Into<String>, text: impl Into<String>, points: Vec<Point2i>) -> Self {
        Self {
            symbol_type: symbol_type.into(),
            text: text.into(),
            points,
        }
    }

    /// The drawable outline of the symbol.
    pub fn polygon(&self) -> Polygon {
        Polygon::from_points(&self.points)
    }
}

/// The result of decoding one frame.
///
/// Distinguishes "nothing found" from "the library failed internally"; both carry zero
/// symbols for the purposes of rendering.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// At least one symbol was decoded.
    Found(Vec<DecodedSymbol>),
    /// The library did not find any symbol.
    NotFound,
    /// The library located something but faulted while decoding it.
    Failed(QrError),
}

impl DecodeOutcome {
    /// Build the outcome of a frame from its decoded symbols and per-candidate failures.
    ///
    /// Any decoded symbol wins over failures, and the first failure is kept when
    /// nothing decoded.
    pub fn collect(symbols: Vec<DecodedSymbol>, failures: Vec<QrError>) -> Self {
        if !symbols.is_empty() {
            return Self::Found(symbols);
        }

        match failures.into_iter().next() {
            Some(err) => Self::Failed(err),
            None => Self::NotFound,
        }
    }

    /// The decoded symbols, empty unless [`DecodeOutcome::Found`].
    pub fn symbols(&self) -> &[DecodedSymbol] {
        match self {
            Self::Found(symbols) => symbols,
            Self::NotFound | Self::Failed(_) => &[],
        }
    }

    /// Take the decoded symbols, empty unless [`DecodeOutcome::Found`].
    pub fn into_symbols(self) -> Vec<DecodedSymbol> {
        match self {
            Self::Found(symbols) => symbols,
            Self::NotFound | Self::Failed(_) => Vec::new(),
        }
    }

    /// Whether at least one symbol was decoded.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Whether the library faulted.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Log the outcome of a frame decoded by `decoder`.
    pub fn log(&self, decoder: &str) {
        match self {
            Self::Found(symbols) => {
                for symbol in symbols {
                    log::info!("{decoder}: {} {}", symbol.symbol_type, symbol.text);
                }
            }
            Self::NotFound => log::debug!("{decoder}: no symbol found"),
            Self::Failed(err) => log::warn!("{decoder}: {err} (ignoring)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeOutcome, DecodedSymbol, QR_CODE_TYPE};
    use crate::error::QrError;
    use qrlens_imgproc::geometry::Point2i;

    fn symbol(text: &str) -> DecodedSymbol {
        DecodedSymbol::new(QR_CODE_TYPE, text, vec![Point2i::new(0, 0)])
    }

    #[test]
    fn collect_prefers_symbols() {
        let outcome = DecodeOutcome::collect(
            vec![symbol("a")],
            vec![QrError::DecodingError("ecc".to_string())],
        );
        assert!(outcome.is_found());
        assert_eq!(outcome.symbols().len(), 1);
        assert_eq!(outcome.into_symbols()[0].text, "a");
    }

    #[test]
    fn collect_keeps_failure() {
        let outcome = DecodeOutcome::collect(vec![], vec![QrError::DecodingError("ecc".to_string())]);
        assert!(outcome.is_failed());
        assert!(outcome.symbols().is_empty());
        assert!(outcome.into_symbols().is_empty());
    }

    #[test]
    fn collect_not_found() {
        let outcome = DecodeOutcome::collect(vec![], vec![]);
        assert!(matches!(outcome, DecodeOutcome::NotFound));
        assert!(outcome.symbols().is_empty());
    }
}
