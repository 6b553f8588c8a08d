use ammonia::Builder;

/// A general-purpose HTML stripper used as the coarse first gate.
///
/// Implementations must be deterministic and must return plain text
/// (no `<`, `>` or `&` that would need escaping) unchanged.
pub trait MarkupStripper: Send + Sync {
    /// Remove every tag and attribute from `input`.
    fn strip(&self, input: &str) -> String;

    /// Name of the stripper (for logging/debugging).
    fn name(&self) -> &str;
}

/// Stripper backed by ammonia with an empty tag and attribute allow-list.
///
/// A fresh `Builder` is configured for every call so nothing carries over
/// between inputs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaStripper;

impl MarkupStripper for AmmoniaStripper {
    fn strip(&self, input: &str) -> String {
        Builder::empty().clean(input).to_string()
    }

    fn name(&self) -> &str {
        "ammonia"
    }
}

/// True when stripping changed `input` at all, i.e. it carried markup.
pub fn contains_markup(stripper: &dyn MarkupStripper, input: &str) -> bool {
    stripper.strip(input) != input
}
