use serde::Serialize;

/// One step of a cascade: an optional gate and an extractor.
///
/// When the gate is present and rejects the text, the step is skipped
/// without running the extractor.
pub struct Matcher<T> {
    pub name: &'static str,
    pub applies: Option<fn(&str) -> bool>,
    pub extract: fn(&str) -> Option<T>,
}

/// Record of a single step, so a caller can see why a cascade chose what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Attempt {
    Skipped(&'static str),
    NoMatch(&'static str),
    Matched(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome<T> {
    pub attempts: Vec<Attempt>,
    pub hit: Option<(&'static str, T)>,
}

impl<T> CascadeOutcome<T> {
    pub fn value(self) -> Option<T> {
        self.hit.map(|(_, value)| value)
    }

    pub fn matcher(&self) -> Option<&'static str> {
        self.hit.as_ref().map(|(name, _)| *name)
    }
}

/// Fixed priority list of matchers. The first matcher that yields a value
/// ends the run; later matchers are never consulted.
pub struct Cascade<T: 'static> {
    pub name: &'static str,
    pub matchers: &'static [Matcher<T>],
}

impl<T: 'static> Cascade<T> {
    pub fn run(&self, text: &str) -> CascadeOutcome<T> {
        let mut attempts = Vec::with_capacity(self.matchers.len());

        for matcher in self.matchers {
            if let Some(applies) = matcher.applies {
                if !applies(text) {
                    attempts.push(Attempt::Skipped(matcher.name));
                    continue;
                }
            }

            match (matcher.extract)(text) {
                Some(value) => {
                    log::debug!("{} cascade: matched by {}", self.name, matcher.name);
                    attempts.push(Attempt::Matched(matcher.name));
                    return CascadeOutcome {
                        attempts,
                        hit: Some((matcher.name, value)),
                    };
                }
                None => attempts.push(Attempt::NoMatch(matcher.name)),
            }
        }

        log::debug!("{} cascade: no matcher applied", self.name);
        CascadeOutcome {
            attempts,
            hit: None,
        }
    }
}
