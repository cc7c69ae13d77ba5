use crate::layout::SelectorRule;
use crate::session::{Node, Session};

/// How a [`SelectorRule`] is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateMode {
    /// Every match of the first candidate that matches anything
    All,
    /// The first displayed element of the first candidate that has one
    First,
}

/// Resolves `rule` against the current page.
///
/// Candidates are tried in order. A candidate whose lookup fails is skipped,
/// so the result is empty rather than an error when nothing matches.
pub async fn locate<S: Session>(
    session: &S,
    rule: &SelectorRule,
    mode: LocateMode,
) -> Vec<S::Element> {
    for css in rule.candidates {
        let found = match session.find_all(css).await {
            Ok(found) => found,
            Err(e) => {
                ::log::debug!("{} candidate `{}` failed: {}", rule.name, css, e);
                continue;
            }
        };

        match mode {
            LocateMode::All => {
                if !found.is_empty() {
                    ::log::trace!("{} matched {} elements via `{}`", rule.name, found.len(), css);
                    return found;
                }
            }
            LocateMode::First => {
                if let Some(element) = first_displayed(found).await {
                    ::log::trace!("{} matched via `{}`", rule.name, css);
                    return vec![element];
                }
            }
        }
        ::log::trace!("{} candidate `{}` matched nothing", rule.name, css);
    }

    Vec::new()
}

/// Resolves `rule` against the descendants of `node`
pub async fn locate_within<N: Node>(node: &N, rule: &SelectorRule) -> Vec<N> {
    for css in rule.candidates {
        match node.find_all(css).await {
            Ok(found) if !found.is_empty() => return found,
            Ok(_) => {}
            Err(e) => ::log::debug!("{} candidate `{}` failed: {}", rule.name, css, e),
        }
    }
    Vec::new()
}

async fn first_displayed<N: Node>(elements: Vec<N>) -> Option<N> {
    for element in elements {
        if matches!(element.is_displayed().await, Ok(true)) {
            return Some(element);
        }
    }
    None
}
